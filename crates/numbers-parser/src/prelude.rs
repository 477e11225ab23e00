//! Prelude module - common imports for numbers-parser users
//!
//! ```rust
//! use numbers_parser::prelude::*;
//! ```

pub use crate::{
    // Extraction
    extract,
    CellAdjustment,
    ContactsStrategy,
    CsvReadOptions,
    CsvReader,
    ExtractPaths,
    // Ledgers
    FlattenStrategy,
    ForegroundApp,
    GroupingStrategy,

    // Automation
    OsascriptBridge,
    Pipeline,
    PipelineReport,
    PipelineRequest,
    RawRow,
    Reducer,
    ScriptBridge,
    Strategy,
};
