//! # numbers-core
//!
//! Core data structures shared by the numbers-parser crates.
//!
//! - [`Fields`] - An insertion-ordered string map with last-write-wins updates
//! - [`RawRow`] - One exported line, mapping header names to trimmed cell text
//!
//! ## Example
//!
//! ```rust
//! use numbers_core::Fields;
//!
//! let mut fields = Fields::new();
//! fields.insert("Invoice ID", "A1");
//! fields.insert("Status", "paid");
//! fields.insert("Invoice ID", "A2");
//!
//! assert_eq!(fields.get("Invoice ID"), Some("A2"));
//! assert_eq!(fields.keys().collect::<Vec<_>>(), ["Invoice ID", "Status"]);
//! ```

pub mod fields;
pub mod row;

pub use fields::Fields;
pub use row::RawRow;
