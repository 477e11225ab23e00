//! Read-only scripts for checking an adjustment target by hand.
//!
//! These are never issued by the pipeline. They are printed by
//! `numbers-parser export --dry-run` so a failing adjustment can be
//! investigated with `osascript` directly.

use crate::request::CellAdjustment;

/// Script that lists the sheets of document 1 and the tables of the target
/// sheet, and reports whether the target table exists.
///
/// The result is returned as text (printed by `osascript` on stdout).
pub fn describe_target(adjustment: &CellAdjustment) -> String {
    format!(
        r#"tell application "Numbers"
    tell document 1
        set report to "Sheets:" & linefeed
        repeat with i from 1 to count of sheets
            set report to report & i & ": " & name of sheet i & linefeed
        end repeat

        if {sheet} > (count of sheets) then
            return report & "Error: Sheet index {sheet} is out of bounds."
        end if

        tell sheet {sheet}
            set report to report & "Tables in sheet {sheet}:" & linefeed
            set tableExists to false
            repeat with i from 1 to count of tables
                set report to report & i & ": " & name of table i & linefeed
                if name of table i is "{table}" then set tableExists to true
            end repeat

            if not tableExists then
                return report & "Error: Table '{table}' not found in sheet {sheet}."
            end if

            tell table "{table}"
                set current to value of cell {column} of row {row}
                return report & "Cell {column} of row {row}: " & current
            end tell
        end tell
    end tell
end tell"#,
        sheet = adjustment.sheet,
        table = adjustment.table,
        column = adjustment.column,
        row = adjustment.row,
    )
}
