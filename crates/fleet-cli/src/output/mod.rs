//! Output formatting helpers for the CLI.
//!
//! Tables are rendered with borders when stdout is a terminal and as
//! tab-separated lines otherwise; `--json` output is pretty-printed serde.

mod json;
mod text;

pub use json::print_json;
pub use text::{backups_table, drivers_table, records_table, stats_table};
