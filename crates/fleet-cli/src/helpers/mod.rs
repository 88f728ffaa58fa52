//! Helper functions for the CLI.

mod parsing;

pub use parsing::{parse_date, parse_range, read_source};
