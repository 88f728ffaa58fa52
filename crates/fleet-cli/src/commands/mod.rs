//! Command handlers, one module per command group.

pub mod drivers;
pub mod export;
pub mod maintenance;
pub mod records;
pub mod stats;
