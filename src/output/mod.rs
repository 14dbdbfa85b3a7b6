//! Report records and formatters

pub mod formatter;
pub mod report;
