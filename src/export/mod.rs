//! Transaction file import and export
//!
//! Records enter and leave Pocketbook as CSV in a fixed exchange format.

pub mod csv;

pub use self::csv::{load_records, read_records, save_records, write_records, TAG_DELIMITER};
