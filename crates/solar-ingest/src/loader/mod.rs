//! Record loading utilities.

mod reader;

pub use reader::{RecordSet, load_single, load_tagged, read_csv_frame, read_header};
