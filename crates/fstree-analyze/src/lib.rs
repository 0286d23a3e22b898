//! Analysis over fstree entries.
//!
//! Provides:
//! - **Line counting**: byte-level line counts with no text decoding
//! - **Binary classification**: a fixed list of extensions that are not worth
//!   reading as text

mod binary;
mod lines;

pub use binary::{BINARY_EXTENSIONS, file_ext, is_binary};
pub use lines::{
    LINES_META_KEY, LineConfig, LineConfigBuilder, LineCounter, LineReport, count_blob_lines,
    count_lines,
};
