pub mod document;
pub mod url;

pub use document::{extract, extract_html};
