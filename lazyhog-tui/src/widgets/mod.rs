//! Reusable widget components.

pub mod json;
pub mod search;

pub use json::JsonHighlighter;
pub use search::SearchBar;
