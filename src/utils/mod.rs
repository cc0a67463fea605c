pub mod file;
pub mod matcher;
pub mod yaml;

pub use file::{file_get, file_write};
pub use matcher::{ascii_word_pattern, contains_any_keyword};
