pub mod codec;
pub mod editing;
pub mod error;

// Re-export key types for easier usage
pub use codec::{ContentSnapshot, from_plain_text, to_html, to_plain_text};
pub use editing::*;
pub use error::{EditorError, Result};
