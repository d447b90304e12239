//! Conversions between the document tree and its external representations:
//! the flat persisted text, rich snapshots and HTML.

pub mod html;
pub mod plain;
pub mod snapshot;

pub use html::to_html;
pub use plain::{BULLET_MARKER, from_plain_text, to_plain_text};
pub use snapshot::ContentSnapshot;
