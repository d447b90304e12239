/*!
 * # Editing Core
 *
 * The model behind a rich-text editing surface.
 *
 * ## Architecture Overview
 *
 * ### 1. Structured Document Tree
 * - The document is a **`DocumentTree`** of blocks (paragraphs, headings,
 *   lists) holding inline runs (text, bold/italic/underline wrappers, breaks)
 * - The tree is never empty: its minimum is one empty paragraph
 * - Node identities live only as long as the tree; snapshots drop them
 *
 * ### 2. Command-Based Formatting
 * - Formatting requests are **`FormattingCommand`** values run by the
 *   **`Dispatcher`** against a pluggable **`FormattingPrimitive`**
 * - List toggles are verified after the primitive runs and repaired by the
 *   manual list fallback when no list item came out of it
 *
 * ### 3. Snapshot History
 * - Every accepted mutation records a whole-content **`ContentSnapshot`**
 *   plus a **`SelectionLocator`** in a bounded **`History`**
 * - Applying undo/redo is guarded so it never records itself
 *
 * ### 4. Structural Selection Addressing
 * - Live selections point at node identities
 * - **`SelectionLocator`** stores child-index paths instead, so a selection
 *   survives the tree being rebuilt from a snapshot
 * - **`DocPoint`** (text block, character offset) places carets across
 *   structural edits that move blocks around
 *
 * ## Module Structure
 *
 * - **`document`**: tree, nodes, runs and the text-level edit operations
 * - **`selection`**: live selections and their structural locators
 * - **`history`**: bounded undo/redo checkpoints
 * - **`commands`**: formatting commands, primitive and list fallback
 * - **`counter`**: word and character counts
 * - **`keymap`**: keyboard shortcuts to editor actions
 * - **`session`**: `EditorSession`, the owner that ties everything together
 *
 * ## Usage Pattern
 *
 * ```rust
 * use inkpad_config::EditorConfig;
 * use inkpad_engine::editing::{DocPoint, EditorSession, FormattingCommand, Hydration};
 *
 * let mut session = EditorSession::hydrate(Hydration::plain("Hello world"), &EditorConfig::default());
 * session.select(DocPoint::new(0, 0), DocPoint::new(0, 5));
 * session.execute(FormattingCommand::ToggleBold);
 *
 * assert_eq!(session.plain_text(), "Hello world");
 * assert!(session.undo());
 * ```
 */

pub mod commands;
pub mod counter;
pub mod document;
pub mod history;
pub mod keymap;
pub mod selection;
pub mod session;

// Public API re-exports
pub use commands::{BuiltinPrimitive, Dispatcher, FormattingCommand, FormattingPrimitive};
pub use counter::WordCount;
pub use document::points::DocPoint;
pub use document::{DocumentTree, HeadingLevel, InlineMark, ListKind, Node, NodeId, NodeKind, NodePath};
pub use history::{History, HistoryEntry};
pub use keymap::{KeyAction, KeyCode, KeyPress};
pub use selection::{Position, Selection, SelectionLocator};
pub use session::{ChangeEvent, EditorSession, Hydration};
