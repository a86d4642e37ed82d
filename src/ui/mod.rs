//! Client-side view state, independent of how it is drawn.

pub mod app;
pub mod editor_view;
pub mod list_view;

#[cfg(test)]
mod fake;

pub use app::{App, Request, Response};
pub use editor_view::{EditorState, EditorView, Field, PendingSave};
pub use list_view::ListView;
