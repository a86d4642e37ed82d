//! In-place editor for the selected todo.
//!
//! Each field has a visible text buffer and a last known-good value (the
//! record as the server last returned it). Blurring a field whose trimmed text
//! differs from the known-good value saves it; a failed save puts the
//! known-good value back into the buffer.

use crate::client::{ClientResult, TodoApi};
use crate::domain::todo::{Todo, TodoId, TodoInput};

pub const PLACEHOLDER: &str = "Select a todo to edit or create a new one";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field { Title, Description }

impl Field {
    pub fn toggle(self) -> Self {
        match self { Field::Title => Field::Description, Field::Description => Field::Title }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState { Empty, Viewing, Saving }

/// A field write in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub id: TodoId,
    pub field: Field,
    pub input: TodoInput,
}

#[derive(Debug, Clone)]
struct Session {
    todo: Todo,
    title: String,
    description: String,
    saving: bool,
}

impl Session {
    fn buffer_mut(&mut self, field: Field) -> &mut String {
        match field { Field::Title => &mut self.title, Field::Description => &mut self.description }
    }

    fn saved(&self, field: Field) -> &str {
        match field { Field::Title => &self.todo.title, Field::Description => &self.todo.description }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditorView {
    session: Option<Session>,
}

impl EditorView {
    pub fn state(&self) -> EditorState {
        match &self.session {
            None => EditorState::Empty,
            Some(s) if s.saving => EditorState::Saving,
            Some(_) => EditorState::Viewing,
        }
    }

    pub fn is_saving(&self) -> bool { self.state() == EditorState::Saving }

    pub fn todo(&self) -> Option<&Todo> { self.session.as_ref().map(|s| &s.todo) }

    pub fn text(&self, field: Field) -> Option<&str> {
        let s = self.session.as_ref()?;
        Some(match field { Field::Title => &s.title, Field::Description => &s.description })
    }

    /// Loads a selection (or clears it), discarding any unsaved text.
    pub fn select(&mut self, todo: Option<Todo>) {
        self.session = todo.map(|todo| Session { title: todo.title.clone(), description: todo.description.clone(), todo, saving: false });
    }

    pub fn buffer_mut(&mut self, field: Field) -> Option<&mut String> {
        self.session.as_mut().map(|s| s.buffer_mut(field))
    }

    pub fn edit(&mut self, field: Field, text: impl Into<String>) {
        if let Some(buffer) = self.buffer_mut(field) {
            *buffer = text.into();
        }
    }

    /// Focus left `field`. When its trimmed text differs from the known-good value, enters
    /// `Saving` and returns the write to send: the changed field plus the known-good value of
    /// the other one.
    pub fn begin_save(&mut self, field: Field) -> Option<PendingSave> {
        let session = self.session.as_mut()?;
        let text = session.buffer_mut(field).trim().to_string();
        if text == session.saved(field) {
            return None;
        }
        let input = match field {
            Field::Title => TodoInput::new(text, session.todo.description.clone()),
            Field::Description => TodoInput::new(session.todo.title.clone(), text),
        };
        session.saving = true;
        Some(PendingSave { id: session.todo.id, field, input })
    }

    /// Applies the outcome of `save`. A success becomes the new known-good record; a failure
    /// puts the known-good value back into the field. When the selection changed meanwhile
    /// the editor is left alone and only the result is passed on.
    pub fn finish_save(&mut self, save: &PendingSave, result: ClientResult<Todo>) -> ClientResult<Todo> {
        let field = save.field;
        let session = self.session.as_mut().filter(|s| s.todo.id == save.id);
        match (session, result) {
            (Some(session), Ok(updated)) => {
                session.saving = false;
                *session.buffer_mut(field) = match field { Field::Title => updated.title.clone(), Field::Description => updated.description.clone() };
                session.todo = updated.clone();
                Ok(updated)
            }
            (Some(session), Err(e)) => {
                session.saving = false;
                tracing::error!(error = %e, ?field, "error updating todo");
                let saved = session.saved(field).to_string();
                *session.buffer_mut(field) = saved;
                Err(e)
            }
            (None, result) => result.inspect_err(|e| tracing::error!(error = %e, ?field, "error updating todo")),
        }
    }

    /// Returns the updated record when a save happened, `None` when there was nothing to save.
    pub async fn blur(&mut self, api: &dyn TodoApi, field: Field) -> ClientResult<Option<Todo>> {
        let Some(save) = self.begin_save(field) else { return Ok(None) };
        let result = api.update(save.id, save.input.clone()).await;
        self.finish_save(&save, result).map(Some)
    }

    /// Id of the todo a delete would remove.
    pub fn begin_delete(&self) -> Option<TodoId> { self.todo().map(|t| t.id) }

    /// Clears the editor once `id` is gone. Returns the removed id for the parent.
    pub fn finish_delete(&mut self, id: TodoId, result: ClientResult<()>) -> ClientResult<TodoId> {
        result.inspect_err(|e| tracing::error!(error = %e, "error deleting todo"))?;
        if self.todo().is_some_and(|t| t.id == id) {
            self.session = None;
        }
        Ok(id)
    }

    /// Deletes the selected todo and clears the editor.
    pub async fn delete(&mut self, api: &dyn TodoApi) -> ClientResult<Option<TodoId>> {
        let Some(id) = self.begin_delete() else { return Ok(None) };
        let result = api.delete(id).await;
        self.finish_delete(id, result).map(Some)
    }
}
