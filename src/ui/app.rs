use crate::client::{ClientResult, TodoApi};
use crate::domain::page::{Page, PageRequest};
use crate::domain::todo::{Todo, TodoId, TodoInput};

use super::editor_view::{EditorView, Field, PendingSave};
use super::list_view::ListView;

/// A server call the views asked for. Executing it touches no view state, so it can run on
/// another task while the views keep showing `loading`/`Saving`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Load(PageRequest),
    Create(TodoInput),
    Save(PendingSave),
    Delete(TodoId),
}

#[derive(Debug)]
pub enum Response {
    Loaded(ClientResult<Page<Todo>>),
    Created(ClientResult<Todo>),
    Saved(PendingSave, ClientResult<Todo>),
    Deleted(TodoId, ClientResult<()>),
}

impl Request {
    pub async fn execute(self, api: &dyn TodoApi) -> Response {
        match self {
            Request::Load(page) => Response::Loaded(api.list(page.page(), page.limit()).await),
            Request::Create(input) => Response::Created(api.create(input).await),
            Request::Save(save) => {
                let result = api.update(save.id, save.input.clone()).await;
                Response::Saved(save, result)
            }
            Request::Delete(id) => Response::Deleted(id, api.delete(id).await),
        }
    }
}

/// List and editor side by side; keeps the selection of both in step.
///
/// Every operation is split in two: a `request_*` call updates the views and returns the
/// `Request` to send, and `apply` folds the `Response` back in. The async methods do both
/// in sequence.
pub struct App<A: TodoApi> {
    api: A,
    pub list: ListView,
    pub editor: EditorView,
    last_error: Option<String>,
    queued_saves: Vec<(TodoId, Field)>,
}

impl<A: TodoApi> App<A> {
    pub fn new(api: A, page_size: u32) -> Self {
        Self { api, list: ListView::new(page_size), editor: EditorView::default(), last_error: None, queued_saves: Vec::new() }
    }

    pub fn api(&self) -> &A { &self.api }

    /// Most recent failure, cleared by the next successful operation.
    pub fn last_error(&self) -> Option<&str> { self.last_error.as_deref() }

    /// `None` while another page is still loading.
    pub fn request_page(&mut self, page: u32) -> Option<Request> {
        if self.list.is_loading() { return None; }
        Some(Request::Load(self.list.begin_load(page)))
    }

    pub fn request_refresh(&mut self) -> Option<Request> { self.request_page(self.list.current_page()) }

    pub fn request_next_page(&mut self) -> Option<Request> {
        if self.list.is_loading() { return None; }
        self.list.begin_next_page().map(Request::Load)
    }

    pub fn request_previous_page(&mut self) -> Option<Request> {
        if self.list.is_loading() { return None; }
        self.list.begin_previous_page().map(Request::Load)
    }

    pub fn request_create(&mut self) -> Request { Request::Create(ListView::new_todo_input()) }

    /// Leaving `field`. While another field of the same todo is still saving, the blur waits
    /// in a queue so that the second write carries the first one's result.
    pub fn request_save(&mut self, field: Field) -> Option<Request> {
        if self.editor.is_saving() {
            let id = self.editor.todo()?.id;
            if !self.queued_saves.contains(&(id, field)) {
                self.queued_saves.push((id, field));
            }
            return None;
        }
        self.editor.begin_save(field).map(Request::Save)
    }

    pub fn request_delete(&mut self) -> Option<Request> { self.editor.begin_delete().map(Request::Delete) }

    /// The next queued blur, once the editor is free to save again.
    pub fn next_queued(&mut self) -> Option<Request> {
        while !self.editor.is_saving() && !self.queued_saves.is_empty() {
            let (id, field) = self.queued_saves.remove(0);
            if self.editor.todo().is_some_and(|t| t.id == id) {
                if let Some(save) = self.editor.begin_save(field) {
                    return Some(Request::Save(save));
                }
            }
        }
        None
    }

    pub fn apply(&mut self, response: Response) -> ClientResult<()> {
        match response {
            Response::Loaded(result) => {
                let moved = self.list.finish_load(result);
                if self.record(moved)? {
                    self.editor.select(self.list.selected_todo().cloned());
                }
            }
            Response::Created(result) => {
                let created = self.list.finish_create(result);
                let todo = self.record(created)?;
                self.editor.select(Some(todo));
            }
            Response::Saved(save, result) => {
                let saved = self.editor.finish_save(&save, result);
                let updated = self.record(saved)?;
                self.list.replace(updated);
            }
            Response::Deleted(id, result) => {
                let deleted = self.editor.finish_delete(id, result);
                let id = self.record(deleted)?;
                self.list.remove(id);
            }
        }
        Ok(())
    }

    pub fn select(&mut self, id: TodoId) {
        if let Some(todo) = self.list.select(id) {
            self.editor.select(Some(todo.clone()));
        }
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let request = self.request_refresh();
        self.run(request).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> ClientResult<()> {
        let request = self.request_page(page);
        self.run(request).await
    }

    pub async fn next_page(&mut self) -> ClientResult<()> {
        let request = self.request_next_page();
        self.run(request).await
    }

    pub async fn previous_page(&mut self) -> ClientResult<()> {
        let request = self.request_previous_page();
        self.run(request).await
    }

    pub async fn create(&mut self) -> ClientResult<()> {
        let request = self.request_create();
        self.run(Some(request)).await
    }

    pub async fn blur(&mut self, field: Field) -> ClientResult<()> {
        let request = self.request_save(field);
        self.run(request).await
    }

    pub async fn delete_selected(&mut self) -> ClientResult<()> {
        let request = self.request_delete();
        self.run(request).await
    }

    async fn run(&mut self, request: Option<Request>) -> ClientResult<()> {
        let Some(request) = request else { return Ok(()) };
        let response = request.execute(&self.api).await;
        self.apply(response)
    }

    fn record<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some(e.to_string()),
        }
        result
    }
}
