use crate::client::{ClientResult, TodoApi};
use crate::domain::page::{Page, PageRequest, DEFAULT_LIMIT};
use crate::domain::todo::{Todo, TodoId, TodoInput};

pub const NEW_TODO_TITLE: &str = "New Todo";
pub const NEW_TODO_DESCRIPTION: &str = "Click to edit this todo";

/// One fetched page plus a search box that filters only that page.
#[derive(Debug, Clone)]
pub struct ListView {
    items: Vec<Todo>,
    current_page: u32,
    total_pages: u64,
    page_size: u32,
    search: String,
    selected: Option<TodoId>,
    loading: bool,
}

impl Default for ListView {
    fn default() -> Self { Self::new(DEFAULT_LIMIT) }
}

impl ListView {
    pub fn new(page_size: u32) -> Self {
        Self { items: Vec::new(), current_page: 1, total_pages: 1, page_size: page_size.max(1), search: String::new(), selected: None, loading: false }
    }

    pub fn items(&self) -> &[Todo] { &self.items }
    pub fn current_page(&self) -> u32 { self.current_page }
    pub fn total_pages(&self) -> u64 { self.total_pages }
    pub fn is_loading(&self) -> bool { self.loading }
    pub fn search(&self) -> &str { &self.search }
    pub fn selected_id(&self) -> Option<TodoId> { self.selected }

    pub fn selected_todo(&self) -> Option<&Todo> {
        let id = self.selected?;
        self.items.iter().find(|t| t.id == id)
    }

    pub fn has_previous(&self) -> bool { self.current_page > 1 }
    pub fn has_next(&self) -> bool { u64::from(self.current_page) < self.total_pages }

    /// Marks a fetch of `page` as in flight and returns what to ask the server for.
    pub fn begin_load(&mut self, page: u32) -> PageRequest {
        self.loading = true;
        PageRequest::new(page.max(1), self.page_size)
    }

    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if !self.has_next() { return None; }
        Some(self.begin_load(self.current_page + 1))
    }

    pub fn begin_previous_page(&mut self) -> Option<PageRequest> {
        if !self.has_previous() { return None; }
        Some(self.begin_load(self.current_page - 1))
    }

    /// Applies a fetched page. Returns whether the selection moved: a selected todo that is
    /// not on the new page is replaced by the page's first item, or cleared when the page is
    /// empty. On failure the previously loaded items stay visible.
    pub fn finish_load(&mut self, result: ClientResult<Page<Todo>>) -> ClientResult<bool> {
        self.loading = false;
        let page = result.inspect_err(|e| tracing::error!(error = %e, "error fetching todos"))?;
        self.items = page.items;
        self.current_page = page.current_page;
        self.total_pages = page.total_pages.max(1);

        match self.selected {
            Some(id) if !self.items.iter().any(|t| t.id == id) => {
                self.selected = self.items.first().map(|t| t.id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub async fn load_page(&mut self, api: &dyn TodoApi, page: u32) -> ClientResult<bool> {
        let request = self.begin_load(page);
        let result = api.list(request.page(), request.limit()).await;
        self.finish_load(result)
    }

    pub async fn next_page(&mut self, api: &dyn TodoApi) -> ClientResult<bool> {
        let Some(request) = self.begin_next_page() else { return Ok(false) };
        let result = api.list(request.page(), request.limit()).await;
        self.finish_load(result)
    }

    pub async fn previous_page(&mut self, api: &dyn TodoApi) -> ClientResult<bool> {
        let Some(request) = self.begin_previous_page() else { return Ok(false) };
        let result = api.list(request.page(), request.limit()).await;
        self.finish_load(result)
    }

    pub fn set_search(&mut self, query: impl Into<String>) { self.search = query.into(); }

    /// Items of the loaded page matching the search box.
    pub fn filtered(&self) -> Vec<&Todo> {
        self.items.iter().filter(|t| t.matches(&self.search)).collect()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.filtered().is_empty() {
            None
        } else if self.search.is_empty() {
            Some("No todos yet")
        } else {
            Some("No todos found")
        }
    }

    /// Body of the placeholder todo that "new" creates.
    pub fn new_todo_input() -> TodoInput { TodoInput::new(NEW_TODO_TITLE, NEW_TODO_DESCRIPTION) }

    /// Prepends a created todo without re-fetching and selects it.
    pub fn finish_create(&mut self, result: ClientResult<Todo>) -> ClientResult<Todo> {
        let todo = result.inspect_err(|e| tracing::error!(error = %e, "error creating todo"))?;
        self.items.insert(0, todo.clone());
        self.selected = Some(todo.id);
        Ok(todo)
    }

    pub async fn create(&mut self, api: &dyn TodoApi) -> ClientResult<Todo> {
        let result = api.create(Self::new_todo_input()).await;
        self.finish_create(result)
    }

    pub fn select(&mut self, id: TodoId) -> Option<&Todo> {
        let todo = self.items.iter().find(|t| t.id == id)?;
        self.selected = Some(id);
        Some(todo)
    }

    pub fn replace(&mut self, todo: Todo) {
        if let Some(slot) = self.items.iter_mut().find(|t| t.id == todo.id) {
            *slot = todo;
        }
    }

    pub fn remove(&mut self, id: TodoId) {
        self.items.retain(|t| t.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}
