use crate::domain::error::{TodoError, TodoResult};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{Todo, TodoId, TodoInput};
use async_trait::async_trait;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create(&self, input: TodoInput) -> TodoResult<Todo>;
    async fn list(&self, request: PageRequest) -> TodoResult<Page<Todo>>;
    async fn get(&self, id: TodoId) -> TodoResult<Todo>;
    async fn update(&self, id: TodoId, input: TodoInput) -> TodoResult<Todo>;
    async fn delete(&self, id: TodoId) -> TodoResult<()>;
}

/// Pass-through to the repository; the only logic here is turning absence into `NotFound`.
#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }

    pub fn repository(&self) -> &R { &self.repo }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn create(&self, input: TodoInput) -> TodoResult<Todo> { self.repo.create(input).await }

    async fn list(&self, request: PageRequest) -> TodoResult<Page<Todo>> { self.repo.list(request).await }

    async fn get(&self, id: TodoId) -> TodoResult<Todo> {
        self.repo.get(id).await?.ok_or(TodoError::NotFound)
    }

    async fn update(&self, id: TodoId, input: TodoInput) -> TodoResult<Todo> {
        self.repo.update(id, input).await?.ok_or(TodoError::NotFound)
    }

    async fn delete(&self, id: TodoId) -> TodoResult<()> {
        if self.repo.delete(id).await? { Ok(()) } else { Err(TodoError::NotFound) }
    }
}
