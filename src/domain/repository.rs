use async_trait::async_trait;
use super::error::TodoResult;
use super::page::{Page, PageRequest};
use super::todo::{Todo, TodoId, TodoInput};

/// Store access. Absence is reported as `None`/`false`; the service turns it into `NotFound`.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> TodoResult<()>;
    async fn create(&self, input: TodoInput) -> TodoResult<Todo>;
    async fn get(&self, id: TodoId) -> TodoResult<Option<Todo>>;
    async fn list(&self, request: PageRequest) -> TodoResult<Page<Todo>>;
    async fn update(&self, id: TodoId, input: TodoInput) -> TodoResult<Option<Todo>>;
    async fn delete(&self, id: TodoId) -> TodoResult<bool>;
    async fn close(&self);
}
