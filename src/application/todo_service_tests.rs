#[cfg(test)]
mod tests {
    use super::super::todo_service::{TodoService, TodoServiceImpl};
    use crate::domain::{
        error::{TodoError, TodoResult},
        page::{Page, PageRequest},
        repository::TodoRepository,
        todo::{Todo, TodoId, TodoInput},
    };
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct InMemoryRepo {
        items: Arc<Mutex<Vec<Todo>>>,
        broken: bool,
    }

    impl InMemoryRepo {
        fn broken() -> Self { Self { broken: true, ..Self::default() } }

        fn check(&self) -> TodoResult<()> {
            if self.broken { Err(TodoError::Persistence(sqlx::Error::PoolClosed)) } else { Ok(()) }
        }
    }

    #[async_trait]
    impl TodoRepository for InMemoryRepo {
        async fn init(&self) -> TodoResult<()> { Ok(()) }
        async fn create(&self, input: TodoInput) -> TodoResult<Todo> {
            self.check()?;
            let mut items = self.items.lock().unwrap();
            // strictly increasing creation stamps keep ordering deterministic
            let now = items.last().map(|t| t.created_at + Duration::milliseconds(1)).unwrap_or_else(Utc::now);
            let todo = Todo { id: TodoId::new(), title: input.title, description: input.description, created_at: now, updated_at: now };
            items.push(todo.clone());
            Ok(todo)
        }
        async fn get(&self, id: TodoId) -> TodoResult<Option<Todo>> {
            self.check()?;
            Ok(self.items.lock().unwrap().iter().find(|t| t.id == id).cloned())
        }
        async fn list(&self, request: PageRequest) -> TodoResult<Page<Todo>> {
            self.check()?;
            let items = self.items.lock().unwrap();
            let page = items.iter().rev()
                .skip(request.offset() as usize)
                .take(request.limit() as usize)
                .cloned()
                .collect();
            Ok(Page::new(page, request, items.len() as u64))
        }
        async fn update(&self, id: TodoId, input: TodoInput) -> TodoResult<Option<Todo>> {
            self.check()?;
            let mut items = self.items.lock().unwrap();
            let Some(todo) = items.iter_mut().find(|t| t.id == id) else { return Ok(None) };
            todo.title = input.title;
            todo.description = input.description;
            todo.updated_at = todo.updated_at + Duration::milliseconds(1);
            Ok(Some(todo.clone()))
        }
        async fn delete(&self, id: TodoId) -> TodoResult<bool> {
            self.check()?;
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|t| t.id != id);
            Ok(items.len() < before)
        }
        async fn close(&self) {}
    }

    fn service() -> TodoServiceImpl<InMemoryRepo> { TodoServiceImpl::new(InMemoryRepo::default()) }

    #[tokio::test]
    async fn unit_create_and_get() {
        let service = service();
        let created = service.create(TodoInput::new("X", "")).await.unwrap();
        assert_eq!(created.title, "X");
        assert_eq!(created.description, "");
        let got = service.get(created.id).await.unwrap();
        assert_eq!(got.id, created.id);
        assert_eq!(got.created_at, got.updated_at);
    }

    #[tokio::test]
    async fn unit_update_replaces_both_fields() {
        let service = service();
        let created = service.create(TodoInput::new("old", "old desc")).await.unwrap();
        let updated = service.update(created.id, TodoInput::new("new", "")).await.unwrap();
        assert_eq!((updated.title.as_str(), updated.description.as_str()), ("new", ""));
        let got = service.get(created.id).await.unwrap();
        assert!(got.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn unit_missing_ids_are_not_found() {
        let service = service();
        let id = TodoId::new();
        assert!(matches!(service.get(id).await, Err(TodoError::NotFound)));
        assert!(matches!(service.update(id, TodoInput::new("t", "d")).await, Err(TodoError::NotFound)));
        assert!(matches!(service.delete(id).await, Err(TodoError::NotFound)));
    }

    #[tokio::test]
    async fn unit_delete_then_get_is_not_found() {
        let service = service();
        let created = service.create(TodoInput::new("gone", "")).await.unwrap();
        service.delete(created.id).await.unwrap();
        assert!(matches!(service.get(created.id).await, Err(TodoError::NotFound)));
    }

    #[tokio::test]
    async fn unit_list_second_page_of_fifteen() {
        let service = service();
        for i in 0..15 {
            service.create(TodoInput::new(format!("t{i}"), "")).await.unwrap();
        }
        let page = service.list(PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!((page.current_page, page.total_pages, page.total_items), (2, 2, 15));
        assert!(page.items.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn unit_store_failures_are_persistence_errors() {
        let service = TodoServiceImpl::new(InMemoryRepo::broken());
        assert!(matches!(service.create(TodoInput::new("t", "d")).await, Err(TodoError::Persistence(_))));
        assert!(matches!(service.get(TodoId::new()).await, Err(TodoError::Persistence(_))));
        assert!(matches!(service.list(PageRequest::default()).await, Err(TodoError::Persistence(_))));
    }
}
