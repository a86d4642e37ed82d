use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::client::{ClientError, ClientResult, TodoApi};
use crate::domain::{
    page::{Page, PageRequest},
    todo::{Todo, TodoId, TodoInput},
};

/// In-memory `TodoApi`; `fail(true)` makes every call answer 500.
#[derive(Default)]
pub struct FakeApi {
    items: Mutex<Vec<Todo>>,
    failing: AtomicBool,
}

impl FakeApi {
    pub fn with_titles(titles: &[&str]) -> Self {
        let api = Self::default();
        {
            let mut items = api.items.lock().unwrap();
            let base = Utc::now();
            for (i, title) in titles.iter().enumerate() {
                let ts = base + Duration::milliseconds(i as i64);
                items.push(Todo { id: TodoId::new(), title: title.to_string(), description: format!("about {title}"), created_at: ts, updated_at: ts });
            }
        }
        api
    }

    pub fn fail(&self, failing: bool) { self.failing.store(failing, Ordering::SeqCst); }

    pub fn stored(&self, id: TodoId) -> Option<Todo> { self.items.lock().unwrap().iter().find(|t| t.id == id).cloned() }

    fn check(&self) -> ClientResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ClientError::RequestFailed { status: 500, message: "Error".into() })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TodoApi for FakeApi {
    async fn create(&self, input: TodoInput) -> ClientResult<Todo> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let now = items.last().map(|t| t.created_at + Duration::milliseconds(1)).unwrap_or_else(Utc::now);
        let todo = Todo { id: TodoId::new(), title: input.title, description: input.description, created_at: now, updated_at: now };
        items.push(todo.clone());
        Ok(todo)
    }

    async fn list(&self, page: u32, limit: u32) -> ClientResult<Page<Todo>> {
        self.check()?;
        let request = PageRequest::new(page, limit);
        let items = self.items.lock().unwrap();
        let slice = items.iter().rev().skip(request.offset() as usize).take(request.limit() as usize).cloned().collect();
        Ok(Page::new(slice, request, items.len() as u64))
    }

    async fn get(&self, id: TodoId) -> ClientResult<Todo> {
        self.check()?;
        self.stored(id).ok_or(ClientError::NotFound)
    }

    async fn update(&self, id: TodoId, input: TodoInput) -> ClientResult<Todo> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let todo = items.iter_mut().find(|t| t.id == id).ok_or(ClientError::NotFound)?;
        todo.title = input.title;
        todo.description = input.description;
        todo.updated_at = todo.updated_at + Duration::milliseconds(1);
        Ok(todo.clone())
    }

    async fn delete(&self, id: TodoId) -> ClientResult<()> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|t| t.id != id);
        if items.len() < before { Ok(()) } else { Err(ClientError::NotFound) }
    }
}
