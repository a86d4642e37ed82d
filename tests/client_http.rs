//! Drives `TodoClient` over real HTTP: against the service bound to a random
//! local port, and against wiremock for failure statuses the service does not
//! produce on demand.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use todo_pad::application::todo_service::TodoServiceImpl;
use todo_pad::client::{ClientError, TodoApi, TodoClient};
use todo_pad::domain::{repository::TodoRepository, todo::{TodoId, TodoInput}};
use todo_pad::http::{cors::CorsPolicy, routing, routing::todos};
use todo_pad::infrastructure::sqlite_repo::SqliteTodoRepository;

async fn spawn_service() -> TodoClient {
    let repo = SqliteTodoRepository::connect("sqlite::memory:").await.unwrap();
    repo.init().await.unwrap();
    let service = TodoServiceImpl::new(repo);
    let router = routing::app(todos::router(todos::AppState { service }), CorsPolicy::new("http://localhost:3000"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

    TodoClient::new(&format!("http://{addr}/api/todos")).unwrap()
}

#[tokio::test]
async fn crud_lifecycle() {
    let client = spawn_service().await;

    let created = client.create(TodoInput::new("Integration", "")).await.unwrap();
    assert_eq!(created.title, "Integration");
    assert_eq!(created.description, "");
    assert_eq!(created.created_at, created.updated_at);

    let got = client.get(created.id).await.unwrap();
    assert_eq!(got, created);

    let updated = client.update(created.id, TodoInput::new("Renamed", "now with text")).await.unwrap();
    assert_eq!(updated.title, "Renamed");
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(client.get(created.id).await.unwrap(), updated);

    client.delete(created.id).await.unwrap();
    let err = client.get(created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let client = spawn_service().await;
    let id = TodoId::new();
    assert!(matches!(client.update(id, TodoInput::new("t", "d")).await, Err(ClientError::NotFound)));
    assert!(matches!(client.delete(id).await, Err(ClientError::NotFound)));
}

#[tokio::test]
async fn paginates_through_the_client() {
    let client = spawn_service().await;
    for i in 0..15 {
        client.create(TodoInput::new(format!("todo {i}"), "")).await.unwrap();
    }
    let page = client.list(2, 10).await.unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!((page.current_page, page.total_pages, page.total_items), (2, 2, 15));

    let beyond = client.list(3, 10).await.unwrap();
    assert!(beyond.items.is_empty());
}

#[tokio::test]
async fn server_errors_keep_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "Error fetching todos" })))
        .mount(&server)
        .await;

    let client = TodoClient::new(&format!("{}/api/todos", server.uri())).unwrap();
    match client.list(1, 10).await {
        Err(ClientError::RequestFailed { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Error fetching todos");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = TodoClient::new(&format!("{}/api/todos", server.uri())).unwrap();
    let err = client.create(TodoInput::new("t", "d")).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TodoClient::new(&format!("http://{addr}/api/todos")).unwrap();
    let err = client.get(TodoId::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
