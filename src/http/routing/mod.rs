pub use super::routes::todos;

use std::time::Instant;

use axum::{body::Body, extract::Request, middleware::{self, Next}, response::Response, routing::get, Router};
use tower::ServiceBuilder;

use super::cors::{cors_middleware, CorsPolicy};

pub fn app(router: Router, cors: CorsPolicy) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(trace_requests))
                .layer(middleware::from_fn_with_state(cors, cors_middleware)),
        )
}

async fn trace_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();
    let resp = next.run(req).await;
    tracing::info!(
        %method,
        %path,
        status = resp.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    resp
}
