//! One-shot HTTP server standing in for the ZCS endpoint in tests.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::any;
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    delay: Duration,
    captured: Arc<Mutex<Option<oneshot::Sender<CapturedRequest>>>>,
}

async fn respond(
    State(reply): State<Reply>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let request = CapturedRequest {
        method: method.to_string(),
        headers: headers
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_owned(), v.to_owned())))
            .collect(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    let sender = reply.captured.lock().unwrap().take();
    if let Some(sender) = sender {
        let _ = sender.send(request);
    }

    tokio::time::sleep(reply.delay).await;

    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
}

/// Serve `status` and `body` after `delay`, handing the first request received to the returned
/// receiver.
pub async fn serve_once(
    status: u16,
    body: &str,
    delay: Duration,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (sender, receiver) = oneshot::channel();

    let app = Router::new().route("/", any(respond)).with_state(Reply {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_owned(),
        delay,
        captured: Arc::new(Mutex::new(Some(sender))),
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app.into_make_service()).await;
    });

    (url, receiver)
}
