//! Mock CoinCap server for provider and store tests.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A canned response: status code and JSON body
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn error(status: u16) -> Self {
        Self {
            status,
            body: r#"{"error": "mock failure"}"#.to_string(),
        }
    }
}

#[derive(Default)]
struct MockState {
    list: Mutex<Option<MockResponse>>,
    details: Mutex<HashMap<String, MockResponse>>,
    paths: Mutex<Vec<String>>,
    hits: AtomicUsize,
}

/// Mock API server bound to an ephemeral local port
pub struct MockApi {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/v2/assets", get(list_assets))
            .route("/v2/assets/{id}", get(get_asset))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Base URL to hand to `ProviderConfig`
    pub fn base_url(&self) -> String {
        format!("http://{}/v2", self.addr)
    }

    pub fn set_list(&self, resp: MockResponse) {
        *self.state.list.lock().unwrap() = Some(resp);
    }

    pub fn set_detail(&self, id: &str, resp: MockResponse) {
        self.state
            .details
            .lock()
            .unwrap()
            .insert(id.to_string(), resp);
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        self.state.paths.lock().unwrap().clone()
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

fn respond(resp: Option<MockResponse>) -> Response {
    match resp {
        Some(resp) => (
            StatusCode::from_u16(resp.status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            resp.body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_assets(State(state): State<Arc<MockState>>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.paths.lock().unwrap().push("/v2/assets".to_string());
    let resp = state.list.lock().unwrap().clone();
    respond(resp)
}

async fn get_asset(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.paths.lock().unwrap().push(format!("/v2/assets/{id}"));
    let resp = state.details.lock().unwrap().get(&id).cloned();
    respond(resp)
}
