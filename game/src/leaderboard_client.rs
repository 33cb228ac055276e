use std::{io, sync::mpsc, thread};

use axum::http::{Method, Request, StatusCode, Uri, header, uri::InvalidUri};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use serde::Serialize;
use thiserror::Error;

use crate::leaderboard::ScoreRecord;
use crate::leaderboard_api::{ErrorBody, SaveResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid leaderboard url: {0}")]
    InvalidUri(#[from] InvalidUri),
    #[error("failed to build request: {0}")]
    Http(#[from] axum::http::Error),
    #[error("request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    nickname: &'a str,
    score: u64,
}

/// HTTP client for the leaderboard service.
#[derive(Clone)]
pub struct LeaderboardClient {
    base_url: String,
    http: Client<HttpConnector, Full<Bytes>>,
}

impl LeaderboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: Client::builder(TokioExecutor::new()).build_http(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_top_scores(&self) -> Result<Vec<ScoreRecord>, ClientError> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(self.uri("/api/scores")?)
            .body(Full::new(Bytes::new()))?;
        let body = self.send(req).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn submit_score(&self, nickname: &str, score: u64) -> Result<SaveResponse, ClientError> {
        let payload = serde_json::to_vec(&SubmitBody { nickname, score })?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri("/api/scores")?)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(payload)))?;
        let body = self.send(req).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn uri(&self, path: &str) -> Result<Uri, ClientError> {
        Ok(format!("{}{path}", self.base_url).parse()?)
    }

    async fn send(&self, req: Request<Full<Bytes>>) -> Result<Bytes, ClientError> {
        let res = self.http.request(req).await?;
        let status = res.status();
        let body = res.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            // Prefer the server's `{error}` message over the raw body.
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(ClientError::Status { status, message });
        }
        Ok(body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardRequest {
    LoadRanking,
    Submit { nickname: String, score: u64 },
}

#[derive(Debug)]
pub enum LeaderboardEvent {
    Ranking(Result<Vec<ScoreRecord>, ClientError>),
    Submitted(Result<SaveResponse, ClientError>),
}

/// Runs leaderboard calls off the render thread. Requests are handled in
/// order on a dedicated thread with its own runtime; results are picked up
/// with `poll`.
pub struct LeaderboardWorker {
    requests: mpsc::Sender<LeaderboardRequest>,
    events: mpsc::Receiver<LeaderboardEvent>,
}

impl LeaderboardWorker {
    pub fn spawn(client: LeaderboardClient) -> io::Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<LeaderboardRequest>();
        let (event_tx, event_rx) = mpsc::channel::<LeaderboardEvent>();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("leaderboard-client".to_string())
            .spawn(move || {
                for request in req_rx {
                    let event = rt.block_on(handle_request(&client, request));
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            requests: req_tx,
            events: event_rx,
        })
    }

    /// Returns false once the worker thread has gone away.
    pub fn request(&self, request: LeaderboardRequest) -> bool {
        self.requests.send(request).is_ok()
    }

    pub fn poll(&self) -> Vec<LeaderboardEvent> {
        self.events.try_iter().collect()
    }
}

async fn handle_request(client: &LeaderboardClient, request: LeaderboardRequest) -> LeaderboardEvent {
    match request {
        LeaderboardRequest::LoadRanking => {
            LeaderboardEvent::Ranking(client.fetch_top_scores().await)
        }
        LeaderboardRequest::Submit { nickname, score } => {
            LeaderboardEvent::Submitted(client.submit_score(&nickname, score).await)
        }
    }
}
