//! In-process stand-in for the extraction service.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::client::{
    API_KEY_HEADER, WHISPER_HASH_HEADER, WhisperClient, WhisperConfig, WhisperCredentials,
};
use crate::legacy::LegacyClient;

type Shared = Arc<Mutex<MockState>>;
type Params = Query<HashMap<String, String>>;
type Reply = Result<Response, Response>;

/// Documents starting with this marker are deferred; the number after it is
/// how many status polls report `processing` before the job is processed.
const SCANNED_MARKER: &str = "%SCANNED:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobState {
    Processing,
    Processed,
    Delivered,
}

impl JobState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Processed => "processed",
            Self::Delivered => "delivered",
        }
    }
}

struct Job {
    state: JobState,
    polls_remaining: u32,
    frozen: bool,
    text: String,
}

enum Outcome {
    Completed { whisper_hash: String, text: String },
    Deferred { whisper_hash: String },
}

#[derive(Default)]
struct MockState {
    jobs: HashMap<String, Job>,
    webhooks: HashMap<String, Value>,
    seen_hashes: Vec<String>,
    submissions: usize,
    last_query: HashMap<String, String>,
    next_id: u32,
}

impl MockState {
    fn submit(
        &mut self,
        document: String,
        params: &HashMap<String, String>,
    ) -> Result<Outcome, Response> {
        self.submissions += 1;
        self.last_query = params.clone();

        let timeout = params.get("timeout").and_then(|t| t.parse::<u32>().ok());
        if timeout.is_some_and(|t| t > 200) {
            return Err(error(StatusCode::BAD_REQUEST, "timeout must be between 0 and 200"));
        }

        if document.is_empty() {
            return Err(error(StatusCode::BAD_REQUEST, "Empty document"));
        }

        self.next_id += 1;
        let whisper_hash = format!("{:06x}|job+{}/==", self.next_id * 7919, self.next_id);

        if let Some(rest) = document.strip_prefix(SCANNED_MARKER) {
            let (polls, text) = rest.split_once('\n').unwrap_or((rest, "scanned text"));
            self.jobs.insert(
                whisper_hash.clone(),
                Job {
                    state: JobState::Processing,
                    polls_remaining: polls.trim().parse().unwrap_or(0),
                    frozen: false,
                    text: text.to_owned(),
                },
            );
            return Ok(Outcome::Deferred { whisper_hash });
        }

        self.jobs.insert(
            whisper_hash.clone(),
            Job {
                state: JobState::Delivered,
                polls_remaining: 0,
                frozen: false,
                text: document.clone(),
            },
        );
        Ok(Outcome::Completed {
            whisper_hash,
            text: document,
        })
    }

    fn poll(&mut self, whisper_hash: &str) -> Result<&'static str, Response> {
        self.seen_hashes.push(whisper_hash.to_owned());

        if whisper_hash == MockServer::EXPIRED_HASH {
            return Ok("unknown");
        }

        let job = self
            .jobs
            .get_mut(whisper_hash)
            .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid whisper hash"))?;

        if job.state == JobState::Processing {
            if job.polls_remaining == 0 {
                job.state = JobState::Processed;
            } else if !job.frozen {
                job.polls_remaining -= 1;
            }
        }

        Ok(job.state.as_str())
    }

    fn take_result(&mut self, whisper_hash: &str) -> Result<String, Response> {
        self.seen_hashes.push(whisper_hash.to_owned());

        if whisper_hash == MockServer::EXPIRED_HASH {
            return Err(error(StatusCode::BAD_REQUEST, "Whisper hash has expired"));
        }

        let job = self
            .jobs
            .get_mut(whisper_hash)
            .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid whisper hash"))?;

        match job.state {
            JobState::Processed => {
                job.state = JobState::Delivered;
                Ok(job.text.clone())
            }
            JobState::Processing => Err(error(StatusCode::BAD_REQUEST, "Whisper is still processing")),
            JobState::Delivered => Err(error(StatusCode::BAD_REQUEST, "Whisper already delivered")),
        }
    }
}

/// HTTP server modelling both API versions under `/api/v2` and `/v1`.
pub(crate) struct MockServer {
    addr: SocketAddr,
    state: Shared,
}

impl MockServer {
    pub const API_KEY: &str = "test-key";
    /// Handle the server reports as `unknown`, like an expired job.
    pub const EXPIRED_HASH: &str = "expired|0000";

    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Shared::default();

        let v2 = Router::new()
            .route("/whisper", post(submit_v2))
            .route("/whisper-status", get(status_v2))
            .route("/whisper-retrieve", get(retrieve_v2))
            .route("/get-usage-info", get(usage_info))
            .route(
                "/whisper-manage-callback",
                post(register_webhook).get(webhook_details),
            )
            .route("/highlights", get(highlights));

        let v1 = Router::new()
            .route("/whisper", post(submit_v1))
            .route("/whisper-status", get(status_v1))
            .route("/whisper-retrieve", get(retrieve_v1))
            .route("/get-usage-info", get(usage_info))
            .route("/highlight-data", post(highlight_search));

        let app = Router::new()
            .nest("/api/v2", v2)
            .nest("/v1", v1)
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn client(&self, credentials: WhisperCredentials) -> WhisperClient {
        WhisperClient::new(self.config("api/v2"), credentials).unwrap()
    }

    pub fn legacy_client(&self, credentials: WhisperCredentials) -> LegacyClient {
        LegacyClient::new(self.config("v1"), credentials).unwrap()
    }

    /// A document the server defers, processed after `polls` status polls.
    pub fn scanned_document(polls: u32) -> Bytes {
        Bytes::from(format!("{SCANNED_MARKER}{polls}\nScanned page one\nScanned page two"))
    }

    /// Stops a job from advancing on further polls.
    pub fn freeze(&self, whisper_hash: &crate::whisper::WhisperHash) {
        if let Some(job) = self.state.lock().unwrap().jobs.get_mut(whisper_hash.as_str()) {
            job.frozen = true;
        }
    }

    /// Handles received by status and retrieve endpoints, in order.
    pub fn seen_hashes(&self) -> Vec<String> {
        self.state.lock().unwrap().seen_hashes.clone()
    }

    pub fn submissions(&self) -> usize {
        self.state.lock().unwrap().submissions
    }

    /// Query string of the most recent submission.
    pub fn last_query(&self) -> HashMap<String, String> {
        self.state.lock().unwrap().last_query.clone()
    }

    fn config(&self, path: &str) -> WhisperConfig {
        WhisperConfig::builder()
            .with_base_url(&format!("http://{}/{}", self.addr, path))
            .unwrap()
            .build()
            .unwrap()
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(key) if key == MockServer::API_KEY => Ok(()),
        _ => Err(error(StatusCode::UNAUTHORIZED, "Invalid API key")),
    }
}

fn hash_param<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<&'a str, Response> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "whisper hash is required"))
}

fn result_body(whisper_hash: Option<&str>, text: &str) -> Value {
    let mut body = json!({
        "result_text": text,
        "confidence_metadata": [],
        "metadata": {},
        "webhook_metadata": "",
    });
    if let Some(whisper_hash) = whisper_hash {
        body["whisper_hash"] = json!(whisper_hash);
    }
    body
}

async fn submit_v2(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
    body: Bytes,
) -> Reply {
    authorize(&headers)?;

    let document = String::from_utf8_lossy(&body).into_owned();
    let document = if params.get("url_in_post").is_some_and(|v| v == "true") {
        format!("Fetched {document}")
    } else {
        document
    };

    Ok(match state.lock().unwrap().submit(document, &params)? {
        Outcome::Completed { whisper_hash, text } => {
            Json(result_body(Some(&whisper_hash), &text)).into_response()
        }
        Outcome::Deferred { whisper_hash } => (
            StatusCode::ACCEPTED,
            Json(json!({
                "message": "Whisper Job Accepted",
                "status": "processing",
                "whisper_hash": whisper_hash,
            })),
        )
            .into_response(),
    })
}

async fn submit_v1(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
    body: Bytes,
) -> Reply {
    authorize(&headers)?;

    let document = match params.get("url") {
        Some(url) => format!("Fetched {url}"),
        None => String::from_utf8_lossy(&body).into_owned(),
    };

    Ok(match state.lock().unwrap().submit(document, &params)? {
        Outcome::Completed { whisper_hash, text } => (
            [
                (header::CONTENT_TYPE, "text/plain".to_owned()),
                (HeaderName::from_static(WHISPER_HASH_HEADER), whisper_hash),
            ],
            text,
        )
            .into_response(),
        Outcome::Deferred { whisper_hash } => (
            StatusCode::ACCEPTED,
            Json(json!({
                "message": "Whisper Job Accepted",
                "status": "processing",
                "whisper-hash": whisper_hash,
            })),
        )
            .into_response(),
    })
}

async fn status_v2(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    status(&state, &headers, &params, "whisper_hash")
}

async fn status_v1(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    status(&state, &headers, &params, "whisper-hash")
}

fn status(
    state: &Shared,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
    key: &str,
) -> Reply {
    authorize(headers)?;
    let whisper_hash = hash_param(params, key)?;
    let status = state.lock().unwrap().poll(whisper_hash)?;
    Ok(Json(json!({ "status": status, "message": "Whisper status" })).into_response())
}

async fn retrieve_v2(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    authorize(&headers)?;
    let whisper_hash = hash_param(&params, "whisper_hash")?;
    let text = state.lock().unwrap().take_result(whisper_hash)?;
    Ok(Json(result_body(None, &text)).into_response())
}

async fn retrieve_v1(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    authorize(&headers)?;
    let whisper_hash = hash_param(&params, "whisper-hash")?;
    let text = state.lock().unwrap().take_result(whisper_hash)?;
    Ok(([(header::CONTENT_TYPE, "text/plain")], text).into_response())
}

async fn usage_info(headers: HeaderMap) -> Reply {
    authorize(&headers)?;
    Ok(Json(json!({
        "current_page_count": 70,
        "current_page_count_low_cost": 10,
        "current_page_count_form": 20,
        "current_page_count_high_quality": 30,
        "current_page_count_native_text": 10,
        "daily_quota": 1000,
        "monthly_quota": 20000,
        "overage_page_count": 0,
        "subscription_plan": "Pro",
        "today_page_count": 12,
    }))
    .into_response())
}

async fn register_webhook(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    authorize(&headers)?;
    let name = body["webhook_name"]
        .as_str()
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "webhook_name is required"))?
        .to_owned();
    state.lock().unwrap().webhooks.insert(name, body);
    Ok(Json(json!({ "message": "Webhook created successfully", "status": "success" }))
        .into_response())
}

async fn webhook_details(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    authorize(&headers)?;
    let name = params.get("webhook_name").map(String::as_str).unwrap_or_default();
    let state = state.lock().unwrap();
    let webhook = state
        .webhooks
        .get(name)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Webhook details not found"))?;
    Ok(Json(json!({
        "status": "success",
        "webhook_details": {
            "url": webhook["url"],
            "webhook_name": webhook["webhook_name"],
        },
    }))
    .into_response())
}

async fn highlights(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    authorize(&headers)?;
    let whisper_hash = hash_param(&params, "whisper_hash")?;
    let lines = params.get("lines").map(String::as_str).unwrap_or_default();

    let state = state.lock().unwrap();
    let job = state
        .jobs
        .get(whisper_hash)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid whisper hash"))?;
    let line_count = job.text.lines().count() as u32;

    let data = parse_lines(lines)
        .into_iter()
        .filter(|line| (1..=line_count).contains(line))
        .map(line_entry)
        .collect();

    Ok(Json(Value::Object(data)).into_response())
}

async fn highlight_search(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Params,
    body: String,
) -> Reply {
    authorize(&headers)?;
    let whisper_hash = hash_param(&params, "whisper-hash")?;
    let needle = body.to_lowercase();

    let state = state.lock().unwrap();
    let job = state
        .jobs
        .get(whisper_hash)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Invalid whisper hash"))?;

    let data = job
        .text
        .lines()
        .zip(1u32..)
        .filter(|(text, _)| !needle.is_empty() && text.to_lowercase().contains(&needle))
        .map(|(_, line)| line_entry(line))
        .collect();

    Ok(Json(Value::Object(data)).into_response())
}

/// Position of a line, one line every 100 units on a single page.
fn line_entry(line: u32) -> (String, Value) {
    let base_y = 100 * line + 55;
    let entry = json!({
        "page": 0,
        "base_y": base_y,
        "base_y_percent": f64::from(base_y) * 100.0 / 3168.0,
        "height": 51,
        "height_percent": 51.0 * 100.0 / 3168.0,
        "page_height": 3168,
        "raw": [0, base_y, 51, 3168],
    });
    (line.to_string(), entry)
}

fn parse_lines(ranges: &str) -> Vec<u32> {
    ranges.split(',')
        .filter_map(|part| match part.split_once('-') {
            Some((start, end)) => {
                let start = start.trim().parse::<u32>().ok()?;
                let end = end.trim().parse::<u32>().ok()?;
                Some((start..=end).collect())
            }
            None => part.trim().parse().ok().map(|line| vec![line]),
        })
        .flatten()
        .collect()
}
