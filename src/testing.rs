use std::{
    collections::VecDeque,
    sync::{Mutex, OnceLock},
    thread::{self, ThreadId},
};

use log::{Level, LevelFilter, Log, Metadata, Record};
use reqwest::StatusCode;

use crate::client::{RawResponse, Request, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub key: Option<String>,
}

/// Replays canned responses in order and records what was asked for.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse, reqwest::Error>>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Result<RawResponse, reqwest::Error>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            seen: Mutex::new(vec![]),
        }
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: &Request<'_>) -> Result<RawResponse, reqwest::Error> {
        self.seen.lock().unwrap().push(SeenRequest {
            url: request.url.clone(),
            params: request.params.to_vec(),
            key: request
                .key
                .map(|key| key.header_value().to_str().unwrap().to_string()),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport script exhausted")
    }
}

pub fn ok(body: &str) -> RawResponse {
    RawResponse {
        status: StatusCode::OK,
        retry_after: None,
        body: body.to_string(),
    }
}

pub fn rate_limited(retry_after: Option<&str>) -> RawResponse {
    RawResponse {
        status: StatusCode::TOO_MANY_REQUESTS,
        retry_after: retry_after.map(str::to_string),
        body: r#"{"status": {"message": "Rate limit exceeded", "status_code": 429}}"#.to_string(),
    }
}

pub fn failure(code: u16, body: &str) -> RawResponse {
    RawResponse {
        status: StatusCode::from_u16(code).unwrap(),
        retry_after: None,
        body: body.to_string(),
    }
}

/// A real `reqwest::Error`, produced without touching the network.
pub fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err()
}

#[derive(Debug, Clone)]
pub struct CapturedLog {
    pub level: Level,
    pub message: String,
}

struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, CapturedLog)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let captured = CapturedLog {
            level: record.level(),
            message: record.args().to_string(),
        };
        self.records
            .lock()
            .unwrap()
            .push((thread::current().id(), captured));
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<CaptureLogger> = OnceLock::new();

/// Installs the in-memory logger and forgets what this thread logged so far.
///
/// Tests run on separate threads, so records are kept per thread.
pub fn start_log_capture() {
    let logger = LOGGER.get_or_init(|| CaptureLogger {
        records: Mutex::new(vec![]),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
    let current = thread::current().id();
    logger.records.lock().unwrap().retain(|(id, _)| *id != current);
}

pub fn captured_logs() -> Vec<CapturedLog> {
    let current = thread::current().id();
    LOGGER
        .get()
        .map(|logger| {
            logger
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, _)| *id == current)
                .map(|(_, record)| record.clone())
                .collect()
        })
        .unwrap_or_default()
}
