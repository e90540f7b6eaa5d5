//! In-process fake transports shared by the integration tests.
//!
//! A [`FakeServer`] holds canned replies keyed by the request path below the
//! API root (`KEY/getprice`, or `KEY` for the status endpoint) and records
//! every request it sees. Blocking and async fakes read from the same state.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use px6_client::{
    AsyncConnector, AsyncHttpClient, AsyncProxy6, ClientConfig, HttpClient, Proxy6,
    TransportError,
};

pub const API_KEY: &str = "KEY";
pub const BASE_URL: &str = "http://fake.local/api";

#[derive(Clone, Debug)]
pub enum Reply {
    Body(String),
    Status(u16),
    Timeout,
    /// Never answers (async only).
    Hang,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Recorded {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct State {
    replies: HashMap<String, Reply>,
    requests: Vec<Recorded>,
    open_sessions: usize,
    connects: usize,
}

#[derive(Clone, Default)]
pub struct FakeServer {
    state: Arc<Mutex<State>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `operation` with `body`.
    pub fn respond(&self, operation: &str, body: &str) -> &Self {
        self.reply(operation, Reply::Body(body.to_string()))
    }

    pub fn reply(&self, operation: &str, reply: Reply) -> &Self {
        let path = if operation.is_empty() {
            API_KEY.to_string()
        } else {
            format!("{API_KEY}/{operation}")
        };
        self.state.lock().unwrap().replies.insert(path, reply);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    pub fn open_sessions(&self) -> usize {
        self.state.lock().unwrap().open_sessions
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    fn handle(&self, url: &str, query_params: &[(&str, String)]) -> Reply {
        let path = url
            .split_once("/api/")
            .map(|(_, path)| path.to_string())
            .unwrap_or_default();
        let mut state = self.state.lock().unwrap();
        state.requests.push(Recorded {
            path: path.clone(),
            query: query_params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        state.replies.get(&path).cloned().unwrap_or(Reply::Status(404))
    }

    pub fn blocking(&self) -> Proxy6<FakeHttp> {
        Proxy6::with_http_client(API_KEY, &config(), FakeHttp(self.clone())).unwrap()
    }

    pub fn scoped(&self) -> AsyncProxy6<FakeConnector> {
        AsyncProxy6::with_connector(API_KEY, config(), FakeConnector::new(self.clone())).unwrap()
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::default().with_base_url(BASE_URL)
}

fn into_result(reply: Reply) -> Result<String, TransportError> {
    match reply {
        Reply::Body(body) => Ok(body),
        Reply::Status(status) => Err(TransportError::Status { status }),
        Reply::Timeout => Err(TransportError::Timeout),
        Reply::Hang => Err(TransportError::Request("blocking fake cannot hang".to_string())),
    }
}

pub struct FakeHttp(pub FakeServer);

impl HttpClient for FakeHttp {
    fn get(&self, url: &str, query_params: &[(&str, String)]) -> Result<String, TransportError> {
        into_result(self.0.handle(url, query_params))
    }
}

pub struct FakeSession {
    server: FakeServer,
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.server.state.lock().unwrap().open_sessions -= 1;
    }
}

#[async_trait]
impl AsyncHttpClient for FakeSession {
    async fn get(&self, url: &str, query_params: &[(&str, String)]) -> Result<String, TransportError> {
        let reply = self.server.handle(url, query_params);
        // let other calls interleave
        tokio::task::yield_now().await;
        match reply {
            Reply::Hang => futures::future::pending().await,
            reply => into_result(reply),
        }
    }
}

pub struct FakeConnector {
    server: FakeServer,
    pub refuse: bool,
}

impl FakeConnector {
    pub fn new(server: FakeServer) -> Self {
        Self {
            server,
            refuse: false,
        }
    }
}

#[async_trait]
impl AsyncConnector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self, _config: &ClientConfig) -> Result<FakeSession, TransportError> {
        if self.refuse {
            return Err(TransportError::Client("refused".to_string()));
        }
        let mut state = self.server.state.lock().unwrap();
        state.open_sessions += 1;
        state.connects += 1;
        Ok(FakeSession {
            server: self.server.clone(),
        })
    }
}
