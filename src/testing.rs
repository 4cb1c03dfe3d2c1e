//! In-crate client double for unit tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::client::{BackendResponse, ElasticClient};
use crate::error::BoxError;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Reply {
    Status(u16, &'static str),
    Transport(&'static str),
    /// Fails the test when the call happens.
    Forbidden,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Exists(String),
    Create(String),
    Write(String, serde_json::Value),
}

pub(crate) struct MockClient {
    pub exists: Reply,
    pub create: Reply,
    pub write: Reply,
    pub calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn new(exists: Reply, create: Reply, write: Reply) -> Self {
        MockClient {
            exists,
            create,
            write,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Index present, writes answered with 201.
    pub fn ready() -> Self {
        Self::new(Reply::Status(200, ""), Reply::Forbidden, Reply::Status(201, "{}"))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn answer(reply: Reply, what: &str) -> Result<BackendResponse, BoxError> {
    match reply {
        Reply::Status(status, body) => Ok(BackendResponse::new(status, body)),
        Reply::Transport(msg) => Err(msg.into()),
        Reply::Forbidden => panic!("unexpected backend call: {}", what),
    }
}

#[async_trait]
impl ElasticClient for MockClient {
    async fn index_exists(&self, index: &str) -> Result<u16, BoxError> {
        self.record(Call::Exists(index.to_string()));
        answer(self.exists, "index_exists").map(|resp| resp.status)
    }

    async fn create_index(&self, index: &str) -> Result<BackendResponse, BoxError> {
        self.record(Call::Create(index.to_string()));
        answer(self.create, "create_index")
    }

    async fn index_document(&self, index: &str, body: Vec<u8>) -> Result<BackendResponse, BoxError> {
        let reply = answer(self.write, "index_document");
        let doc = serde_json::from_slice(&body).expect("document is valid JSON");
        self.record(Call::Write(index.to_string(), doc));
        reply
    }
}
