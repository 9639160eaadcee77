//! In-memory `Transport` for tests: canned responses keyed by request target,
//! with a log of every target requested.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::github::transport::{ApiRequest, RawResponse, Transport, TransportError};

type Reply = std::result::Result<RawResponse, TransportError>;

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
    fallback: Option<RawResponse>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reply for every target that has no scripted route.
    pub fn respond_to_anything(mut self, status: u16, body: &str) -> Self {
        self.fallback = Some(RawResponse {
            status,
            headers: HeaderMap::new(),
            body: body.to_string(),
        });
        self
    }

    pub fn respond(self, target: &str, status: u16, body: &str) -> Self {
        self.respond_with_headers(target, status, &[], body)
    }

    pub fn respond_with_headers(
        self,
        target: &str,
        status: u16,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        self.push(
            target,
            Ok(RawResponse {
                status,
                headers: map,
                body: body.to_string(),
            }),
        )
    }

    pub fn fail(self, target: &str, error: TransportError) -> Self {
        self.push(target, Err(error))
    }

    fn push(self, target: &str, reply: Reply) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(target.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn targets(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(ApiRequest::target)
            .collect()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.targets().iter().filter(|t| t.starts_with(prefix)).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, request: &ApiRequest) -> Reply {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let target = request.target();
        let reply = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&target) {
                // The last scripted reply for a target repeats.
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => self.fallback.clone().map(Ok),
            }
        };

        reply.unwrap_or_else(|| {
            Ok(RawResponse {
                status: 501,
                headers: HeaderMap::new(),
                body: format!("no scripted response for {}", target),
            })
        })
    }
}
