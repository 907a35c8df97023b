//! Scripted in-memory transport for driving the client in unit tests

use super::errors::TransportError;
use super::transport::{ApiResponse, RequestContext, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One request as the transport saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub bearer: Option<String>,
}

/// Answers each path from a queue of canned responses, in order.
/// A path with no response left fails with a transport error.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<ApiResponse, String>>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, path: &str, status: u16, body: Value) -> Self {
        self.push(path, Ok(ApiResponse::new(status, body)));
        self
    }

    pub fn fail(self, path: &str, message: &str) -> Self {
        self.push(path, Err(message.to_string()));
        self
    }

    fn push(&self, path: &str, response: Result<ApiResponse, String>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }

    fn answer(
        &self,
        method: &'static str,
        ctx: &RequestContext,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            bearer: ctx.bearer_token().map(str::to_string),
        });

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError(message)),
            None => Err(TransportError(format!("no scripted response for {}", path))),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(
        &self,
        ctx: &RequestContext,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<ApiResponse, TransportError> {
        self.answer("GET", ctx, path, params)
    }

    async fn post_form(
        &self,
        ctx: &RequestContext,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<ApiResponse, TransportError> {
        self.answer("POST", ctx, path, form)
    }
}
