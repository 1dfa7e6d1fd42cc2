//! Request builder, response parser and transport orchestration for the
//! comments API.
//!
//! # Design
//! `CommentsClient` holds its `ClientConfig` and one shared `Transport`
//! handle and carries no mutable state between calls. Each operation is split
//! into a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`; the one-shot methods run the
//! request through the transport in between. Every failure is mapped to one
//! `ApiError` variant before it leaves this module.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{Comment, CreateComment, UpdateComment};
use crate::validation::{self, ValidatedComment, NO_COMMENTS};

/// Message for any non-2xx response that is not a 401/403 carrying a message.
pub const REQUEST_FAILED: &str = "unable to perform comments request";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    GetComments,
    CreateComment,
    UpdateComment,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::GetComments => "get comments",
            Operation::CreateComment => "create comment",
            Operation::UpdateComment => "update comment",
        }
    }

    fn failure_message(self) -> String {
        format!("unable to perform {} request", self.name())
    }
}

/// Synchronous client for the comments API.
#[derive(Clone)]
pub struct CommentsClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl CommentsClient {
    /// Client backed by a `ureq` agent using the configured timeout.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.request_timeout());
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn get_comments(&self) -> Result<Vec<Comment>, ApiError> {
        let op = Operation::GetComments;
        let request = self.build_get_comments();
        self.send(op, &request)
            .and_then(|response| self.parse_get_comments(response))
            .inspect_err(|err| log_failure(op, err))
    }

    pub fn create_comment(&self, input: &CreateComment) -> Result<Comment, ApiError> {
        let op = Operation::CreateComment;
        self.build_create_comment(input)
            .and_then(|request| self.send(op, &request))
            .and_then(|response| self.parse_create_comment(response))
            .inspect_err(|err| log_failure(op, err))
    }

    pub fn update_comment(&self, input: &UpdateComment) -> Result<Comment, ApiError> {
        let op = Operation::UpdateComment;
        self.build_update_comment(input)
            .and_then(|request| self.send(op, &request))
            .and_then(|response| self.parse_update_comment(response))
            .inspect_err(|err| log_failure(op, err))
    }

    pub fn build_get_comments(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "comments", None)
    }

    pub fn build_create_comment(&self, input: &CreateComment) -> Result<HttpRequest, ApiError> {
        let body = encode(Operation::CreateComment, input)?;
        Ok(self.request(HttpMethod::Post, "comment", Some(body)))
    }

    pub fn build_update_comment(&self, input: &UpdateComment) -> Result<HttpRequest, ApiError> {
        let body = encode(Operation::UpdateComment, input)?;
        let path = format!("comment/{}", input.id());
        Ok(self.request(HttpMethod::Put, &path, Some(body)))
    }

    pub fn parse_get_comments(&self, response: HttpResponse) -> Result<Vec<Comment>, ApiError> {
        let entries = parse_payload(Operation::GetComments, response)?;
        Ok(entries.into_iter().map(Comment::from_response).collect())
    }

    pub fn parse_create_comment(&self, response: HttpResponse) -> Result<Comment, ApiError> {
        first_comment(parse_payload(Operation::CreateComment, response)?)
    }

    pub fn parse_update_comment(&self, response: HttpResponse) -> Result<Comment, ApiError> {
        first_comment(parse_payload(Operation::UpdateComment, response)?)
    }

    fn request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}/{path}", self.config.base_url),
            headers: vec![
                ("User-Agent".to_string(), self.config.user_agent()),
                ("Content-Type".to_string(), "application/json".to_string()),
                (
                    "Authorization".to_string(),
                    self.config.authorization.authorization(),
                ),
            ],
            body,
        }
    }

    fn send(&self, op: Operation, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            operation = op.name(),
            method = request.method.as_str(),
            url = %request.url,
            "sending comments request"
        );
        let response = self
            .transport
            .execute(request)
            .map_err(|err| ApiError::transport(op.failure_message(), err))?;
        debug!(operation = op.name(), status = response.status, "received response");
        Ok(response)
    }
}

impl fmt::Debug for CommentsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentsClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn encode(op: Operation, input: &impl Serialize) -> Result<String, ApiError> {
    serde_json::to_string(input)
        .map_err(|err| ApiError::transport(op.failure_message(), TransportError::Encode(err)))
}

/// Classify non-2xx responses, decode the body and run the validator.
fn parse_payload(op: Operation, response: HttpResponse) -> Result<Vec<ValidatedComment>, ApiError> {
    if !response.is_success() {
        return Err(classify_status(response));
    }
    let payload: Value = serde_json::from_str(&response.body)
        .map_err(|err| ApiError::transport(op.failure_message(), TransportError::Decode(err)))?;
    validation::validate_payload(&payload)
}

/// Only the first entry is used; the server is expected to return exactly
/// the affected comment.
fn first_comment(entries: Vec<ValidatedComment>) -> Result<Comment, ApiError> {
    entries
        .into_iter()
        .next()
        .map(Comment::from_response)
        .ok_or_else(|| ApiError::invalid_payload(NO_COMMENTS))
}

/// Map a non-2xx response to `Unauthorized`, `Forbidden` or `Transport`.
fn classify_status(response: HttpResponse) -> ApiError {
    match (response.status, error_message(&response.body)) {
        (401, Some(message)) => ApiError::Unauthorized { message },
        (403, Some(message)) => ApiError::Forbidden { message },
        (status, _) => ApiError::transport(
            REQUEST_FAILED,
            TransportError::Status {
                status,
                body: response.body,
            },
        ),
    }
}

/// Non-empty `errors.message` from an error body, if the body has one.
fn error_message(body: &str) -> Option<String> {
    let decoded: Value = serde_json::from_str(body).ok()?;
    decoded
        .get("errors")?
        .get("message")?
        .as_str()
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn log_failure(op: Operation, err: &ApiError) {
    let status = match err {
        ApiError::Transport {
            source: TransportError::Status { status, .. },
            ..
        } => Some(*status),
        _ => None,
    };
    warn!(
        operation = op.name(),
        kind = err.kind(),
        status,
        error = %err,
        "comments request failed"
    );
}
