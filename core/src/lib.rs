//! Synchronous API client for the comments service.
//!
//! # Overview
//! Lists, creates and updates comments over HTTP/JSON. Responses are checked
//! by a validator before any `Comment` is built, and every failure leaves the
//! client as exactly one `ApiError` variant.
//!
//! # Design
//! - `CommentsClient` holds its configuration and one `Transport` handle and
//!   nothing else; it carries no mutable state between calls.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response). `get_comments` / `create_comment` / `update_comment`
//!   join the two through the transport. Hosts doing their own I/O can call
//!   the pair directly.
//! - The transport is injected, so tests substitute a closure for the network.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod types;
pub mod validation;

pub use client::CommentsClient;
pub use config::{AuthorizationProvider, ClientConfig, EmptyAuthorization};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{Comment, CreateComment, UpdateComment};
