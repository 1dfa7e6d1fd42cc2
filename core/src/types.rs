//! Domain types for the comments API.
//!
//! # Design
//! `Comment` is received, never sent, so it only serializes (for `to_value`)
//! and is built solely from a `ValidatedComment`. The DTOs are the writable
//! fields of create/update requests and only serialize.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::validation::{self, ValidatedComment};

/// A single comment returned by the API.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Comment {
    id: i64,
    name: String,
    text: String,
}

impl Comment {
    pub fn from_response(fields: ValidatedComment) -> Self {
        Self {
            id: fields.id,
            name: fields.name,
            text: fields.text,
        }
    }

    /// Validate a single `{id, name, text}` object and build a comment from it.
    pub fn from_value(value: &Value) -> Result<Self, ApiError> {
        validation::validate_comment(value).map(Self::from_response)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The canonical `{id, name, text}` mapping.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "text": self.text,
        })
    }
}

/// Request payload for creating a comment. Empty strings are allowed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateComment {
    pub name: String,
    pub text: String,
}

impl CreateComment {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Request payload for updating an existing comment. `id` selects the
/// target and goes in the path; only the fields that are `Some` are sent,
/// and omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateComment {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl UpdateComment {
    pub fn new(id: i64, name: Option<String>, text: Option<String>) -> Self {
        Self { id, name, text }
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comment_roundtrips_through_value() {
        let original = json!({ "id": 3, "name": "ann", "text": "hello" });
        let comment = Comment::from_value(&original).unwrap();
        assert_eq!(comment.id(), 3);
        assert_eq!(comment.name(), "ann");
        assert_eq!(comment.text(), "hello");
        assert_eq!(comment.to_value(), original);
        assert_eq!(Comment::from_value(&comment.to_value()).unwrap(), comment);
    }

    #[test]
    fn comment_from_invalid_value_fails() {
        let err = Comment::from_value(&json!({ "id": 1, "name": "n" })).unwrap_err();
        assert!(matches!(err, ApiError::InvalidPayload { .. }));
        assert_eq!(err.to_string(), "payload field text is empty");
    }

    #[test]
    fn create_comment_serializes_name_and_text() {
        let body = serde_json::to_string(&CreateComment::new("name", "text")).unwrap();
        assert_eq!(body, r#"{"name":"name","text":"text"}"#);
    }

    #[test]
    fn create_comment_keeps_empty_strings() {
        let body = serde_json::to_value(CreateComment::new("", "")).unwrap();
        assert_eq!(body, json!({ "name": "", "text": "" }));
    }

    #[test]
    fn update_comment_omits_absent_fields() {
        let name_only = UpdateComment::new(1, Some("name".to_string()), None);
        assert_eq!(serde_json::to_string(&name_only).unwrap(), r#"{"name":"name"}"#);

        let text_only = UpdateComment::new(1, None, Some("text".to_string()));
        assert_eq!(serde_json::to_string(&text_only).unwrap(), r#"{"text":"text"}"#);

        let both = UpdateComment::new(1, Some("name".to_string()), Some("text".to_string()));
        assert_eq!(
            serde_json::to_string(&both).unwrap(),
            r#"{"name":"name","text":"text"}"#
        );
    }

    #[test]
    fn update_comment_with_nothing_set_is_empty_object() {
        let empty = UpdateComment::new(9, None, None);
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");
        assert_eq!(empty.id(), 9);
    }
}
