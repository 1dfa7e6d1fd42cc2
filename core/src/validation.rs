//! Response payload validation.
//!
//! # Design
//! The required fields are a fixed, ordered table of `(name, FieldKind)`
//! pairs. Every entry is checked against every field and all problems are
//! collected before failing, so a malformed integration is reported in one
//! pass. Entries that pass come out as `ValidatedComment`, which is the only
//! input `Comment::from_response` accepts.

use serde_json::Value;

use crate::error::ApiError;

pub const NO_COMMENTS: &str = "no comments in response";

/// Expected JSON type of a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    String,
}

impl FieldKind {
    /// Rule name reported when a value has the wrong type.
    pub fn rule(self) -> &'static str {
        match self {
            FieldKind::Integer => "is_int",
            FieldKind::String => "is_string",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::Integer => value.as_i64().is_some(),
            FieldKind::String => value.is_string(),
        }
    }
}

/// Required comment fields, in reporting order.
pub const REQUIRED_FIELDS: [(&str, FieldKind); 3] = [
    ("id", FieldKind::Integer),
    ("name", FieldKind::String),
    ("text", FieldKind::String),
];

/// One `comments` entry that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedComment {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) text: String,
}

/// Check a decoded response body and return its comment entries in order.
///
/// Fails with `"no comments in response"` when `comments` is missing or is
/// not a non-empty array; otherwise fails with every field problem joined by
/// `"; "`.
pub fn validate_payload(payload: &Value) -> Result<Vec<ValidatedComment>, ApiError> {
    let entries = match payload.get("comments").and_then(Value::as_array) {
        Some(entries) if !entries.is_empty() => entries,
        _ => return Err(ApiError::invalid_payload(NO_COMMENTS)),
    };

    let mut problems = Vec::new();
    let validated: Vec<ValidatedComment> = entries
        .iter()
        .filter_map(|entry| check_entry(entry, &mut problems))
        .collect();

    if problems.is_empty() {
        Ok(validated)
    } else {
        Err(ApiError::invalid_payload(problems.join("; ")))
    }
}

/// Check a single comment object on its own.
pub fn validate_comment(entry: &Value) -> Result<ValidatedComment, ApiError> {
    let mut problems = Vec::new();
    match check_entry(entry, &mut problems) {
        Some(validated) if problems.is_empty() => Ok(validated),
        _ => Err(ApiError::invalid_payload(problems.join("; "))),
    }
}

fn check_entry(entry: &Value, problems: &mut Vec<String>) -> Option<ValidatedComment> {
    let before = problems.len();
    for (field, kind) in REQUIRED_FIELDS {
        match entry.get(field) {
            None | Some(Value::Null) => {
                problems.push(format!("payload field {field} is empty"));
            }
            Some(value) if !kind.matches(value) => {
                problems.push(format!(
                    "payload field {field} has unexpected type, rule: {}",
                    kind.rule()
                ));
            }
            Some(_) => {}
        }
    }
    if problems.len() != before {
        return None;
    }

    Some(ValidatedComment {
        id: entry.get("id")?.as_i64()?,
        name: entry.get("name")?.as_str()?.to_string(),
        text: entry.get("text")?.as_str()?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(payload: Value) -> String {
        validate_payload(&payload).unwrap_err().to_string()
    }

    #[test]
    fn missing_comments_key() {
        assert_eq!(message(json!({})), NO_COMMENTS);
    }

    #[test]
    fn empty_comments_list() {
        assert_eq!(message(json!({ "comments": [] })), NO_COMMENTS);
    }

    #[test]
    fn comments_not_an_array() {
        assert_eq!(message(json!({ "comments": null })), NO_COMMENTS);
        assert_eq!(message(json!({ "comments": "x" })), NO_COMMENTS);
        assert_eq!(message(json!([1, 2])), NO_COMMENTS);
    }

    #[test]
    fn entry_without_required_fields() {
        assert_eq!(
            message(json!({ "comments": [{ "foo": "bar" }] })),
            "payload field id is empty; payload field name is empty; payload field text is empty"
        );
    }

    #[test]
    fn wrong_types_report_rule() {
        assert_eq!(
            message(json!({ "comments": [{ "id": "1", "name": 2, "text": "t" }] })),
            "payload field id has unexpected type, rule: is_int; \
             payload field name has unexpected type, rule: is_string"
        );
    }

    #[test]
    fn float_id_is_not_an_integer() {
        assert_eq!(
            message(json!({ "comments": [{ "id": 1.5, "name": "n", "text": "t" }] })),
            "payload field id has unexpected type, rule: is_int"
        );
    }

    #[test]
    fn null_field_counts_as_empty() {
        assert_eq!(
            message(json!({ "comments": [{ "id": 1, "name": null, "text": "t" }] })),
            "payload field name is empty"
        );
    }

    #[test]
    fn problems_are_ordered_by_entry_then_field() {
        let payload = json!({ "comments": [
            { "id": 1, "name": "ok", "text": "ok" },
            { "id": 2, "text": 3 },
            { "name": "n", "text": "t" },
        ]});
        assert_eq!(
            message(payload),
            "payload field name is empty; \
             payload field text has unexpected type, rule: is_string; \
             payload field id is empty"
        );
    }

    #[test]
    fn non_object_entry_has_no_fields() {
        assert_eq!(
            message(json!({ "comments": [42] })),
            "payload field id is empty; payload field name is empty; payload field text is empty"
        );
    }

    #[test]
    fn valid_payload_keeps_order() {
        let payload = json!({ "comments": [
            { "id": 2, "name": "b", "text": "y" },
            { "id": 1, "name": "a", "text": "x" },
        ]});
        let entries = validate_payload(&payload).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 2);
        assert_eq!(entries[1].name, "a");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let entry = json!({ "id": 7, "name": "n", "text": "t", "author": "x" });
        let validated = validate_comment(&entry).unwrap();
        assert_eq!(validated.id, 7);
    }

    #[test]
    fn empty_strings_are_valid() {
        let entry = json!({ "id": 0, "name": "", "text": "" });
        assert!(validate_comment(&entry).is_ok());
    }
}
