//! Request validation.
//!
//! Everything here runs before the engine is touched, so a rejected request
//! never leaves partial state behind.

use serde::Deserialize;
use thiserror::Error;

use crate::intake::{InboundMessage, MessageFields};
use crate::policy::{ArchiveVisibility, SubscribePolicy};
use crate::Outcome;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum list name length.
pub const MAX_LIST_NAME_LENGTH: usize = 64;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Address is missing or malformed.
    #[error("invalid email address")]
    InvalidEmail,

    /// Admin password is missing or empty.
    #[error("admin password must not be empty")]
    InvalidPassword,

    /// A creation parameter is not an integer.
    #[error("parameter {0} must be an integer")]
    InvalidParams(String),

    /// List name is empty, too long or has forbidden characters.
    #[error("invalid list name")]
    InvalidListName,

    /// Inbound message lacks required fields.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A header-bound message field contains a line break.
    #[error("field {0} must be a single line")]
    MultilineField(&'static str),
}

impl ValidationError {
    /// Outcome code reported for this rejection.
    pub fn outcome(&self) -> Outcome {
        match self {
            ValidationError::InvalidEmail => Outcome::InvalidEmail,
            ValidationError::InvalidPassword => Outcome::InvalidPassword,
            ValidationError::InvalidParams(_) | ValidationError::InvalidListName => {
                Outcome::InvalidParams
            }
            ValidationError::MissingFields(_) | ValidationError::MultilineField(_) => {
                Outcome::MissingFields
            }
        }
    }
}

/// A loosely typed request value.
///
/// JSON bodies carry real numbers; form bodies carry everything as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Text(String),
    Other(serde_json::Value),
}

impl ParamValue {
    /// Interpret the value as an integer, accepting numeric strings.
    ///
    /// Integers too large for `i64` saturate, which keeps them outside every
    /// valid code range instead of making them unparseable.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(n) => Some(*n),
            ParamValue::Text(s) => parse_integer_text(s.trim()),
            ParamValue::Other(serde_json::Value::Number(n)) => {
                if let Some(u) = n.as_u64() {
                    return Some(i64::try_from(u).unwrap_or(i64::MAX));
                }
                // Integral literals beyond u64 arrive as floats.
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }
            ParamValue::Other(_) => None,
        }
    }

    /// Render the value as text.
    pub fn to_text(&self) -> String {
        match self {
            ParamValue::Integer(n) => n.to_string(),
            ParamValue::Text(s) => s.clone(),
            ParamValue::Other(serde_json::Value::Null) => String::new(),
            ParamValue::Other(v) => v.to_string(),
        }
    }
}

fn parse_integer_text(text: &str) -> Option<i64> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(n);
    }

    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Normalize an address for comparison and storage.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Normalize a list name for lookup.
pub fn normalize_list_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Validate an email address and return its normalized form.
///
/// Requires exactly one `@`, a non-empty local part and a domain with at
/// least one dot and no empty labels.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = normalize_address(email);

    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail);
    }

    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::InvalidEmail);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };

    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ValidationError::InvalidEmail);
    }

    if domain.split('.').any(|label| label.is_empty()) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(email)
}

/// Validate a new list name and return its normalized form.
///
/// Allowed: ASCII alphanumerics, `-`, `_` and `.`.
pub fn validate_list_name(name: &str) -> Result<String, ValidationError> {
    let name = normalize_list_name(name);

    if name.is_empty() || name.len() > MAX_LIST_NAME_LENGTH {
        return Err(ValidationError::InvalidListName);
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(ValidationError::InvalidListName);
    }

    Ok(name)
}

/// Validate the admin password supplied at list creation.
pub fn validate_password(password: Option<&str>) -> Result<&str, ValidationError> {
    match password {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(ValidationError::InvalidPassword),
    }
}

/// Parse an optional integer parameter.
///
/// Absent is fine; present but not an integer fails the whole request.
pub fn parse_int_param(
    name: &str,
    value: Option<&ParamValue>,
) -> Result<Option<i64>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) => v
            .as_integer()
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidParams(name.to_string())),
    }
}

/// Pick the subscribe policy to store for a new list.
///
/// Out-of-range values fall back to `default`. Open subscription is only
/// honoured when the site allows it.
pub fn normalize_subscribe_policy(
    value: Option<i64>,
    default: SubscribePolicy,
    allow_open: bool,
) -> SubscribePolicy {
    match value.and_then(SubscribePolicy::from_code) {
        Some(SubscribePolicy::Open) if !allow_open => default,
        Some(policy) => policy,
        None => default,
    }
}

/// Pick the archive visibility to store for a new list.
pub fn normalize_archive_private(value: Option<i64>, default: ArchiveVisibility) -> ArchiveVisibility {
    value.and_then(ArchiveVisibility::from_code).unwrap_or(default)
}

/// Check that every required field of an inbound message is present.
pub fn validate_message(fields: &MessageFields) -> Result<InboundMessage, ValidationError> {
    fn present(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    let required = [
        ("email_to", &fields.recipient),
        ("message_id", &fields.message_id),
        ("ip_from", &fields.origin_ip),
        ("timestamp", &fields.timestamp),
        ("name_from", &fields.sender_name),
        ("email_from", &fields.sender_address),
        ("subject", &fields.subject),
        ("body", &fields.body),
    ];

    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let header_bound = [
        ("email_to", &fields.recipient),
        ("message_id", &fields.message_id),
        ("ip_from", &fields.origin_ip),
        ("timestamp", &fields.timestamp),
        ("name_from", &fields.sender_name),
        ("email_from", &fields.sender_address),
        ("subject", &fields.subject),
        ("in_reply_to", &fields.in_reply_to),
    ];
    if let Some((name, _)) = header_bound
        .iter()
        .find(|(_, value)| value.as_deref().is_some_and(|v| v.contains(['\r', '\n'])))
    {
        return Err(ValidationError::MultilineField(*name));
    }

    let take = |value: &Option<String>| present(value).unwrap_or_default();

    Ok(InboundMessage {
        recipient: take(&fields.recipient),
        message_id: take(&fields.message_id),
        origin_ip: take(&fields.origin_ip),
        timestamp: take(&fields.timestamp),
        sender_name: take(&fields.sender_name),
        sender_address: take(&fields.sender_address),
        subject: take(&fields.subject),
        // Body whitespace is content.
        body: fields.body.clone().unwrap_or_default(),
        in_reply_to: present(&fields.in_reply_to),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert_eq!(validate_email("user@email.com").unwrap(), "user@email.com");
        assert_eq!(
            validate_email("  User.Name+tag@Sub.Example.org ").unwrap(),
            "user.name+tag@sub.example.org"
        );
    }

    #[test]
    fn test_validate_email_invalid() {
        assert_eq!(validate_email("user@emailcom"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("useremail.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("@email.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("user@email..com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("user@.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b@c.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("us er@email.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email(""), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_validate_email_too_long() {
        let long = format!("{}@example.com", "a".repeat(MAX_EMAIL_LENGTH));
        assert_eq!(validate_email(&long), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_validate_list_name() {
        assert_eq!(validate_list_name("New_List").unwrap(), "new_list");
        assert_eq!(validate_list_name("dev-team.2").unwrap(), "dev-team.2");
        assert_eq!(validate_list_name(""), Err(ValidationError::InvalidListName));
        assert_eq!(validate_list_name("a b"), Err(ValidationError::InvalidListName));
        assert_eq!(validate_list_name("a@b"), Err(ValidationError::InvalidListName));
        assert_eq!(
            validate_list_name(&"x".repeat(MAX_LIST_NAME_LENGTH + 1)),
            Err(ValidationError::InvalidListName)
        );
    }

    #[test]
    fn test_validate_password() {
        assert_eq!(validate_password(Some("123456")), Ok("123456"));
        assert_eq!(validate_password(Some("")), Err(ValidationError::InvalidPassword));
        assert_eq!(validate_password(None), Err(ValidationError::InvalidPassword));
    }

    #[test]
    fn test_param_value_as_integer() {
        assert_eq!(ParamValue::Integer(2).as_integer(), Some(2));
        assert_eq!(ParamValue::Text("-1".to_string()).as_integer(), Some(-1));
        assert_eq!(ParamValue::Text("Invalid".to_string()).as_integer(), None);
        assert_eq!(ParamValue::Other(serde_json::json!(1.5)).as_integer(), None);
        assert_eq!(ParamValue::Other(serde_json::json!(true)).as_integer(), None);
        assert_eq!(ParamValue::Text("+3".to_string()).as_integer(), Some(3));
        assert_eq!(ParamValue::Text("-".to_string()).as_integer(), None);
    }

    #[test]
    fn test_param_value_huge_integer_saturates() {
        assert_eq!(
            ParamValue::Text("99999999999999999999".to_string()).as_integer(),
            Some(i64::MAX)
        );
        assert_eq!(
            ParamValue::Text("-99999999999999999999".to_string()).as_integer(),
            Some(i64::MIN)
        );

        let v: ParamValue = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(v.as_integer(), Some(i64::MAX));
        let v: ParamValue = serde_json::from_str("99999999999999999999").unwrap();
        assert_eq!(v.as_integer(), Some(i64::MAX));
        assert_eq!(
            parse_int_param("archive_private", Some(&v)).map(|n| normalize_archive_private(
                n,
                ArchiveVisibility::Public
            )),
            Ok(ArchiveVisibility::Public)
        );
    }

    #[test]
    fn test_param_value_deserialize() {
        let v: ParamValue = serde_json::from_str("3").unwrap();
        assert_eq!(v, ParamValue::Integer(3));
        let v: ParamValue = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(v, ParamValue::Text("3".to_string()));
        let v: ParamValue = serde_json::from_str("[1]").unwrap();
        assert!(matches!(v, ParamValue::Other(_)));
    }

    #[test]
    fn test_parse_int_param() {
        assert_eq!(parse_int_param("archive_private", None), Ok(None));
        assert_eq!(
            parse_int_param("archive_private", Some(&ParamValue::Integer(1))),
            Ok(Some(1))
        );
        assert_eq!(
            parse_int_param("archive_private", Some(&ParamValue::Text("Invalid".into()))),
            Err(ValidationError::InvalidParams("archive_private".to_string()))
        );
    }

    #[test]
    fn test_normalize_subscribe_policy() {
        let default = SubscribePolicy::Confirm;
        assert_eq!(normalize_subscribe_policy(None, default, false), default);
        assert_eq!(
            normalize_subscribe_policy(Some(2), default, false),
            SubscribePolicy::Approval
        );
        assert_eq!(
            normalize_subscribe_policy(Some(3), default, false),
            SubscribePolicy::ConfirmAndApproval
        );
        assert_eq!(normalize_subscribe_policy(Some(4), default, false), default);
        assert_eq!(normalize_subscribe_policy(Some(-1), default, false), default);
        assert_eq!(normalize_subscribe_policy(Some(0), default, false), default);
        assert_eq!(
            normalize_subscribe_policy(Some(0), default, true),
            SubscribePolicy::Open
        );
    }

    #[test]
    fn test_normalize_archive_private() {
        let default = ArchiveVisibility::Public;
        assert_eq!(normalize_archive_private(Some(1), default), ArchiveVisibility::Private);
        assert_eq!(normalize_archive_private(Some(0), default), ArchiveVisibility::Public);
        assert_eq!(normalize_archive_private(Some(2), default), default);
        assert_eq!(normalize_archive_private(Some(-1), default), default);
        assert_eq!(normalize_archive_private(None, default), default);
    }

    fn complete_fields() -> MessageFields {
        MessageFields {
            recipient: Some("list@lists.example.com".to_string()),
            message_id: Some("1".to_string()),
            origin_ip: Some("127.0.0.1".to_string()),
            timestamp: Some("Mon, 05 Jan 2026 10:00:00 +0000 (UTC)".to_string()),
            sender_name: Some("user test".to_string()),
            sender_address: Some("user@email.com".to_string()),
            subject: Some("subject test".to_string()),
            body: Some("body test\n".to_string()),
            in_reply_to: None,
        }
    }

    #[test]
    fn test_validate_message_complete() {
        let message = validate_message(&complete_fields()).unwrap();
        assert_eq!(message.subject, "subject test");
        assert_eq!(message.body, "body test\n");
        assert_eq!(message.in_reply_to, None);
    }

    #[test]
    fn test_validate_message_empty() {
        let err = validate_message(&MessageFields::default()).unwrap_err();
        assert_eq!(err.outcome(), Outcome::MissingFields);
        if let ValidationError::MissingFields(missing) = err {
            assert_eq!(missing.len(), 8);
        }
    }

    #[test]
    fn test_validate_message_blank_field() {
        let mut fields = complete_fields();
        fields.subject = Some("   ".to_string());
        assert_eq!(
            validate_message(&fields),
            Err(ValidationError::MissingFields(vec!["subject"]))
        );
    }

    #[test]
    fn test_validate_message_rejects_line_breaks() {
        let mut fields = complete_fields();
        fields.subject = Some("hi\r\nBcc: victim@example.com".to_string());
        assert_eq!(
            validate_message(&fields),
            Err(ValidationError::MultilineField("subject"))
        );

        let mut fields = complete_fields();
        fields.in_reply_to = Some("1\nX-Injected: yes".to_string());
        let err = validate_message(&fields).unwrap_err();
        assert_eq!(err, ValidationError::MultilineField("in_reply_to"));
        assert_eq!(err.outcome(), Outcome::MissingFields);

        let mut fields = complete_fields();
        fields.body = Some("line one\r\nline two\r\n".to_string());
        assert!(validate_message(&fields).is_ok());
    }

    #[test]
    fn test_error_outcomes() {
        assert_eq!(ValidationError::InvalidEmail.outcome(), Outcome::InvalidEmail);
        assert_eq!(ValidationError::InvalidPassword.outcome(), Outcome::InvalidPassword);
        assert_eq!(
            ValidationError::InvalidParams("x".into()).outcome(),
            Outcome::InvalidParams
        );
        assert_eq!(ValidationError::InvalidListName.outcome(), Outcome::InvalidParams);
    }
}
