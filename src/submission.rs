//! Inbound message submissions and their validation
//!
//! Validation happens here, before any classifier runs; the scorer itself
//! accepts any input.

use crate::classifier::ClassifyRequest;
use crate::error::SubmissionError;
use crate::Language;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const MAX_MESSAGE_CHARS: usize = 5000;
const MAX_PHONE_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub message: String,
    pub sender_phone: String,
    #[serde(default)]
    pub in_contacts: bool,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub date_received: Option<String>,
    #[serde(default)]
    pub time_received: Option<String>,
}

impl Submission {
    pub fn new(message: impl Into<String>, sender_phone: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sender_phone: sender_phone.into(),
            in_contacts: false,
            language: Language::default(),
            date_received: None,
            time_received: None,
        }
    }

    pub fn validate(&self) -> Result<(), SubmissionError> {
        if self.message.trim().is_empty() {
            return Err(SubmissionError::EmptyMessage);
        }
        if self.sender_phone.trim().is_empty() {
            return Err(SubmissionError::EmptySenderPhone);
        }
        let len = self.message.chars().count();
        if len > MAX_MESSAGE_CHARS {
            return Err(SubmissionError::MessageTooLong {
                len,
                max: MAX_MESSAGE_CHARS,
            });
        }
        if !is_valid_phone(&self.sender_phone) {
            return Err(SubmissionError::InvalidPhone(self.sender_phone.clone()));
        }
        Ok(())
    }

    /// Replace the sender with its `format_phone` form
    pub fn with_formatted_phone(mut self) -> Self {
        self.sender_phone = format_phone(&self.sender_phone);
        self
    }

    pub fn to_request(&self) -> ClassifyRequest {
        ClassifyRequest {
            message_text: self.message.clone(),
            sender_phone: self.sender_phone.clone(),
            sender_in_contacts: self.in_contacts,
            language: self.language,
        }
    }
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+\d{10,15}$").expect("valid phone regex"))
}

/// `+` followed by 10 to 15 digits
pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

/// Clean free-form phone input: digits only behind a single leading `+`,
/// capped at 16 characters
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let has_input = raw.chars().any(|c| c.is_ascii_digit() || c == '+');
    if !has_input {
        return String::new();
    }
    let mut formatted = String::with_capacity(MAX_PHONE_LEN);
    formatted.push('+');
    formatted.push_str(&digits);
    formatted.chars().take(MAX_PHONE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_submission() {
        let s = Submission::new("Your parcel is held", "+919876543210");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(
            Submission::new("   ", "+919876543210").validate(),
            Err(SubmissionError::EmptyMessage)
        );
        assert_eq!(
            Submission::new("hi", "").validate(),
            Err(SubmissionError::EmptySenderPhone)
        );
    }

    #[test]
    fn test_phone_pattern() {
        assert!(is_valid_phone("+9198765432"));
        assert!(is_valid_phone("+919876543210123"));
        assert!(!is_valid_phone("+919876543"));
        assert!(!is_valid_phone("+9198765432101234"));
        assert!(!is_valid_phone("919876543210"));
        assert!(!is_valid_phone("HDFCBK"));
        assert_eq!(
            Submission::new("hi", "VM-HDFCBK").validate(),
            Err(SubmissionError::InvalidPhone("VM-HDFCBK".to_string()))
        );
    }

    #[test]
    fn test_message_length_cap() {
        let s = Submission::new("a".repeat(MAX_MESSAGE_CHARS + 1), "+919876543210");
        assert!(matches!(
            s.validate(),
            Err(SubmissionError::MessageTooLong { max: MAX_MESSAGE_CHARS, .. })
        ));
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("+91 98765-43210"), "+919876543210");
        assert_eq!(format_phone("919876543210"), "+919876543210");
        assert_eq!(format_phone("+91+98+76"), "+919876");
        assert_eq!(format_phone("+12345678901234567890"), "+123456789012345");
        assert_eq!(format_phone("abc"), "");
    }

    #[test]
    fn test_formatted_submission_passes_validation() {
        let raw = Submission::new("Your parcel is held", "+91 98765-43210");
        assert!(raw.validate().is_err());

        let s = raw.with_formatted_phone();
        assert_eq!(s.sender_phone, "+919876543210");
        assert!(s.validate().is_ok());

        let label = Submission::new("Your parcel is held", "HDFCBK").with_formatted_phone();
        assert_eq!(label.validate(), Err(SubmissionError::EmptySenderPhone));
    }

    #[test]
    fn test_deserialize_defaults() {
        let s: Submission =
            serde_json::from_str(r#"{"message":"hi","senderPhone":"+919876543210"}"#).unwrap();
        assert!(!s.in_contacts);
        assert_eq!(s.language, Language::English);
        assert_eq!(s.to_request().sender_phone, "+919876543210");
    }
}
