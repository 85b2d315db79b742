//! Canonical output types for normalized inbound messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One inbound email, normalized from raw MIME bytes or a delivery webhook.
///
/// Produced fresh per parse call; the caller owns storage and identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// `Date` header normalized to UTC; `None` when missing or unparseable
    pub date: Option<DateTime<Utc>>,

    /// Decoded subject, collapsed to a single logical line
    pub subject: String,

    /// All `text/plain` parts, newline-joined
    pub body: String,

    /// All `text/html` parts, newline-joined
    pub html: String,

    /// Sender mailbox, when a parseable `From` header was present
    pub from: Option<Address>,

    /// Recipients from `To` followed by `X-Original-To`, in header order
    pub to: Vec<Address>,

    /// `Cc` recipients, in header order
    pub cc: Vec<Address>,

    /// `Resent-To` recipients
    pub resent_to: Vec<Address>,

    /// `Resent-Cc` recipients
    pub resent_cc: Vec<Address>,

    /// Extracted attachments, in the order their parts appeared
    pub attachments: Vec<Attachment>,

    /// The original input, byte for byte, for callers that need to
    /// re-examine what was actually received
    pub raw: Vec<u8>,
}

impl ParsedMessage {
    /// Check whether the message carries any textual content at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty() && self.html.trim().is_empty()
    }
}

/// A mailbox with an optional display name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    /// Decoded display name; empty when the header carried none
    pub name: String,

    /// Email address, always stored lower-cased
    pub address: String,
}

impl Address {
    /// Build an address, lower-casing the mailbox part
    #[must_use]
    pub fn new(name: impl Into<String>, address: &str) -> Self {
        Self {
            name: name.into(),
            address: address.to_lowercase(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} <{}>", self.name, self.address)
        }
    }
}

/// A file extracted from a message part or webhook payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Raw file bytes; ownership passes to the caller with the message
    pub content: Vec<u8>,

    /// MIME type of the part, lower-cased
    pub content_type: String,

    /// Byte length of `content`
    pub size: usize,

    /// Resolved filename, if any source supplied one
    pub name: Option<String>,

    /// `create-date` disposition parameter. The parameter is not parsed
    /// yet, so this is always `None`.
    pub create_date: Option<DateTime<Utc>>,

    /// `modification-date` disposition parameter; always `None`, see
    /// [`Attachment::create_date`]
    pub mod_date: Option<DateTime<Utc>>,

    /// `read-date` disposition parameter; always `None`, see
    /// [`Attachment::create_date`]
    pub read_date: Option<DateTime<Utc>>,
}

impl Attachment {
    /// Build an attachment. `size` is derived from `content`, so the two
    /// can never disagree.
    #[must_use]
    pub fn new(content: Vec<u8>, content_type: impl Into<String>, name: Option<String>) -> Self {
        Self {
            size: content.len(),
            content,
            content_type: content_type.into(),
            name,
            create_date: None,
            mod_date: None,
            read_date: None,
        }
    }
}
