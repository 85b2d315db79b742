//! Webhook parsing path: structured inbound-delivery payloads
//!
//! The mail vendor posts one JSON object per inbound message. The payload
//! is already decoded — no MIME walking or charset guessing applies — so
//! this path is a straight mapping onto [`ParsedMessage`], behind a typed
//! schema that rejects anything with the wrong shape up front.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ParseError, Result};
use crate::header::parse_date;
use crate::types::{Address, Attachment, ParsedMessage};

/// Inbound-email callback body as delivered by the mail vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InboundPayload {
    /// Sender, already split into name and email by the vendor
    pub from_full: InboundAddress,

    /// Primary recipients
    pub to_full: Vec<InboundAddress>,

    /// CC recipients
    #[serde(default)]
    pub cc_full: Vec<InboundAddress>,

    /// Subject line, already decoded
    #[serde(default)]
    pub subject: String,

    /// Plaintext body
    #[serde(default)]
    pub text_body: String,

    /// HTML body
    #[serde(default)]
    pub html_body: String,

    /// RFC 2822 date string
    #[serde(default)]
    pub date: String,

    /// Attachment entries with base64-encoded content
    #[serde(default)]
    pub attachments: Vec<InboundAttachment>,
}

/// A name/email pair from the vendor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InboundAddress {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

impl From<InboundAddress> for Address {
    fn from(inbound: InboundAddress) -> Self {
        Self::new(inbound.name, &inbound.email)
    }
}

/// One attachment entry from the vendor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InboundAttachment {
    #[serde(default)]
    pub name: String,

    /// Base64-encoded file content
    pub content: String,

    #[serde(default)]
    pub content_type: String,

    /// Length as declared by the vendor; the stored size is recomputed
    /// from the decoded bytes
    #[serde(default)]
    pub content_length: u64,
}

/// Parse a JSON webhook callback into one [`ParsedMessage`].
///
/// The value must match the vendor's inbound-email shape; anything else is
/// rejected with [`ParseError::UnsupportedFormat`] rather than parsed on a
/// best-effort basis. `resent_to` and `resent_cc` do not exist in the
/// payload and come back empty.
pub fn parse_webhook_payload(value: serde_json::Value) -> Result<ParsedMessage> {
    let raw = value.to_string().into_bytes();
    let payload: InboundPayload = serde_json::from_value(value)
        .map_err(|e| ParseError::UnsupportedFormat(e.to_string()))?;

    let attachments: Vec<Attachment> = payload
        .attachments
        .into_iter()
        .filter_map(decode_attachment)
        .collect();

    debug!(
        "parsed webhook payload: subject {:?}, {} attachment(s)",
        payload.subject,
        attachments.len()
    );

    Ok(ParsedMessage {
        date: parse_date(&payload.date),
        subject: payload.subject,
        body: payload.text_body,
        html: payload.html_body,
        from: Some(payload.from_full.into()),
        to: payload.to_full.into_iter().map(Address::from).collect(),
        cc: payload.cc_full.into_iter().map(Address::from).collect(),
        resent_to: Vec::new(),
        resent_cc: Vec::new(),
        attachments,
        raw,
    })
}

// An entry whose content does not decode is dropped whole; partially
// corrupt attachment bytes never reach the caller.
fn decode_attachment(entry: InboundAttachment) -> Option<Attachment> {
    match BASE64.decode(entry.content.as_bytes()) {
        Ok(content) => {
            let name = (!entry.name.is_empty()).then_some(entry.name);
            Some(Attachment::new(content, entry.content_type, name))
        }
        Err(err) => {
            warn!("dropping attachment {:?}: {err}", entry.name);
            None
        }
    }
}
