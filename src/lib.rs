// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Inbound Mail Ingestion
//!
//! Normalizes one raw inbound email — a complete RFC 822/MIME byte stream
//! or a vendor inbound-webhook JSON payload — into a canonical
//! [`ParsedMessage`]: decoded headers, plaintext and HTML bodies, and
//! extracted attachments.
//!
//! # Design
//!
//! - Best-effort decoding: a bad charset, a malformed date or an
//!   undecodable header fragment never fails the whole message
//! - Two explicit entry points, [`parse_mime`] and
//!   [`parse_webhook_payload`], sharing one output type
//! - Pure and synchronous: no I/O, no shared state, safe to call from
//!   concurrent tasks without coordination
//!
//! # Example
//!
//! ```rust
//! use mail_ingest::parse_mime;
//!
//! let raw = b"From: Jane Doe <Jane@EXAMPLE.com>\r\nSubject: Hello\r\n\r\nBody text";
//! let message = parse_mime(raw).unwrap();
//!
//! assert_eq!(message.subject, "Hello");
//! assert_eq!(message.from.unwrap().address, "jane@example.com");
//! assert_eq!(message.body, "Body text");
//! ```

mod charset;
mod error;
mod header;
mod parser;
mod types;
mod webhook;

pub use error::{ParseError, Result};
pub use header::{decode_header_field, parse_date};
pub use parser::parse_mime;
pub use types::{Address, Attachment, ParsedMessage};
pub use webhook::{InboundAddress, InboundAttachment, InboundPayload, parse_webhook_payload};
