//! Decoding of RFC 2047 header fields and RFC 2822 dates.

use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use tracing::warn;

use crate::charset;

static ENCODED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\?[^?\s]+\?[bBqQ]\?[^?\s]*\?=").unwrap());

/// Decode a header field that may contain RFC 2047 encoded-words into a
/// single logical line of text.
///
/// Used for subjects, display names, and disposition parameter values, so
/// that every header-derived string in a message is safe to store and
/// render as one line. Encoded-word fragments decode per their declared
/// charset with replacement characters on invalid bytes; unknown charsets
/// fall back to Latin-1; fragments whose transfer encoding cannot be
/// reversed at all are dropped. The result never contains newlines or
/// carriage returns.
#[must_use]
pub fn decode_header_field(field: &str) -> String {
    let field = space_out_encoded_words(field);

    let mut fragments: Vec<String> = Vec::new();
    let mut cursor = 0;
    for found in ENCODED_WORD.find_iter(&field) {
        if found.start() > cursor {
            fragments.push(field[cursor..found.start()].to_string());
        }
        match decode_encoded_word(found.as_str()) {
            Some(text) => fragments.push(text),
            None => warn!(fragment = found.as_str(), "dropping undecodable encoded-word"),
        }
        cursor = found.end();
    }
    if cursor < field.len() {
        fragments.push(field[cursor..].to_string());
    }

    let joined = fragments
        .iter()
        .map(|fragment| fragment.trim())
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    joined.replace("\n\t", " ").replace(['\n', '\r'], "")
}

/// Parse an RFC 2822 `Date` header value into a UTC timestamp.
///
/// Returns `None` when the value is not a valid RFC 2822 date. The
/// conversion happens in two steps: the wall-clock time is taken naively
/// first, and the parsed UTC offset is subtracted from it afterwards.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc2822(value.trim()).ok()?;
    let naive = parsed.naive_local();
    let offset = i64::from(parsed.offset().local_minus_utc());
    let corrected = naive - Duration::seconds(offset);
    Some(DateTime::from_naive_utc_and_offset(corrected, Utc))
}

/// Collapse RFC 5322 folding whitespace so a header value is a single line.
pub(crate) fn unfold(value: &str) -> String {
    let stripped = value.replace('\r', "");
    let mut out = String::with_capacity(stripped.len());
    for (index, line) in stripped.split('\n').enumerate() {
        if index > 0 {
            out.push(' ');
            out.push_str(line.trim_start());
        } else {
            out.push_str(line);
        }
    }
    out
}

// Adjacent encoded-words with no separating whitespace would otherwise run
// together once decoded; give each one not at end-of-field a trailing space.
fn space_out_encoded_words(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 8);
    let mut cursor = 0;
    for found in ENCODED_WORD.find_iter(field) {
        out.push_str(&field[cursor..found.end()]);
        let next = field[found.end()..].chars().next();
        if next.is_some_and(|c| !c.is_whitespace()) {
            out.push(' ');
        }
        cursor = found.end();
    }
    out.push_str(&field[cursor..]);
    out
}

fn decode_encoded_word(word: &str) -> Option<String> {
    let inner = word.strip_prefix("=?")?.strip_suffix("?=")?;
    let mut pieces = inner.splitn(3, '?');
    let label = pieces.next()?;
    let encoding = pieces.next()?;
    let payload = pieces.next()?;

    let bytes = match encoding {
        "B" | "b" => BASE64.decode(payload).ok()?,
        "Q" | "q" => decode_q(payload),
        _ => return None,
    };
    Some(charset::decode_lossy(&bytes, label))
}

// RFC 2047 Q encoding: quoted-printable with `_` standing in for space.
// Malformed escapes pass through literally rather than aborting the word.
fn decode_q(payload: &str) -> Vec<u8> {
    let raw = payload.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'_' => {
                out.push(b' ');
                i += 1;
            }
            b'=' if i + 2 < raw.len() => {
                let escape = std::str::from_utf8(&raw[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                if let Some(byte) = escape {
                    out.push(byte);
                    i += 3;
                } else {
                    out.push(b'=');
                    i += 1;
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    out
}
