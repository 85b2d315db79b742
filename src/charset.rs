//! Charset decoding fallbacks shared by header and body extraction.
//!
//! Every step is total: declared charsets decode lossily with replacement
//! characters, unknown labels fall back to Latin-1, and Latin-1 maps each
//! byte to the code point of the same value, so no input can make these
//! functions fail.

use encoding_rs::Encoding;

/// Decode `bytes` as the given charset label, replacing invalid sequences
/// instead of failing. Unknown labels fall back to [`latin1`].
pub(crate) fn decode_lossy(bytes: &[u8], charset: &str) -> String {
    let label = charset.trim();
    if label.is_empty() || label.eq_ignore_ascii_case("ascii") || label.eq_ignore_ascii_case("us-ascii")
    {
        return ascii_lossy(bytes);
    }
    Encoding::for_label(label.as_bytes()).map_or_else(
        || latin1(bytes),
        |encoding| encoding.decode(bytes).0.into_owned(),
    )
}

/// Strict 7-bit decode; anything above 0x7F becomes the replacement
/// character.
pub(crate) fn ascii_lossy(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b < 0x80 {
                char::from(b)
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

/// Total byte-to-char conversion per ISO-8859-1.
pub(crate) fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
