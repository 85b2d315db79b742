use chrono::{TimeZone, Utc};
use mail_ingest::{decode_header_field, parse_date};

// --- decode_header_field ---

#[test]
fn test_decode_plain_ascii_is_noop() {
    assert_eq!(decode_header_field("Meeting agenda"), "Meeting agenda");
}

#[test]
fn test_decode_is_idempotent() {
    let once = decode_header_field("=?UTF-8?B?SGVsbG8=?= world");
    let twice = decode_header_field(&once);
    assert_eq!(once, "Hello world");
    assert_eq!(twice, once);
}

#[test]
fn test_decode_base64_encoded_word() {
    assert_eq!(decode_header_field("=?UTF-8?B?SGVsbG8=?="), "Hello");
}

#[test]
fn test_decode_q_encoded_word() {
    assert_eq!(decode_header_field("=?ISO-8859-1?Q?Gr=FC=DFe?="), "Gr\u{fc}\u{df}e");
}

#[test]
fn test_decode_q_underscore_is_space() {
    assert_eq!(decode_header_field("=?UTF-8?Q?two_words?="), "two words");
}

#[test]
fn test_decode_adjacent_encoded_words() {
    let field = "=?UTF-8?B?SGVsbG8=?==?UTF-8?B?V29ybGQ=?=";
    assert_eq!(decode_header_field(field), "Hello World");
}

#[test]
fn test_decode_mixed_raw_and_encoded() {
    assert_eq!(
        decode_header_field("=?UTF-8?Q?Caf=C3=A9?= menu"),
        "Caf\u{e9} menu"
    );
}

#[test]
fn test_decode_unknown_charset_falls_back_to_latin1() {
    assert_eq!(decode_header_field("=?x-nonsense?Q?caf=E9?="), "caf\u{e9}");
}

#[test]
fn test_decode_bad_base64_fragment_is_dropped() {
    assert_eq!(decode_header_field("=?UTF-8?B?!!!?= kept"), "kept");
}

#[test]
fn test_decode_strips_folding_whitespace() {
    assert_eq!(decode_header_field("Two\n\tline subject"), "Two line subject");
    assert!(!decode_header_field("a\r\nb\tc").contains('\n'));
    assert!(!decode_header_field("a\r\nb\tc").contains('\r'));
}

#[test]
fn test_decode_folded_encoded_words() {
    let field = "=?UTF-8?B?SGVsbG8=?=\r\n =?UTF-8?B?V29ybGQ=?=";
    assert_eq!(decode_header_field(field), "Hello World");
}

#[test]
fn test_decode_empty_field() {
    assert_eq!(decode_header_field(""), "");
}

// --- parse_date ---

#[test]
fn test_parse_date_normalizes_to_utc() {
    let parsed = parse_date("Mon, 02 Jan 2006 15:04:05 -0700").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
}

#[test]
fn test_parse_date_positive_offset() {
    let parsed = parse_date("Thu, 01 Jan 2015 12:00:00 +0200").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 1, 1, 10, 0, 0).unwrap());
}

#[test]
fn test_parse_date_already_utc() {
    let parsed = parse_date("Thu, 01 Jan 2015 12:00:00 +0000").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2015, 1, 1, 12, 0, 0).unwrap());
}

#[test]
fn test_parse_date_invalid_is_none() {
    assert!(parse_date("not-a-date").is_none());
    assert!(parse_date("").is_none());
}
