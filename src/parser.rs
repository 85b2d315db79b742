//! MIME parsing path: raw RFC 822 bytes into a normalized message

use std::collections::BTreeMap;

use mailparse::{MailAddr, MailHeaderMap, ParsedMail, SingleInfo};
use tracing::{debug, warn};

use crate::charset;
use crate::error::{ParseError, Result};
use crate::header::{decode_header_field, parse_date, unfold};
use crate::types::{Address, Attachment, ParsedMessage};

/// Parse a complete MIME byte stream into one [`ParsedMessage`].
///
/// Walks every part of the message, however deeply nested, extracting
/// attachments and collecting `text/plain` and `text/html` content.
/// Field-level problems — bad charsets, malformed dates, undecodable
/// header fragments — degrade to empty or `None` values. The only error
/// this function returns is [`ParseError::Envelope`], when the input
/// cannot be parsed as a MIME message at all.
pub fn parse_mime(raw: &[u8]) -> Result<ParsedMessage> {
    let mail = mailparse::parse_mail(raw).map_err(|e| ParseError::Envelope(e.to_string()))?;

    let mut body = Vec::new();
    let mut html = Vec::new();
    let mut attachments = Vec::new();
    walk(&mail, &mut body, &mut html, &mut attachments);

    let mut to = address_list(&mail, "To");
    to.extend(address_list(&mail, "X-Original-To"));

    let message = ParsedMessage {
        date: mail
            .headers
            .get_first_value("Date")
            .and_then(|value| parse_date(&value)),
        subject: decode_raw_header(&mail, "Subject"),
        body: body.join("\n"),
        html: html.join("\n"),
        from: address_list(&mail, "From").into_iter().next(),
        to,
        cc: address_list(&mail, "Cc"),
        resent_to: address_list(&mail, "Resent-To"),
        resent_cc: address_list(&mail, "Resent-Cc"),
        attachments,
        raw: raw.to_vec(),
    };

    debug!(
        "parsed message: subject {:?}, {} attachment(s)",
        message.subject,
        message.attachments.len()
    );
    Ok(message)
}

// Visits the part itself first, then recurses, so part order in the input
// is preserved in the output.
fn walk(
    part: &ParsedMail,
    body: &mut Vec<String>,
    html: &mut Vec<String>,
    attachments: &mut Vec<Attachment>,
) {
    if let Some(attachment) = parse_attachment(part) {
        attachments.push(attachment);
    } else {
        match part.ctype.mimetype.as_str() {
            "text/plain" => body.push(part_text(part)),
            "text/html" => html.push(part_text(part)),
            _ => {}
        }
    }
    for sub in &part.subparts {
        walk(sub, body, html, attachments);
    }
}

fn part_text(part: &ParsedMail) -> String {
    let data = part.get_body_raw().unwrap_or_default();
    charset::decode_lossy(&data, &part.ctype.charset)
}

/// A part is an attachment when its `Content-Disposition` type is
/// `attachment`, or `inline` with an explicit filename. Anything else is
/// left for body collection.
fn parse_attachment(part: &ParsedMail) -> Option<Attachment> {
    let dispo_header = part.headers.get_first_header("Content-Disposition")?;
    let (dispo_type, dispo_params) =
        parse_dispositions(&charset::latin1(dispo_header.get_value_raw()));
    let is_attachment = dispo_type == "attachment"
        || (dispo_type == "inline" && dispo_params.contains_key("filename"));
    if !is_attachment {
        return None;
    }

    let mut data = part.get_body_raw().unwrap_or_default();
    if data.is_empty() && !part.subparts.is_empty() {
        // Container part without a flat payload: serialize the sub-parts
        // instead so the attachment is still materialized.
        data = part
            .subparts
            .iter()
            .map(|sub| String::from_utf8_lossy(sub.raw_bytes).into_owned())
            .collect::<Vec<_>>()
            .join("\n\n")
            .into_bytes();
    }

    let mut name = dispo_params.get("filename").cloned();
    if let Some(ctype_header) = part.headers.get_first_header("Content-Type") {
        let (_, ctype_params) = parse_dispositions(&charset::latin1(ctype_header.get_value_raw()));
        if let Some(from_ctype) = ctype_params.get("name") {
            // Content-Type name wins over the disposition filename
            name = Some(from_ctype.clone());
        }
    }
    if name.is_none() && part.ctype.mimetype == "message/rfc822" {
        name = embedded_subject_name(&data);
    }

    // TODO: parse the create-date/modification-date/read-date disposition
    // parameters into timestamps; Attachment carries them as None for now.
    Some(Attachment::new(data, part.ctype.mimetype.clone(), name))
}

// For a nested message with no filename of its own, name it after the
// first 45 characters of its subject.
fn embedded_subject_name(data: &[u8]) -> Option<String> {
    let embedded = mailparse::parse_mail(data).ok()?;
    let header = embedded.headers.get_first_header("Subject")?;
    let subject = decode_header_field(&charset::latin1(header.get_value_raw()));
    if subject.is_empty() {
        return None;
    }
    let stem: String = subject.chars().take(45).collect();
    Some(format!("{stem}.eml"))
}

// Splits a Content-Disposition or Content-Type value into its leading type
// token and a map of lower-cased parameters. Quoted values lose their
// quotes; every value goes through the header-field decoder since encoded
// parameter values do occur in the wild.
fn parse_dispositions(value: &str) -> (String, BTreeMap<String, String>) {
    let mut pieces = value.trim().split(';');
    let dispo_type = pieces.next().unwrap_or_default().trim().to_lowercase();

    let mut params = BTreeMap::new();
    for piece in pieces {
        let Some((key, raw_value)) = piece.split_once('=') else {
            continue;
        };
        let mut trimmed = raw_value.trim();
        if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
            trimmed = &trimmed[1..trimmed.len() - 1];
        }
        params.insert(
            key.trim().to_lowercase(),
            decode_header_field(trimmed),
        );
    }
    (dispo_type, params)
}

// Address lists are parsed from the raw header bytes so display-name
// decoding stays in the shared header-field decoder.
fn address_list(mail: &ParsedMail, key: &str) -> Vec<Address> {
    let mut out = Vec::new();
    for header in mail.headers.get_all_headers(key) {
        let value = unfold(&charset::latin1(header.get_value_raw()));
        let Ok(parsed) = mailparse::addrparse(&value) else {
            warn!("skipping unparseable {key} header");
            continue;
        };
        for addr in parsed.iter() {
            match addr {
                MailAddr::Single(single) => out.push(to_address(single)),
                MailAddr::Group(group) => out.extend(group.addrs.iter().map(to_address)),
            }
        }
    }
    out
}

fn to_address(info: &SingleInfo) -> Address {
    let name = info
        .display_name
        .as_deref()
        .map(decode_header_field)
        .unwrap_or_default();
    Address::new(name, &info.addr)
}

fn decode_raw_header(mail: &ParsedMail, key: &str) -> String {
    mail.headers
        .get_first_header(key)
        .map(|header| decode_header_field(&charset::latin1(header.get_value_raw())))
        .unwrap_or_default()
}
