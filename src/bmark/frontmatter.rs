//! Front-matter codec: `(header, body) <-> text`.
//!
//! A record file is a fenced header block followed by freeform notes:
//!
//! ```text
//! ---
//! url: https://example.com
//! title: Example
//! tags:
//! - sample
//! - demo
//! created: 2025-03-01T10:00:00+01:00
//! ---
//! body notes
//! ```
//!
//! The closing fence is matched line-wise: only a line that is exactly
//! `---` terminates the header. Multi-line header values are emitted as
//! indented YAML block scalars, so a value containing the fence sequence
//! can never be mistaken for the end of the block.
//!
//! The body is everything after the closing fence, byte for byte. Nothing
//! is inserted or stripped, which makes `parse` and `serialize` a true
//! inverse pair.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// The fence sentinel, without the line terminator.
pub const DELIMITER: &str = "---";

const OPEN: &str = "---\n";

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("unterminated front matter block (missing closing {})", DELIMITER)]
    Unterminated,

    #[error("invalid header: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parsed header of a record file.
///
/// Recognized fields are typed; everything else lands in `extra` in its
/// original relative order and round-trips unchanged. Timestamps stay
/// verbatim strings here so a re-serialization never rewrites them; they
/// are parsed on demand (see `model`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    pub url: String,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub extra: Mapping,
}

impl Header {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    fn from_mapping(map: Mapping) -> Self {
        let mut header = Self::default();
        for (key, value) in map {
            let name = match &key {
                Value::String(s) => s.trim().to_lowercase(),
                _ => {
                    header.extra.insert(key, value);
                    continue;
                }
            };
            match name.as_str() {
                "url" => match scalar_to_string(&value) {
                    Some(s) => header.url = s,
                    None => {
                        header.extra.insert(key, value);
                    }
                },
                "title" => match scalar_to_string(&value) {
                    Some(s) if !s.is_empty() => header.title = Some(s),
                    Some(_) => {}
                    None => {
                        header.extra.insert(key, value);
                    }
                },
                "tags" => header.tags = tags_from_value(&value),
                // legacy key names map onto the canonical pair
                "created" => {
                    if let Some(stamp) = non_empty_scalar(&value) {
                        header.created = Some(stamp);
                    }
                }
                "added" => {
                    if header.created.is_none() {
                        header.created = non_empty_scalar(&value);
                    }
                }
                "modified" => {
                    if let Some(stamp) = non_empty_scalar(&value) {
                        header.modified = Some(stamp);
                    }
                }
                "updated" => {
                    if header.modified.is_none() {
                        header.modified = non_empty_scalar(&value);
                    }
                }
                _ => {
                    header.extra.insert(key, value);
                }
            }
        }
        header
    }

    fn to_mapping(&self) -> Mapping {
        let mut map = Mapping::new();
        if !self.url.is_empty() {
            map.insert("url".into(), Value::String(self.url.clone()));
        }
        if let Some(title) = &self.title {
            map.insert("title".into(), Value::String(title.clone()));
        }
        if !self.tags.is_empty() {
            let tags = self.tags.iter().cloned().map(Value::String).collect();
            map.insert("tags".into(), Value::Sequence(tags));
        }
        if let Some(created) = &self.created {
            map.insert("created".into(), Value::String(created.clone()));
        }
        if let Some(modified) = &self.modified {
            map.insert("modified".into(), Value::String(modified.clone()));
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

/// Split a record file into header and body.
///
/// Files that do not start with the fence are legacy plain notes: the
/// whole content is the body, and a first line that looks like a URL is
/// lifted into the header (matching the behavior of stores written before
/// front matter was introduced).
pub fn parse(text: &str) -> Result<(Header, String), FrontMatterError> {
    let Some(after) = text.strip_prefix(OPEN) else {
        return Ok(parse_legacy(text));
    };

    let (raw_header, body) = split_at_close(after).ok_or(FrontMatterError::Unterminated)?;
    let map: Mapping = if raw_header.trim().is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str(raw_header)?
    };
    Ok((Header::from_mapping(map), body.to_string()))
}

/// Render header and body back into file text. Recognized keys come first
/// in canonical order; extras follow in their original relative order.
pub fn serialize(header: &Header, body: &str) -> Result<String, FrontMatterError> {
    let map = header.to_mapping();
    let yaml = if map.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(&map)?
    };
    Ok(format!("{}{}{}\n{}", OPEN, yaml, DELIMITER, body))
}

/// Find the closing fence line and split around it. The fence must sit at
/// the start of a line; indented occurrences (inside block scalars) do not
/// count.
fn split_at_close(after: &str) -> Option<(&str, &str)> {
    if let Some(body) = after.strip_prefix("---\n") {
        return Some(("", body));
    }
    if after == DELIMITER {
        return Some(("", ""));
    }
    if let Some(idx) = after.find("\n---\n") {
        return Some((&after[..idx + 1], &after[idx + 5..]));
    }
    if let Some(head) = after.strip_suffix("\n---") {
        return Some((head, ""));
    }
    None
}

fn parse_legacy(text: &str) -> (Header, String) {
    let mut header = Header::default();
    if let Some(first) = text.lines().next() {
        let candidate = first.trim();
        if candidate.starts_with("http://") || candidate.starts_with("https://") {
            header.url = candidate.to_string();
            let rest = &text[first.len()..];
            return (header, rest.trim_start_matches('\n').to_string());
        }
    }
    (header, text.to_string())
}

fn non_empty_scalar(value: &Value) -> Option<String> {
    scalar_to_string(value).filter(|s| !s.is_empty())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn tags_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter_map(scalar_to_string)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        // legacy comma-joined form
        Value::String(s) => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(header: &Header, body: &str) -> (Header, String) {
        let text = serialize(header, body).unwrap();
        parse(&text).unwrap()
    }

    #[test]
    fn parses_scalar_fields_and_body() {
        let text = "---\nurl: https://example.com\ntitle: Example\n---\nsome notes\n";
        let (header, body) = parse(text).unwrap();
        assert_eq!(header.url, "https://example.com");
        assert_eq!(header.title.as_deref(), Some("Example"));
        assert_eq!(body, "some notes\n");
    }

    #[test]
    fn parses_inline_list_with_quoting() {
        let text = "---\ntags: [a, b, \"c,d\"]\n---\n";
        let (header, _) = parse(text).unwrap();
        assert_eq!(header.tags, vec!["a", "b", "c,d"]);
    }

    #[test]
    fn parses_legacy_comma_joined_tags() {
        let text = "---\ntags: rust, cli\n---\n";
        let (header, _) = parse(text).unwrap();
        assert_eq!(header.tags, vec!["rust", "cli"]);
    }

    #[test]
    fn maps_legacy_timestamp_keys() {
        let text = "---\nadded: 2024-01-01T00:00:00+00:00\nupdated: 2024-02-01T00:00:00+00:00\n---\n";
        let (header, _) = parse(text).unwrap();
        assert_eq!(header.created.as_deref(), Some("2024-01-01T00:00:00+00:00"));
        assert_eq!(header.modified.as_deref(), Some("2024-02-01T00:00:00+00:00"));
    }

    #[test]
    fn canonical_created_wins_over_legacy_added() {
        let text = "---\nadded: old\ncreated: new\n---\n";
        let (header, _) = parse(text).unwrap();
        assert_eq!(header.created.as_deref(), Some("new"));
    }

    #[test]
    fn unterminated_header_is_an_error() {
        let text = "---\nurl: https://example.com\nno closing fence";
        assert!(matches!(
            parse(text),
            Err(FrontMatterError::Unterminated)
        ));
    }

    #[test]
    fn plain_note_without_front_matter_becomes_body() {
        let (header, body) = parse("just some notes\nmore\n").unwrap();
        assert!(header.url.is_empty());
        assert_eq!(body, "just some notes\nmore\n");
    }

    #[test]
    fn plain_note_with_url_first_line_sniffs_url() {
        let (header, body) = parse("https://example.com\n\nnotes\n").unwrap();
        assert_eq!(header.url, "https://example.com");
        assert_eq!(body, "notes\n");
    }

    #[test]
    fn extra_keys_round_trip_in_order() {
        let text = "---\nurl: https://example.com\narchive: wayback\nrating: 5\n---\nbody";
        let (header, body) = parse(text).unwrap();
        assert_eq!(header.extra.len(), 2);

        let again = serialize(&header, &body).unwrap();
        let (header2, body2) = parse(&again).unwrap();
        assert_eq!(header, header2);
        assert_eq!(body, body2);

        let keys: Vec<_> = header2
            .extra
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["archive", "rating"]);
    }

    #[test]
    fn multiline_header_value_round_trips() {
        let mut header = Header::new("https://example.com");
        header.extra.insert(
            "excerpt".into(),
            Value::String("line one\nline two: with colon\nline three".into()),
        );
        let (parsed, _) = roundtrip(&header, "body\n");
        assert_eq!(parsed, header);
    }

    #[test]
    fn header_value_containing_delimiter_round_trips() {
        let mut header = Header::new("https://example.com");
        header.extra.insert(
            "excerpt".into(),
            Value::String("before\n---\nafter".into()),
        );
        let (parsed, body) = roundtrip(&header, "notes\n");
        assert_eq!(parsed, header);
        assert_eq!(body, "notes\n");
    }

    #[test]
    fn body_containing_delimiter_round_trips() {
        let header = Header::new("https://example.com");
        let body = "notes\n---\nmore notes after a ruler\n";
        let (parsed, body2) = roundtrip(&header, body);
        assert_eq!(parsed.url, "https://example.com");
        assert_eq!(body2, body);
    }

    #[test]
    fn serialization_is_byte_stable() {
        let text = "---\nurl: https://example.com\ntitle: T\ntags:\n- a\n- b\ncreated: 2025-01-01T00:00:00+00:00\nsource: manual\n---\nbody\n";
        let (header, body) = parse(text).unwrap();
        let once = serialize(&header, &body).unwrap();
        let (h2, b2) = parse(&once).unwrap();
        let twice = serialize(&h2, &b2).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn tags_always_serialize_as_a_list() {
        let (header, body) = parse("---\nurl: https://e.test\ntags: a, b\n---\n").unwrap();
        let text = serialize(&header, &body).unwrap();
        assert!(text.contains("tags:\n- a\n- b\n"), "got: {}", text);
    }

    #[test]
    fn empty_header_serializes_without_mapping_noise() {
        let header = Header::default();
        let text = serialize(&header, "body only\n").unwrap();
        assert_eq!(text, "---\n---\nbody only\n");
    }

    #[test]
    fn timestamps_survive_reserialization_verbatim() {
        let text = "---\nurl: https://e.test\ncreated: 2024-12-31T23:59:59+05:30\nmodified: 2025-01-01\n---\n";
        let (header, body) = parse(text).unwrap();
        let again = serialize(&header, &body).unwrap();
        assert!(again.contains("created: 2024-12-31T23:59:59+05:30\n"));
        assert!(again.contains("modified: 2025-01-01\n"));
    }
}
