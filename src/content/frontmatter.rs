//! Metadata block extraction from YAML (`---`) or TOML (`+++`) frontmatter.

use serde_json::{Map, Value};
use thiserror::Error;

/// Parsed document metadata, in source key order.
pub type Metadata = Map<String, Value>;

/// A content file split into metadata and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Structured metadata from the leading block (empty when absent).
    pub metadata: Metadata,
    /// Everything after the metadata block, verbatim.
    pub body: String,
}

/// Malformed metadata block.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("metadata block opened with `{0}` is never closed")]
    Unterminated(&'static str),

    #[error("invalid YAML metadata: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML metadata: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("metadata block must be a mapping, found {0}")]
    NotMapping(&'static str),
}

/// Metadata block flavor, chosen by its opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fence {
    Yaml,
    Toml,
}

impl Fence {
    const fn delimiter(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split `content` into metadata and body, parsing the metadata block.
pub fn parse_document(content: &str) -> Result<ParsedDocument, ParseError> {
    let Some((fence, block, body)) = split_block(content)? else {
        return Ok(ParsedDocument {
            metadata: Metadata::new(),
            body: content.to_string(),
        });
    };

    let metadata = match fence {
        Fence::Yaml => parse_yaml(block)?,
        Fence::Toml => parse_toml(block)?,
    };

    Ok(ParsedDocument {
        metadata,
        body: body.to_string(),
    })
}

/// Locate the metadata block.
///
/// Returns `(fence, block, body)`, or `None` when the document does not open
/// with a delimiter line.
fn split_block(content: &str) -> Result<Option<(Fence, &str, &str)>, ParseError> {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);

    let (first_line, rest) = match text.split_once('\n') {
        Some((line, rest)) => (line, rest),
        None => (text, ""),
    };
    let fence = match first_line.trim_end() {
        "---" => Fence::Yaml,
        "+++" => Fence::Toml,
        _ => return Ok(None),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == fence.delimiter() {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok(Some((fence, block, body)));
        }
        offset += line.len();
    }

    Err(ParseError::Unterminated(fence.delimiter()))
}

fn parse_yaml(block: &str) -> Result<Metadata, ParseError> {
    if block.trim().is_empty() {
        return Ok(Metadata::new());
    }
    into_mapping(serde_yaml::from_str::<Value>(block)?)
}

fn parse_toml(block: &str) -> Result<Metadata, ParseError> {
    into_mapping(toml::from_str::<Value>(block)?)
}

fn into_mapping(value: Value) -> Result<Metadata, ParseError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Metadata::new()),
        Value::Array(_) => Err(ParseError::NotMapping("a sequence")),
        Value::String(_) => Err(ParseError::NotMapping("a string")),
        Value::Number(_) => Err(ParseError::NotMapping("a number")),
        Value::Bool(_) => Err(ParseError::NotMapping("a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yaml_frontmatter() {
        let content = "---\ntitle: Hello\ncount: 42\n---\n\n# Body";
        let doc = parse_document(content).unwrap();

        assert_eq!(doc.metadata.get("title"), Some(&json!("Hello")));
        assert_eq!(doc.metadata.get("count"), Some(&json!(42)));
        assert_eq!(doc.body, "\n# Body");
    }

    #[test]
    fn test_yaml_nested_mappings() {
        let content = "---\nmeta:\n  title: Hi\n  og:image: /a.png\nheaders:\n  Cache-Control: max-age=60\n---\nbody";
        let doc = parse_document(content).unwrap();

        assert_eq!(doc.metadata["meta"]["title"], json!("Hi"));
        assert_eq!(doc.metadata["meta"]["og:image"], json!("/a.png"));
        assert_eq!(doc.metadata["headers"]["Cache-Control"], json!("max-age=60"));
    }

    #[test]
    fn test_key_order_preserved() {
        let content = "---\nzeta: 1\nalpha: 2\nmid: 3\n---\n";
        let doc = parse_document(content).unwrap();
        let keys: Vec<_> = doc.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_toml_frontmatter() {
        let content = "+++\ntitle = \"Hello\"\ntags = [\"a\", \"b\"]\n+++\n# Body";
        let doc = parse_document(content).unwrap();

        assert_eq!(doc.metadata.get("title"), Some(&json!("Hello")));
        assert_eq!(doc.metadata.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(doc.body, "# Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just content\n";
        let doc = parse_document(content).unwrap();

        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let doc = parse_document("---\n---\nbody").unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_crlf_delimiters() {
        let doc = parse_document("---\r\ntitle: Hi\r\n---\r\nbody").unwrap();
        assert_eq!(doc.metadata.get("title"), Some(&json!("Hi")));
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_unterminated_block() {
        let err = parse_document("---\ntitle: Hi\n# Body").unwrap_err();
        assert!(matches!(err, ParseError::Unterminated("---")));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse_document("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, ParseError::Yaml(_)));
    }

    #[test]
    fn test_sequence_is_not_mapping() {
        let err = parse_document("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, ParseError::NotMapping("a sequence")));
    }

    #[test]
    fn test_thematic_break_later_is_body() {
        let content = "# Title\n\n---\n\nmore";
        let doc = parse_document(content).unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, content);
    }
}
