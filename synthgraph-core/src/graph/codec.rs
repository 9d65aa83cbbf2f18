//! Single-line text encoding of [`Properties`], shared by the persistence
//! backends.
//!
//! Entries are `key=tag:value` joined by `;`, with tags `i` (integer), `f`
//! (float) and `s` (text). Backslash escapes `\\`, `\;`, `\=`, `\t`, `\n` and
//! `\r` keep the payload on one tab-free line.

use std::{fmt::Write as _, sync::Arc};

use crate::error::CodecError;

use super::{Properties, PropertyValue};

const ENTRY_SEPARATOR: char = ';';
const KEY_SEPARATOR: char = '=';

impl Properties {
    /// Encodes the payload as a single line.
    ///
    /// # Examples
    /// ```
    /// use synthgraph_core::{Properties, PropertyValue};
    ///
    /// let properties = Properties::new()
    ///     .with("bytes", PropertyValue::Int(42))
    ///     .with("note", PropertyValue::text("a;b"));
    /// assert_eq!(properties.encode(), "bytes=i:42;note=s:a\\;b");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                out.push(ENTRY_SEPARATOR);
            }
            escape_into(key, &mut out);
            out.push(KEY_SEPARATOR);
            match value {
                PropertyValue::Int(number) => {
                    let _ = write!(out, "i:{number}");
                }
                PropertyValue::Float(number) => {
                    let _ = write!(out, "f:{number}");
                }
                PropertyValue::Text(text) => {
                    out.push_str("s:");
                    escape_into(text, &mut out);
                }
            }
        }
        out
    }

    /// Decodes a payload produced by [`Self::encode`].
    ///
    /// An empty string decodes to an empty payload.
    ///
    /// # Errors
    /// Returns a [`CodecError`] describing the first malformed entry.
    ///
    /// # Examples
    /// ```
    /// use synthgraph_core::{Properties, PropertyValue};
    ///
    /// let properties = Properties::decode("iat=f:0.25;proto=s:tcp")?;
    /// assert_eq!(properties.get("iat"), Some(&PropertyValue::Float(0.25)));
    /// assert_eq!(properties.get("proto"), Some(&PropertyValue::text("tcp")));
    /// # Ok::<(), synthgraph_core::CodecError>(())
    /// ```
    pub fn decode(encoded: &str) -> Result<Self, CodecError> {
        let mut properties = Self::new();
        for (key, tagged) in split_entries(encoded)? {
            if key.is_empty() {
                return Err(CodecError::EmptyKey);
            }
            let value = parse_tagged(&key, &tagged)?;
            properties.insert(Arc::from(key), value);
        }
        Ok(properties)
    }
}

fn escape_into(raw: &str, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ENTRY_SEPARATOR => out.push_str("\\;"),
            KEY_SEPARATOR => out.push_str("\\="),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
}

/// Splits on unescaped separators, unescaping as it goes.
fn split_entries(encoded: &str) -> Result<Vec<(String, String)>, CodecError> {
    let mut entries = Vec::new();
    if encoded.is_empty() {
        return Ok(entries);
    }

    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut chars = encoded.chars();
    while let Some(ch) = chars.next() {
        let literal = match ch {
            '\\' => match chars.next() {
                Some('\\') => '\\',
                Some(ENTRY_SEPARATOR) => ENTRY_SEPARATOR,
                Some(KEY_SEPARATOR) => KEY_SEPARATOR,
                Some('t') => '\t',
                Some('n') => '\n',
                Some('r') => '\r',
                Some(escaped) => return Err(CodecError::InvalidEscape { escaped }),
                None => return Err(CodecError::UnterminatedEscape),
            },
            ENTRY_SEPARATOR => {
                entries.push(finish_entry(&mut key, &mut value, in_value)?);
                in_value = false;
                continue;
            }
            KEY_SEPARATOR if !in_value => {
                in_value = true;
                continue;
            }
            other => other,
        };
        if in_value {
            value.push(literal);
        } else {
            key.push(literal);
        }
    }
    entries.push(finish_entry(&mut key, &mut value, in_value)?);
    Ok(entries)
}

fn finish_entry(
    key: &mut String,
    value: &mut String,
    in_value: bool,
) -> Result<(String, String), CodecError> {
    if !in_value {
        return Err(CodecError::MissingSeparator {
            entry: std::mem::take(key),
        });
    }
    Ok((std::mem::take(key), std::mem::take(value)))
}

fn parse_tagged(key: &str, tagged: &str) -> Result<PropertyValue, CodecError> {
    let invalid_number = || CodecError::InvalidNumber {
        key: key.to_owned(),
        value: tagged.to_owned(),
    };
    match tagged.split_once(':') {
        Some(("i", raw)) => raw.parse().map(PropertyValue::Int).map_err(|_| invalid_number()),
        Some(("f", raw)) => raw.parse().map(PropertyValue::Float).map_err(|_| invalid_number()),
        Some(("s", raw)) => Ok(PropertyValue::text(raw)),
        _ => Err(CodecError::UnknownTag {
            key: key.to_owned(),
            value: tagged.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn empty_payload_round_trips() {
        assert_eq!(Properties::new().encode(), "");
        assert!(Properties::decode("").expect("empty decodes").is_empty());
    }

    #[rstest]
    fn special_characters_survive_encoding() {
        let original = Properties::new()
            .with("k=ey", PropertyValue::text("tab\there;semi\\slash\nline"))
            .with("iat", PropertyValue::Float(-0.125))
            .with("bytes", PropertyValue::Int(i64::MIN));
        let encoded = original.encode();
        assert!(!encoded.contains('\t'));
        assert!(!encoded.contains('\n'));
        let decoded = Properties::decode(&encoded).expect("encoded payload must decode");
        assert_eq!(decoded, original);
    }

    #[rstest]
    #[case::missing_separator("bytes", CodecError::MissingSeparator { entry: "bytes".into() })]
    #[case::empty_key("=i:1", CodecError::EmptyKey)]
    #[case::dangling_escape("a=s:x\\", CodecError::UnterminatedEscape)]
    #[case::bad_escape("a=s:\\q", CodecError::InvalidEscape { escaped: 'q' })]
    #[case::bad_tag("a=x:1", CodecError::UnknownTag { key: "a".into(), value: "x:1".into() })]
    #[case::bad_int("a=i:one", CodecError::InvalidNumber { key: "a".into(), value: "i:one".into() })]
    fn malformed_payloads_are_rejected(#[case] encoded: &str, #[case] expected: CodecError) {
        let err = Properties::decode(encoded).expect_err("payload must be rejected");
        assert_eq!(err, expected);
    }
}
