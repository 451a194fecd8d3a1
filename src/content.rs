//! Message content and its JSON wire encoding
//!
//! Content is the one string in a chat request that does not go through the
//! stock serde_json string writer. Scalars outside the Basic Multilingual
//! Plane are written as a UTF-16 surrogate pair of `\uXXXX` escapes, and
//! everything else is written ASCII-safe, so the body never carries raw
//! multi-byte UTF-8 inside message text.

use std::fmt;

use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

/// Text of a chat message
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Content(String);

impl Content
{   pub fn new(text: impl Into<String>) -> Self
    {   Content(text.into())
    }

    pub fn as_str(&self) -> &str
    {   &self.0
    }

    pub fn into_string(self) -> String
    {   self.0
    }

    pub fn is_empty(&self) -> bool
    {   self.0.is_empty()
    }

    /// Wire form without the surrounding quotes
    pub fn encoded(&self) -> String
    {   encode_content(&self.0)
    }
}

/// Encode `text` as the interior of a JSON string literal.
///
/// BMP runs are quoted ASCII-safe; each scalar at or above
/// U+10000 becomes `\uHHHH\uLLLL` (lowercase, four digits each). The result
/// carries no outer quotes. Wrapped in `"` it parses back to `text`.
pub fn encode_content(text: &str) -> String
{   let mut out = String::with_capacity(text.len() + 8);
    let mut run_start = 0;

    for (i, c) in text.char_indices()
    {   if (c as u32) < 0x10000
        {   continue;
        }

        if i > run_start
        {   quote_ascii_into(&mut out, &text[run_start..i]);
        }

        let mut units = [0u16; 2];
        c.encode_utf16(&mut units);
        out.push_str(&format!("\\u{:04x}\\u{:04x}", units[0], units[1]));

        run_start = i + c.len_utf8();
    }

    if run_start < text.len()
    {   quote_ascii_into(&mut out, &text[run_start..]);
    }

    out
}

/// ASCII-safe JSON quoting of a run of BMP text, without quotes
fn quote_ascii_into(out: &mut String, run: &str)
{   for c in run.chars()
    {   match c
        {   '"' => out.push_str("\\\"")
          , '\\' => out.push_str("\\\\")
          , '\u{08}' => out.push_str("\\b")
          , '\u{0c}' => out.push_str("\\f")
          , '\n' => out.push_str("\\n")
          , '\r' => out.push_str("\\r")
          , '\t' => out.push_str("\\t")
          , ' '..='~' => out.push(c)
          , _ => {
              debug_assert!((c as u32) < 0x10000);
              out.push_str(&format!("\\u{:04x}", c as u32));
            }
        }
    }
}

impl Serialize for Content
{   fn serialize<S>(&self, serializer: S)
      -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {   let quoted = format!("\"{}\"", encode_content(&self.0));
        let raw = RawValue::from_string(quoted)
          .map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Content
{   fn deserialize<D>(deserializer: D)
      -> Result<Self, D::Error>
    where
        D: Deserializer<'de>
    {   let text = Option::<String>::deserialize(deserializer)?;
        Ok(Content(text.unwrap_or_default()))
    }
}

impl fmt::Display for Content
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(&self.0)
    }
}

impl AsRef<str> for Content
{   fn as_ref(&self) -> &str
    {   &self.0
    }
}

impl From<String> for Content
{   fn from(s: String) -> Self
    {   Content(s)
    }
}

impl From<&str> for Content
{   fn from(s: &str) -> Self
    {   Content(s.to_string())
    }
}

impl From<Content> for String
{   fn from(c: Content) -> Self
    {   c.0
    }
}

impl PartialEq<str> for Content
{   fn eq(&self, other: &str) -> bool
    {   self.0 == other
    }
}

impl PartialEq<&str> for Content
{   fn eq(&self, other: &&str) -> bool
    {   self.0 == *other
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    fn decode(fragment: &str) -> String
    {   serde_json::from_str(&format!("\"{}\"", fragment))
          .expect("fragment should be a valid JSON string body")
    }

    #[test]
    fn empty_input_encodes_to_empty()
    {   assert_eq!(encode_content(""), "");
    }

    #[test]
    fn printable_ascii_matches_standard_quoting()
    {   let text = "Hello, world! {\"a\": [1, 2]} / \\ ~";
        let standard = serde_json::to_string(text).unwrap();
        assert_eq!(
          encode_content(text),
          &standard[1..standard.len() - 1]
        );
    }

    #[test]
    fn surrogate_pair_is_lowercase_and_paired()
    {   let out = encode_content("😀");
        assert_eq!(out, "\\ud83d\\ude00");
        assert!(out.contains("\\ud83d\\ude00"));
        assert!(!out.contains("\\U"));
    }

    #[test]
    fn mixed_segments_have_no_artifacts()
    {   assert_eq!(encode_content("A😀B"), "A\\ud83d\\ude00B");
        assert_eq!(
          encode_content("Hello 😀!"),
          "Hello \\ud83d\\ude00!"
        );
    }

    #[test]
    fn only_supplementary_emits_only_pairs()
    {   assert_eq!(
          encode_content("😀😃"),
          "\\ud83d\\ude00\\ud83d\\ude03"
        );
    }

    #[test]
    fn non_ascii_bmp_is_escaped_ascii_safe()
    {   assert_eq!(encode_content("é"), "\\u00e9");
        assert_eq!(encode_content("中文"), "\\u4e2d\\u6587");
        assert_eq!(encode_content("\u{ffff}"), "\\uffff");
        assert!(encode_content("naïve café").is_ascii());
    }

    #[test]
    fn control_characters_use_json_escapes()
    {   assert_eq!(
          encode_content("a\nb\tc\r\u{08}\u{0c}"),
          "a\\nb\\tc\\r\\b\\f"
        );
        assert_eq!(encode_content("\u{01}\u{1f}\u{7f}"), "\\u0001\\u001f\\u007f");
        assert_eq!(decode(&encode_content("\u{0}x\u{7f}")), "\u{0}x\u{7f}");
    }

    #[test]
    fn plane_boundaries_round_trip()
    {   for c in ['\u{10000}', '\u{10ffff}', '\u{1f600}', '\u{20000}']
        {   let text = c.to_string();
            let out = encode_content(&text);
            assert!(out.is_ascii());
            assert_eq!(out.len(), 12, "one pair for {:?}", c);
            assert_eq!(decode(&out), text);
        }
    }

    #[test]
    fn every_supplementary_plane_sample_round_trips()
    {   let mut cp = 0x10000u32;
        while cp <= 0x10ffff
        {   let c = char::from_u32(cp).unwrap();
            let text = format!("x{}y", c);
            assert_eq!(decode(&encode_content(&text)), text);
            cp += 0x3f1;
        }
    }

    #[test]
    fn serializes_with_quotes_inside_a_document()
    {   #[derive(Serialize)]
        struct Doc
        {   content: Content
        }

        let doc = Doc { content: Content::from("A😀B\"") };
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, "{\"content\":\"A\\ud83d\\ude00B\\\"\"}");

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["content"], "A😀B\"");
    }

    #[test]
    fn encoded_form_and_text_stay_separate()
    {   let content = Content::new("caf\u{e9} \u{1f600}");
        assert_eq!(content.encoded(), encode_content(content.as_str()));
        assert!(content.encoded().is_ascii());
        assert_eq!(content.into_string(), "caf\u{e9} \u{1f600}");
    }

    #[test]
    fn deserializes_as_plain_text()
    {   let c: Content = serde_json::from_str(r#""hi 😀""#).unwrap();
        assert_eq!(c, "hi 😀");

        let c: Content = serde_json::from_str("null").unwrap();
        assert!(c.is_empty());
    }
}
