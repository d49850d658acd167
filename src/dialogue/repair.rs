//! Turns raw model replies into a valid [`Dialogue`].
//!
//! Models served without structured-output support often wrap the JSON in
//! prose, drop fields, or return lines as bare strings. [`repair`] accepts
//! any text and always produces a dialogue with a non-empty scratchpad, a
//! non-empty guest name and at least one line with non-empty text.

use super::{Dialogue, DialogueLine, Speaker};
use serde::Serialize;
use serde_json::{Map, Value};

/// Placeholder for missing scratchpad or line text.
pub const PLACEHOLDER: &str = "Not specified";
/// Scratchpad used when nothing parseable was found.
pub const FALLBACK_SCRATCHPAD: &str = "No structured reasoning available";
/// Guest name used when the model did not provide one.
pub const DEFAULT_GUEST: &str = "Guest";

/// How a reply was turned into a dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairKind {
    /// The whole reply was a JSON object.
    Parsed,
    /// A JSON object was cut out of surrounding text.
    Extracted,
    /// No JSON object found; the raw text became a single host line.
    Fallback,
}

impl RepairKind {
    /// True when the reply could not be parsed at all.
    pub fn is_degraded(&self) -> bool {
        matches!(self, RepairKind::Fallback)
    }
}

/// A repaired dialogue and how it was obtained.
#[derive(Debug, Clone)]
pub struct Repaired {
    pub dialogue: Dialogue,
    pub kind: RepairKind,
}

/// Repair a raw model reply. Never fails.
pub fn repair(raw: &str) -> Repaired {
    if let Some(object) = parse_object(raw) {
        return Repaired {
            dialogue: normalize(object),
            kind: RepairKind::Parsed,
        };
    }

    if let Some(object) = braced_snippet(raw).and_then(parse_object) {
        return Repaired {
            dialogue: normalize(object),
            kind: RepairKind::Extracted,
        };
    }

    Repaired {
        dialogue: Dialogue {
            scratchpad: FALLBACK_SCRATCHPAD.to_string(),
            name_of_guest: DEFAULT_GUEST.to_string(),
            lines: vec![host_line(raw.to_string())],
        },
        kind: RepairKind::Fallback,
    }
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Text from the first `{` to the last `}`, inclusive.
fn braced_snippet(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn normalize(mut object: Map<String, Value>) -> Dialogue {
    let scratchpad = non_blank_string(object.get("scratchpad")).unwrap_or_else(|| PLACEHOLDER.to_string());
    let name_of_guest =
        non_blank_string(object.get("name_of_guest")).unwrap_or_else(|| DEFAULT_GUEST.to_string());

    let lines = match object.remove("dialogue") {
        Some(Value::Array(items)) => items.into_iter().map(normalize_line).collect(),
        Some(other) => vec![host_line(stringify(&other))],
        None => vec![host_line(String::new())],
    };

    let lines = if lines.is_empty() {
        vec![host_line(String::new())]
    } else {
        lines
    };

    Dialogue {
        scratchpad,
        name_of_guest,
        lines,
    }
}

fn normalize_line(item: Value) -> DialogueLine {
    let Value::Object(fields) = item else {
        return host_line(stringify(&item));
    };

    let speaker = match fields.get("speaker").and_then(Value::as_str) {
        Some(name) if name == Speaker::Guest.wire_name() => Speaker::Guest,
        _ => Speaker::Host,
    };

    let text = match fields.get("text") {
        None | Some(Value::Null) => String::new(),
        Some(value) => stringify(value),
    };

    DialogueLine::new(speaker, or_placeholder(text))
}

fn host_line(text: String) -> DialogueLine {
    DialogueLine::new(Speaker::Host, or_placeholder(text))
}

fn or_placeholder(text: String) -> String {
    if text.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        text
    }
}

/// Strings verbatim, anything else as compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn non_blank_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid(dialogue: &Dialogue) {
        assert!(!dialogue.scratchpad.trim().is_empty());
        assert!(!dialogue.name_of_guest.trim().is_empty());
        assert!(!dialogue.lines.is_empty());
        for line in &dialogue.lines {
            assert!(!line.text.trim().is_empty());
        }
    }

    #[test]
    fn test_well_formed_reply() {
        let raw = r#"{
            "scratchpad": "outline",
            "name_of_guest": "Dr. Ada",
            "dialogue": [
                {"speaker": "Host (Jane)", "text": "Welcome to the show."},
                {"speaker": "Guest", "text": "Glad to be here."}
            ]
        }"#;

        let repaired = repair(raw);
        assert_eq!(repaired.kind, RepairKind::Parsed);
        assert_eq!(repaired.dialogue.name_of_guest, "Dr. Ada");
        assert_eq!(repaired.dialogue.lines.len(), 2);
        assert_eq!(repaired.dialogue.lines[1].speaker, Speaker::Guest);
    }

    #[test]
    fn test_json_wrapped_in_prose() {
        let raw = "Sure! Here is your podcast:\n```json\n{\"scratchpad\": \"s\", \"name_of_guest\": \"Bo\", \"dialogue\": [{\"speaker\": \"Guest\", \"text\": \"Hi\"}]}\n```\nEnjoy!";

        let repaired = repair(raw);
        assert_eq!(repaired.kind, RepairKind::Extracted);
        assert_eq!(repaired.dialogue.name_of_guest, "Bo");
        assert_eq!(repaired.dialogue.lines, vec![DialogueLine::new(Speaker::Guest, "Hi")]);
    }

    #[test]
    fn test_unparseable_reply_falls_back_to_single_host_line() {
        let raw = "I'm sorry, I can't produce JSON {today";

        let repaired = repair(raw);
        assert_eq!(repaired.kind, RepairKind::Fallback);
        assert!(repaired.kind.is_degraded());
        assert_eq!(repaired.dialogue.scratchpad, FALLBACK_SCRATCHPAD);
        assert_eq!(repaired.dialogue.name_of_guest, DEFAULT_GUEST);
        assert_eq!(repaired.dialogue.lines, vec![DialogueLine::new(Speaker::Host, raw)]);
    }

    #[test]
    fn test_malformed_inputs_always_yield_valid_dialogue() {
        let inputs = [
            "",
            "   ",
            "null",
            "42",
            "[1, 2, 3]",
            "\"just a string\"",
            "{",
            "}{",
            "{\"dialogue\": []}",
            "{\"dialogue\": [null, \"\", 7, {}]}",
            "{\"scratchpad\": \"\", \"name_of_guest\": 3, \"dialogue\": [{\"speaker\": 1, \"text\": \"  \"}]}",
            "prefix {\"dialogue\": \"oops\" suffix",
        ];

        for raw in inputs {
            let repaired = repair(raw);
            assert_valid(&repaired.dialogue);
        }
    }

    #[test]
    fn test_missing_dialogue_field_uses_placeholder() {
        let repaired = repair(r#"{"scratchpad": "s", "name_of_guest": "Kim"}"#);
        assert_eq!(repaired.kind, RepairKind::Parsed);
        assert_eq!(repaired.dialogue.lines, vec![DialogueLine::new(Speaker::Host, PLACEHOLDER)]);
    }

    #[test]
    fn test_non_array_dialogue_is_stringified() {
        let repaired = repair(r#"{"dialogue": "Host: hello there"}"#);
        assert_eq!(
            repaired.dialogue.lines,
            vec![DialogueLine::new(Speaker::Host, "Host: hello there")]
        );

        let repaired = repair(r#"{"dialogue": {"speaker": "Guest", "text": "Hi"}}"#);
        assert_eq!(repaired.dialogue.lines.len(), 1);
        assert_eq!(repaired.dialogue.lines[0].speaker, Speaker::Host);
        assert_eq!(repaired.dialogue.lines[0].text, r#"{"speaker":"Guest","text":"Hi"}"#);
    }

    #[test]
    fn test_line_level_repairs() {
        let raw = r#"{
            "scratchpad": "s",
            "name_of_guest": "Kim",
            "dialogue": [
                "a bare string line",
                {"speaker": "Narrator", "text": "unknown speaker"},
                {"speaker": "Guest"},
                {"text": "no speaker"},
                {"speaker": "Guest", "text": 12}
            ]
        }"#;

        let lines = repair(raw).dialogue.lines;
        assert_eq!(lines[0], DialogueLine::new(Speaker::Host, "a bare string line"));
        assert_eq!(lines[1], DialogueLine::new(Speaker::Host, "unknown speaker"));
        assert_eq!(lines[2], DialogueLine::new(Speaker::Guest, PLACEHOLDER));
        assert_eq!(lines[3], DialogueLine::new(Speaker::Host, "no speaker"));
        assert_eq!(lines[4], DialogueLine::new(Speaker::Guest, "12"));
    }

    #[test]
    fn test_backfills_header_fields() {
        let repaired = repair(r#"{"dialogue": [{"speaker": "Guest", "text": "Hi"}]}"#);
        assert_eq!(repaired.dialogue.scratchpad, PLACEHOLDER);
        assert_eq!(repaired.dialogue.name_of_guest, DEFAULT_GUEST);
    }
}
