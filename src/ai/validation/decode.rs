//! Tolerant decoding of model output into typed records
//!
//! Models often wrap JSON in a markdown fence, sometimes with a language tag.
//! Decoding unwraps one fenced block, then runs a strict `serde_json` parse.
//! Nothing is repaired: if the strict parse fails the outcome is `Failed`
//! and the raw text is kept for diagnostics.
//!
//! Rejected shapes:
//! - an opening fence without a closing one
//! - more than one fenced block
//! - anything the target type's `Deserialize` impl rejects

use serde::de::DeserializeOwned;

const FENCE: &str = "```";

/// Result of decoding one model utterance
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome<T> {
    Decoded(T),
    Failed { raw: String, reason: String },
}

impl<T> DecodeOutcome<T> {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }

    /// Decoded value, or `fallback` on failure
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Self::Decoded(value) => value,
            Self::Failed { .. } => fallback,
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Decoded(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }
}

impl<T: Default> DecodeOutcome<T> {
    pub fn unwrap_or_default(self) -> T {
        self.unwrap_or(T::default())
    }
}

/// Decode `raw` into `T`
pub fn decode<T: DeserializeOwned>(raw: &str) -> DecodeOutcome<T> {
    let payload = match unwrap_fence(raw) {
        Ok(payload) => payload,
        Err(reason) => {
            return DecodeOutcome::Failed {
                raw: raw.to_string(),
                reason,
            };
        }
    };

    match serde_json::from_str::<T>(payload) {
        Ok(value) => DecodeOutcome::Decoded(value),
        Err(e) => DecodeOutcome::Failed {
            raw: raw.to_string(),
            reason: e.to_string(),
        },
    }
}

/// Return the JSON payload: the trimmed text, or the body of its single fenced block
fn unwrap_fence(raw: &str) -> Result<&str, String> {
    let text = raw.trim();
    if !text.starts_with(FENCE) {
        return Ok(text);
    }

    let parts: Vec<&str> = text.split(FENCE).collect();
    match parts.len() {
        0..=2 => return Err("unclosed code fence".to_string()),
        3 => {}
        _ => return Err("multiple fenced blocks".to_string()),
    }

    Ok(strip_language_tag(parts[1]).trim())
}

fn strip_language_tag(block: &str) -> &str {
    if let Some((first_line, rest)) = block.split_once('\n') {
        let tag = first_line.trim();
        if tag.is_empty() || is_language_tag(tag) {
            return rest;
        }
        return block;
    }

    // Single-line block such as ```json{"a":1}```
    match block.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("json") => &block[4..],
        _ => block,
    }
}

fn is_language_tag(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RequirementSet, UserStory};
    use proptest::prelude::*;

    fn decode_set(raw: &str) -> DecodeOutcome<RequirementSet> {
        decode(raw)
    }

    #[test]
    fn test_plain_json() {
        let set = decode_set(r#"  {"functional":["A"],"non_functional":[],"constraints":[]} "#)
            .ok()
            .unwrap();
        assert_eq!(set.functional, vec!["A"]);
    }

    #[test]
    fn test_fenced_with_json_tag() {
        let raw = "```json\n{\"functional\":[\"A\"],\"non_functional\":[\"B\"],\"constraints\":[]}\n```";
        let set = decode_set(raw).ok().unwrap();
        assert_eq!(set.functional, vec!["A"]);
        assert_eq!(set.non_functional, vec!["B"]);
        assert!(set.constraints.is_empty());
    }

    #[test]
    fn test_fenced_without_tag() {
        let raw = "```\n{\"constraints\":[\"C\"]}\n```";
        assert_eq!(decode_set(raw).ok().unwrap().constraints, vec!["C"]);
    }

    #[test]
    fn test_fenced_single_line_json_prefix() {
        let raw = "```json{\"functional\":[\"A\"]}```";
        assert_eq!(decode_set(raw).ok().unwrap().functional, vec!["A"]);
    }

    #[test]
    fn test_trailing_prose_after_fence_is_ignored() {
        let raw = "```json\n{\"functional\":[]}\n```\nHope this helps!";
        assert!(decode_set(raw).is_decoded());
    }

    #[test]
    fn test_garbage_fails_with_raw() {
        match decode_set("Sorry, I cannot do that.") {
            DecodeOutcome::Failed { raw, .. } => assert_eq!(raw, "Sorry, I cannot do that."),
            DecodeOutcome::Decoded(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_prose_before_fence_fails() {
        let raw = "Here you go:\n```json\n{\"functional\":[]}\n```";
        assert!(!decode_set(raw).is_decoded());
    }

    #[test]
    fn test_unclosed_fence_fails() {
        let outcome = decode_set("```json\n{\"functional\":[]}");
        match outcome {
            DecodeOutcome::Failed { reason, .. } => assert!(reason.contains("unclosed")),
            DecodeOutcome::Decoded(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_multiple_fences_fail() {
        let raw = "```json\n{\"functional\":[]}\n```\n```json\n{\"functional\":[\"x\"]}\n```";
        match decode_set(raw) {
            DecodeOutcome::Failed { reason, .. } => assert!(reason.contains("multiple")),
            DecodeOutcome::Decoded(_) => panic!("expected failure"),
        }
    }

    #[test]
    fn test_wrong_types_fail() {
        assert!(!decode_set(r#"{"functional":"one string"}"#).is_decoded());
        assert!(!decode_set(r#"{"functional":[1,2]}"#).is_decoded());
    }

    #[test]
    fn test_unwrap_or_default() {
        let set = decode_set("nope").unwrap_or_default();
        assert!(set.is_empty());
    }

    #[test]
    fn test_story_list_one_bad_element_fails_all() {
        let raw = r#"[
            {"id":"US-001","title":"a","user_story":"b","description":"c","priority":"Low",
             "story_points":"2","epic":"e","acceptance_criteria":[]},
            {"id":"US-002","title":"a"}
        ]"#;
        assert!(!decode::<Vec<UserStory>>(raw).is_decoded());
    }

    proptest! {
        #[test]
        fn prop_decode_never_panics(raw in ".*") {
            let _ = decode::<RequirementSet>(&raw);
            let _ = decode::<Vec<UserStory>>(&raw);
        }

        #[test]
        fn prop_fallback_is_shape_valid(raw in "\\PC*") {
            let set = decode::<RequirementSet>(&raw).unwrap_or_default();
            let json = serde_json::to_value(&set).unwrap();
            prop_assert!(json["functional"].is_array());
            prop_assert!(json["non_functional"].is_array());
            prop_assert!(json["constraints"].is_array());
        }

        #[test]
        fn prop_fenced_lists_round_trip(
            functional in proptest::collection::vec("[a-zA-Z ]{1,20}", 0..5),
            constraints in proptest::collection::vec("[a-zA-Z ]{1,20}", 0..5),
        ) {
            let set = RequirementSet {
                functional,
                non_functional: Vec::new(),
                constraints,
            };
            let raw = format!("```json\n{}\n```", serde_json::to_string_pretty(&set).unwrap());
            prop_assert_eq!(decode::<RequirementSet>(&raw).ok(), Some(set));
        }
    }
}
