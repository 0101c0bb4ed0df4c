//! Plagiarism-match highlighting.
//!
//! Matches are located left to right: each one is searched for after the end
//! of the previous hit, and a match that cannot be found is skipped. Text
//! between hits is emitted as unmarked segments, so concatenating the
//! segments always reproduces the input.

use serde::Deserialize;
use serde_json::Value;

/// A phrase reported by the plagiarism check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Match {
    pub text: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "match".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    /// `None` for text outside any match.
    pub kind: Option<&'a str>,
}

/// Read the `matches` array of a plagiarism result. Entries without a
/// string `text` are dropped; a missing `type` reads as `"match"`.
pub fn matches_from(result: &Value) -> Vec<Match> {
    result
        .get("matches")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| Match::deserialize(item).ok())
                .collect()
        })
        .unwrap_or_default()
}

pub fn segments<'a>(text: &'a str, matches: &'a [Match]) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    let mut last = 0;

    for m in matches {
        if m.text.is_empty() {
            continue;
        }
        let Some(offset) = text[last..].find(m.text.as_str()) else {
            continue;
        };
        let start = last + offset;
        if start > last {
            out.push(Segment {
                text: &text[last..start],
                kind: None,
            });
        }
        let end = start + m.text.len();
        out.push(Segment {
            text: &text[start..end],
            kind: Some(m.kind.as_str()),
        });
        last = end;
    }

    if last < text.len() {
        out.push(Segment {
            text: &text[last..],
            kind: None,
        });
    }
    out
}

/// Render segments for a terminal, bracketing matched text with its kind.
pub fn render(segments: &[Segment<'_>]) -> String {
    segments
        .iter()
        .map(|s| match s.kind {
            Some(kind) => format!("[{kind}: {}]", s.text),
            None => s.text.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn m(text: &str, kind: &str) -> Match {
        Match {
            text: text.to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn no_matches_yields_whole_text_unmarked() {
        let segs = segments("plain words", &[]);
        assert_eq!(
            segs,
            vec![Segment {
                text: "plain words",
                kind: None
            }]
        );
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(segments("", &[m("x", "exact")]).is_empty());
    }

    #[test]
    fn matches_split_the_text() {
        let matches = [m("quick", "exact"), m("lazy", "paraphrase")];
        let segs = segments("the quick fox and the lazy dog", &matches);
        let kinds: Vec<_> = segs.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![None, Some("exact"), None, Some("paraphrase"), None]
        );
        let joined: String = segs.iter().map(|s| s.text).collect();
        assert_eq!(joined, "the quick fox and the lazy dog");
    }

    #[test]
    fn unfound_match_falls_back_to_original_text() {
        let matches = [m("not in there", "exact")];
        let segs = segments("completely original prose", &matches);
        assert_eq!(render(&segs), "completely original prose");
        assert!(segs.iter().all(|s| s.kind.is_none()));
    }

    #[test]
    fn search_resumes_after_previous_hit() {
        // The second "a" must be found after the first hit, not before it.
        let matches = [m("b", "exact"), m("a", "similar")];
        let segs = segments("a b a", &matches);
        assert_eq!(render(&segs), "a [exact: b] [similar: a]");
    }

    #[test]
    fn out_of_order_match_is_skipped() {
        let matches = [m("second", "exact"), m("first", "exact")];
        let segs = segments("first then second", &matches);
        assert_eq!(render(&segs), "first then [exact: second]");
    }

    #[test]
    fn matches_from_reads_plagiarism_result() {
        let result = json!({
            "matches": [
                { "text": "alpha", "type": "exact" },
                { "text": "beta" },
                { "type": "exact" }
            ]
        });
        assert_eq!(
            matches_from(&result),
            vec![m("alpha", "exact"), m("beta", "match")]
        );
    }

    #[test]
    fn matches_from_tolerates_missing_array() {
        assert!(matches_from(&json!({ "similarityScore": 0 })).is_empty());
        assert!(matches_from(&json!(null)).is_empty());
    }
}
