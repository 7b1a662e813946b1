//! Response segmenter
//!
//! Splits `<thinking>...</thinking>` reasoning spans out of raw model output.
//! Each opening marker pairs with the next closing marker; a second opening
//! marker inside a matched span is plain text of that span. Unterminated
//! markers are left in the answer untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Opening reasoning marker
pub const THINKING_OPEN: &str = "<thinking>";
/// Closing reasoning marker
pub const THINKING_CLOSE: &str = "</thinking>";

static THINKING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<thinking>(.*?)</thinking>").expect("thinking pattern"));

/// Model output split into reasoning and answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedResponse {
    /// Reasoning segments in order of appearance, untrimmed
    pub reasoning: Vec<String>,
    /// Everything outside matched spans, trimmed
    pub answer: String,
}

impl SegmentedResponse {
    /// Trimmed, non-empty segments, for display
    pub fn visible_reasoning(&self) -> impl Iterator<Item = &str> {
        self.reasoning
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Visible segments joined by a blank line
    pub fn join_reasoning(&self) -> String {
        self.visible_reasoning().collect::<Vec<_>>().join("\n\n")
    }

    /// True when at least one visible segment exists
    pub fn has_reasoning(&self) -> bool {
        self.visible_reasoning().next().is_some()
    }
}

/// A slice of raw output, either plain text or the inside of a reasoning span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Text outside any matched span
    Text(&'a str),
    /// Text between a matched marker pair, markers excluded
    Reasoning(&'a str),
}

impl<'a> Piece<'a> {
    /// The borrowed text regardless of kind
    pub fn as_str(&self) -> &'a str {
        match self {
            Piece::Text(s) | Piece::Reasoning(s) => s,
        }
    }
}

/// Split raw output into ordered pieces. Concatenating every piece gives the
/// input with the matched markers removed.
pub fn split(raw: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut cursor = 0;

    for caps in THINKING_RE.captures_iter(raw) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            pieces.push(Piece::Text(&raw[cursor..whole.start()]));
        }
        pieces.push(Piece::Reasoning(inner.as_str()));
        cursor = whole.end();
    }

    if cursor < raw.len() {
        pieces.push(Piece::Text(&raw[cursor..]));
    }

    pieces
}

/// Segment raw model output into reasoning and a trimmed answer
pub fn segment(raw: &str) -> SegmentedResponse {
    let mut reasoning = Vec::new();
    let mut answer = String::with_capacity(raw.len());

    for piece in split(raw) {
        match piece {
            Piece::Text(s) => answer.push_str(s),
            Piece::Reasoning(s) => reasoning.push(s.to_string()),
        }
    }

    SegmentedResponse {
        reasoning,
        answer: answer.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_no_reasoning() {
        let out = segment("  just an answer\n");
        assert!(out.reasoning.is_empty());
        assert_eq!(out.answer, "just an answer");
    }

    #[test]
    fn test_leading_segment() {
        let out = segment("<thinking>weigh options</thinking>\n\nGo with B.");
        assert_eq!(out.reasoning, vec!["weigh options".to_string()]);
        assert_eq!(out.answer, "Go with B.");
    }

    #[test]
    fn test_multiple_segments_anywhere() {
        let raw = "Intro. <thinking>one</thinking> middle <thinking>\ntwo\nlines\n</thinking> end.";
        let out = segment(raw);
        assert_eq!(
            out.reasoning,
            vec!["one".to_string(), "\ntwo\nlines\n".to_string()]
        );
        assert_eq!(out.answer, "Intro.  middle  end.");
    }

    #[test]
    fn test_unterminated_marker_is_literal() {
        let raw = "Answer first <thinking>never closed";
        let out = segment(raw);
        assert!(out.reasoning.is_empty());
        assert_eq!(out.answer, raw);
    }

    #[test]
    fn test_stray_closing_marker_is_literal() {
        let out = segment("done</thinking>");
        assert!(out.reasoning.is_empty());
        assert_eq!(out.answer, "done</thinking>");
    }

    #[test]
    fn test_marker_is_case_sensitive() {
        let out = segment("<THINKING>shout</THINKING>ok");
        assert!(out.reasoning.is_empty());
        assert_eq!(out.answer, "<THINKING>shout</THINKING>ok");
    }

    #[test]
    fn test_nested_open_marker_stays_inside_first_span() {
        let out = segment("<thinking>a<thinking>b</thinking>c</thinking>");
        assert_eq!(out.reasoning, vec!["a<thinking>b".to_string()]);
        assert_eq!(out.answer, "c</thinking>");
    }

    #[test]
    fn test_whitespace_segments_are_kept_but_not_visible() {
        let out = segment("<thinking>   </thinking>answer<thinking> real </thinking>");
        assert_eq!(out.reasoning.len(), 2);
        assert_eq!(out.reasoning[0], "   ");
        assert_eq!(out.visible_reasoning().collect::<Vec<_>>(), vec!["real"]);
        assert_eq!(out.answer, "answer");
    }

    #[test]
    fn test_whole_output_is_reasoning() {
        let out = segment("<thinking>only thoughts</thinking>");
        assert_eq!(out.reasoning, vec!["only thoughts".to_string()]);
        assert_eq!(out.answer, "");
        assert!(out.has_reasoning());
    }

    #[test]
    fn test_pieces_reassemble_input_without_markers() {
        let inputs = [
            "",
            "no markers at all",
            "<thinking>x</thinking>",
            "a<thinking>b</thinking>c<thinking>d</thinking>e",
            "  <thinking>\nmulti\n</thinking>\n tail ",
            "<thinking></thinking><thinking>back to back</thinking>",
        ];
        for raw in inputs {
            let rebuilt: String = split(raw).iter().map(Piece::as_str).collect();
            let expected = raw.replace(THINKING_OPEN, "").replace(THINKING_CLOSE, "");
            assert_eq!(rebuilt, expected, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_join_reasoning() {
        let out = segment("<thinking> a </thinking>x<thinking>b</thinking>");
        assert_eq!(out.join_reasoning(), "a\n\nb");
    }

    #[test]
    fn test_multibyte_text_survives() {
        let out = segment("héllo <thinking>ünïcode 🤔</thinking> wörld");
        assert_eq!(out.reasoning, vec!["ünïcode 🤔".to_string()]);
        assert_eq!(out.answer, "héllo  wörld");
    }
}
