//! Model output cleanup

use crate::segment::{split, Piece, THINKING_CLOSE, THINKING_OPEN};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// A tag name must follow `<` directly, so comparisons like `x < 5` are text
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("tag pattern"));
static BOLD_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*.*?\*\*:").expect("bold header pattern"));
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));
static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank lines pattern"));

/// Remove every `<...>` tag
pub fn strip_html_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

fn strip_tags_keeping_markers(text: &str) -> String {
    TAG_RE
        .replace_all(text, |caps: &Captures| {
            let tag = &caps[0];
            if tag == THINKING_OPEN || tag == THINKING_CLOSE {
                tag.to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Apply `clean` to the text inside and outside each matched reasoning span,
/// putting the markers back around every span afterwards
fn clean_pieces(text: &str, clean: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for piece in split(text) {
        match piece {
            Piece::Text(s) => out.push_str(&clean(s)),
            Piece::Reasoning(s) => {
                out.push_str(THINKING_OPEN);
                out.push_str(&clean(s));
                out.push_str(THINKING_CLOSE);
            }
        }
    }
    out
}

/// Remove every `<...>` tag except the reasoning markers
pub fn strip_tags_except_thinking(text: &str) -> String {
    clean_pieces(text, strip_tags_keeping_markers)
}

/// Remove `**Heading**:` style headers models like to prepend
pub fn strip_bold_headers(text: &str) -> String {
    BOLD_HEADER_RE.replace_all(text, "").into_owned()
}

/// Cleanup for a complete, non-streamed model response
pub fn clean_model_output(text: &str) -> String {
    clean_chunk(text).trim().to_string()
}

/// Cleanup for one streamed chunk; surrounding whitespace is kept so chunks
/// still join up
pub fn clean_chunk(text: &str) -> String {
    clean_pieces(text, |s| strip_bold_headers(&strip_tags_keeping_markers(s)))
}

/// Plain text for terminal display: tags removed, bold unwrapped, runs of
/// blank lines collapsed
pub fn clean_display_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = strip_html_tags(text);
    let text = BOLD_RE.replace_all(&text, "$1");
    let text = BLANK_LINES_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}
