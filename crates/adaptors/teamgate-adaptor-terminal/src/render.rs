//! Plain-text rendering of replies

use teamgate_core::{clean_display_text, SegmentedResponse};

pub const REASONING_LABEL: &str = "View AI Reasoning";

/// Render an assistant reply; reasoning blocks come after the answer and
/// only when `show_thinking` is set
pub fn render_reply(team: &str, reply: &SegmentedResponse, show_thinking: bool) -> String {
    let mut out = format!("{} Response:\n\n{}", team, clean_display_text(&reply.answer));
    if show_thinking {
        for block in reply.visible_reasoning() {
            let block = clean_display_text(block);
            if block.is_empty() {
                continue;
            }
            out.push_str("\n\n--- ");
            out.push_str(REASONING_LABEL);
            out.push_str(" ---\n");
            out.push_str(&block);
        }
    }
    out
}
