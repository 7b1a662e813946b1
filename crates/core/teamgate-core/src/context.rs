//! Codebase context for code-analysis questions
//!
//! Source files sent with a question are rendered into one block: a file
//! list with line counts, then each file's contents. Files longer than
//! [`MAX_FILE_CHARS`] keep only their first and last [`FILE_EDGE_CHARS`]
//! characters.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Files longer than this (in characters) are truncated
pub const MAX_FILE_CHARS: usize = 5000;
/// Characters kept from each end of a truncated file
pub const FILE_EDGE_CHARS: usize = 2500;
/// Placed between the kept head and tail
pub const TRUNCATION_MARKER: &str = "\n\n... [FILE TRUNCATED] ...\n\n";
/// Context text when no files were given
pub const NO_CODE_FILES: &str = "No code files provided.";

/// Keep the head and tail of an overlong file
pub fn truncate_middle(content: &str) -> Cow<'_, str> {
    let total = content.chars().count();
    if total <= MAX_FILE_CHARS {
        return Cow::Borrowed(content);
    }
    let head_end = content
        .char_indices()
        .nth(FILE_EDGE_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(content.len());
    let tail_start = content
        .char_indices()
        .nth(total - FILE_EDGE_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(content.len());
    Cow::Owned(format!(
        "{}{}{}",
        &content[..head_end],
        TRUNCATION_MARKER,
        &content[tail_start..]
    ))
}

/// Render `files` (path to contents) as a context block
pub fn codebase_context(files: &BTreeMap<String, String>) -> String {
    if files.is_empty() {
        return NO_CODE_FILES.to_string();
    }

    let mut context = String::from("=== CODEBASE ANALYSIS CONTEXT ===\n\n");
    context.push_str(&format!("Files analyzed: {} files\n", files.len()));
    context.push_str("File list:\n");
    for (path, content) in files {
        let lines = content.split('\n').count();
        context.push_str(&format!("- {} ({} lines)\n", path, lines));
    }

    context.push_str("\n=== FILE CONTENTS ===\n\n");
    for (path, content) in files {
        context.push_str(&format!("--- {} ---\n", path));
        context.push_str(&truncate_middle(content));
        context.push_str("\n\n");
    }
    context
}

/// Wrap a question with the codebase it is about
pub fn with_codebase_context(context: &str, query: &str) -> String {
    format!(
        "CODEBASE CONTEXT:\n{}\n\nUSER QUERY: {}\n\n\
         Please analyze the provided codebase and answer the user's question with specific \
         references to the code files when relevant.",
        context, query
    )
}
