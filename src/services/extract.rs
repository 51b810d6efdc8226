//! Code extraction: pull the first fenced block out of model output.
//!
//! DESIGN
//! ======
//! Models are told to answer with exactly one ```` ```html ```` fence and
//! nothing else, but they drift: prose before or after, a second block, CRLF
//! line endings, indented fences. The scan is line based:
//!
//! - the opening fence is the first line whose content starts with three
//!   backticks; whatever follows them on that line is the language tag;
//! - the closing fence is the next such line;
//! - the body is everything between, minus leading and trailing blank lines
//!   and the final line terminator. Nothing else is touched.
//!
//! An opening fence with no closing fence is rejected. Backticks glued to
//! the end of a code line (`<p>x</p>```) do not close the block, so a reply
//! whose only closing marker sits there is rejected too. Later blocks are
//! ignored. An empty block is a valid, empty result.

use serde::Serialize;

use crate::error::ErrorCode;

pub const FENCE: &str = "```";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no code block found")]
    NoCodeBlock,
    #[error("unterminated code block")]
    Unterminated,
}

impl ErrorCode for ExtractError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoCodeBlock => "E_NO_CODE_BLOCK",
            Self::Unterminated => "E_UNTERMINATED_CODE_BLOCK",
        }
    }
}

/// A fenced block located inside a larger text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    /// Tag after the opening backticks, e.g. `html`. `None` for a bare fence.
    pub language: Option<&'a str>,
    pub body: &'a str,
}

/// Extracted application markup. Inline `<style>` and `<script>` stay inside
/// `html`; nothing is split out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedCode {
    pub html: String,
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Locate the first fenced block in `text`.
///
/// # Errors
///
/// [`ExtractError::NoCodeBlock`] if no line opens a fence,
/// [`ExtractError::Unterminated`] if the first fence is never closed.
pub fn extract_code_block(text: &str) -> Result<CodeBlock<'_>, ExtractError> {
    let mut lines = line_spans(text);

    let (open_start, open_line) = lines
        .find(|(_, line)| is_fence(line))
        .ok_or(ExtractError::NoCodeBlock)?;
    let body_start = open_start + open_line.len();

    let (close_start, _) = lines
        .find(|(_, line)| is_fence(line))
        .ok_or(ExtractError::Unterminated)?;

    Ok(CodeBlock { language: fence_language(open_line), body: trim_blank_lines(&text[body_start..close_start]) })
}

impl From<CodeBlock<'_>> for ExtractedCode {
    fn from(block: CodeBlock<'_>) -> Self {
        Self { html: block.body.to_string() }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Lines with their byte offsets. Each line keeps its terminator.
fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |pos, line| {
        let start = *pos;
        *pos += line.len();
        Some((start, line))
    })
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

fn fence_language(line: &str) -> Option<&str> {
    let tag = line.trim_start().trim_start_matches('`').trim();
    (!tag.is_empty()).then_some(tag)
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Drop whitespace-only lines at both ends and the last line's terminator.
fn trim_blank_lines(text: &str) -> &str {
    let mut first = None;
    let mut last_end = 0;
    for (start, line) in line_spans(text) {
        if line.trim().is_empty() {
            continue;
        }
        first.get_or_insert(start);
        last_end = start + strip_terminator(line).len();
    }
    match first {
        Some(start) => &text[start..last_end],
        None => "",
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
