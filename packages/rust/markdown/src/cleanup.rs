//! Post-conversion cleanup pipeline for Markdown output.
//!
//! Each cleanup pass is a function `&str -> String` applied in sequence.
//! Passes never touch the inside of fenced code blocks.

use std::sync::LazyLock;

use regex::Regex;

/// Run the full cleanup pipeline on raw Markdown text.
pub(crate) fn run_pipeline(md: &str) -> String {
    let mut result = md.to_string();

    result = strip_editor_fillers(&result);
    result = clean_blank_lines(&result);
    result = trim_document(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Strip editor filler characters
// ---------------------------------------------------------------------------

/// Remove zero-width fillers the rich-text editor inserts to keep the caret
/// inside empty inline elements.
fn strip_editor_fillers(md: &str) -> String {
    map_outside_code_blocks(md, |line| line.replace('\u{200b}', ""))
}

// ---------------------------------------------------------------------------
// Pass 2: Collapse blank lines
// ---------------------------------------------------------------------------

/// Collapse runs of blank lines outside code blocks into a single blank line.
fn clean_blank_lines(md: &str) -> String {
    static BLANK_LINE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[ \t]*$").expect("valid regex"));

    let mut result: Vec<&str> = Vec::new();
    let mut in_code_block = false;
    let mut previous_blank = false;

    for line in md.lines() {
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
        }

        let blank = !in_code_block && BLANK_LINE_RE.is_match(line);
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        result.push(if blank { "" } else { line });
    }

    result.join("\n")
}

// ---------------------------------------------------------------------------
// Pass 3: Trim the document
// ---------------------------------------------------------------------------

/// Drop leading and trailing newlines; the export has no trailing newline.
fn trim_document(md: &str) -> String {
    md.trim_matches('\n').to_string()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Apply `f` to every line outside fenced code blocks.
fn map_outside_code_blocks(md: &str, f: impl Fn(&str) -> String) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_code_block = false;

    for line in md.lines() {
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            lines.push(line.to_string());
            continue;
        }

        if in_code_block {
            lines.push(line.to_string());
        } else {
            lines.push(f(line));
        }
    }

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_editor_fillers_removes_zero_width_space() {
        let input = "Hello\u{200b} world";
        assert_eq!(strip_editor_fillers(input), "Hello world");
    }

    #[test]
    fn strip_editor_fillers_preserves_code_blocks() {
        let input = "```\na\u{200b}b\n```";
        assert_eq!(strip_editor_fillers(input), input);
    }

    #[test]
    fn clean_blank_lines_collapses_runs() {
        let input = "Line 1\n\n\n\nLine 2";
        assert_eq!(clean_blank_lines(input), "Line 1\n\nLine 2");
    }

    #[test]
    fn clean_blank_lines_keeps_single_blank() {
        let input = "Line 1\n\nLine 2";
        assert_eq!(clean_blank_lines(input), input);
    }

    #[test]
    fn clean_blank_lines_preserves_code_blocks() {
        let input = "```\na\n\n\nb\n```";
        assert_eq!(clean_blank_lines(input), input);
    }

    #[test]
    fn trim_document_drops_outer_newlines() {
        assert_eq!(trim_document("\n\n# Title\n\n"), "# Title");
    }

    #[test]
    fn trailing_hard_breaks_survive() {
        let input = "line one  \nline two";
        assert_eq!(run_pipeline(input), input);
    }

    #[test]
    fn full_pipeline_cleans_markdown() {
        let input = "\n# Title\n\n\n\nSome\u{200b} text\n\n\n";
        assert_eq!(run_pipeline(input), "# Title\n\nSome text");
    }
}
