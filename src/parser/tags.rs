//! Doc-token layer over the raw tokenizer.
//!
//! Inside a comment block, a newline followed by a leading `*` decoration is
//! invisible to callers; the exception is a `-` list marker right after the
//! decoration, which re-emits a paragraph break into the collected text.

use crate::diag::{warn, DiagnosticSink};
use crate::tokenizer::Tokenizer;

pub fn is_doc_begin(token: &str) -> bool {
    token == "/**"
}

pub fn is_doc_tag(token: &str) -> bool {
    token.starts_with('@') && token.len() > 1
}

pub fn is_doc_end(token: &str) -> bool {
    token == "*/" || token.is_empty()
}

/// True when the token ends the free-text part of a component.
pub fn is_text_end(token: &str) -> bool {
    is_doc_tag(token) || is_doc_end(token)
}

/// Advances to the next token, swallowing a newline plus the `*` line
/// decoration of a comment block.
pub fn next_doc_token(tok: &mut Tokenizer) {
    tok.next_token();
    while tok.token() == "\n" {
        tok.next_token();
        if tok.token() == "*" {
            tok.next_token();
        }
    }
}

/// Checks that the current token is `expected` and skips it; reports a
/// diagnostic otherwise. Returns whether the token was present.
pub fn require_token(
    tok: &mut Tokenizer,
    sink: &mut dyn DiagnosticSink,
    message: &str,
    expected: &str,
) -> bool {
    let present = tok.token() == expected;
    if present {
        next_doc_token(tok);
    } else {
        warn(sink, tok, message);
    }
    present
}

/// Collects free text up to the next tag or comment end, joining words with
/// single spaces. A `-` right after a swallowed line decoration starts a
/// list item: a blank line before the first one, a single newline before
/// subsequent ones, with no joining space.
pub fn collect_text(tok: &mut Tokenizer) -> String {
    let mut result = String::new();
    let mut first_item = true;
    let mut skip_space = false;
    while !is_text_end(tok.token()) {
        if !result.is_empty() && !skip_space {
            result.push(' ');
        }
        skip_space = false;
        result.push_str(tok.token());
        tok.next_token();
        while tok.token() == "\n" {
            tok.next_token();
            if tok.token() == "*" {
                tok.next_token();
                if tok.token() == "-" {
                    result.push_str(if first_item { "\n\n" } else { "\n" });
                    first_item = false;
                    skip_space = true;
                }
            }
        }
    }
    result
}

/// Strips the `* ` line decoration from the start of a raw comment line.
fn strip_doc_line_start(line: &str) -> String {
    let trimmed = line.trim_start();
    if let Some(rest) = trimmed.strip_prefix("* ") {
        rest.to_string()
    } else if let Some(rest) = trimmed.strip_prefix('*') {
        rest.to_string()
    } else {
        line.to_string()
    }
}

/// Collects raw multi-line text (used for `@example`), preserving newlines,
/// up to the next tag line or comment end. A line beginning with `@` is not
/// consumed: the cursor rolls back so the tag dispatch sees it.
pub fn collect_text_verbatim(tok: &mut Tokenizer) -> String {
    let mut result = String::new();
    while !is_text_end(tok.token()) {
        let cursor = tok.cursor();
        let line = strip_doc_line_start(&tok.verbatim_line());
        if line.starts_with('@') {
            tok.rewind(cursor);
            next_doc_token(tok);
            break;
        }
        result.push_str(&line);
        next_doc_token(tok);
    }
    result.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::CollectSink;

    fn doc_tokenizer(input: &str) -> Tokenizer {
        let mut tok = Tokenizer::new("test", input);
        tok.next_token();
        tok
    }

    #[test]
    fn doc_token_swallows_line_decoration() {
        let mut tok = doc_tokenizer("a\n * b");
        assert_eq!(tok.token(), "a");
        next_doc_token(&mut tok);
        assert_eq!(tok.token(), "b");
    }

    #[test]
    fn collect_text_joins_words() {
        let mut tok = doc_tokenizer("the x value */");
        assert_eq!(collect_text(&mut tok), "the x value");
        assert_eq!(tok.token(), "*/");
    }

    #[test]
    fn collect_text_stops_at_tag() {
        let mut tok = doc_tokenizer("intro text\n * @param x */");
        assert_eq!(collect_text(&mut tok), "intro text");
        assert_eq!(tok.token(), "@param");
    }

    #[test]
    fn collect_text_renders_list_items() {
        let mut tok = doc_tokenizer("options\n * - first\n * - second\n * @end */");
        assert_eq!(collect_text(&mut tok), "options\n\n- first\n- second");
    }

    #[test]
    fn verbatim_keeps_newlines_and_stops_at_tag() {
        let mut tok = doc_tokenizer("let x = 1\n * let y = 2\n * @returns {number} */");
        let text = collect_text_verbatim(&mut tok);
        assert_eq!(text, "let x = 1\nlet y = 2");
        assert_eq!(tok.token(), "@returns");
    }

    #[test]
    fn require_token_reports_when_missing() {
        let mut tok = doc_tokenizer("a");
        let mut sink = CollectSink::default();
        assert!(!require_token(&mut tok, &mut sink, "} expected", "}"));
        assert_eq!(sink.messages(), vec!["} expected"]);
    }

    #[test]
    fn require_token_advances_when_present() {
        let mut tok = doc_tokenizer("} rest");
        let mut sink = CollectSink::default();
        assert!(require_token(&mut tok, &mut sink, "} expected", "}"));
        assert_eq!(tok.token(), "rest");
        assert!(sink.reports.is_empty());
    }
}
