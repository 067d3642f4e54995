//! Per-comment tag parser.
//!
//! Consumes one comment block from the shared cursor, dispatching
//! tag-specific sub-parsers. The tag vocabulary is open: unrecognized tags
//! become string fields on the entry (or boolean `true` when bare).

use crate::diag::{warn, DiagnosticSink};
use crate::model::DocEntry;
use crate::parser::param::{parse_param_line, parse_returns, parse_throws, parse_typedef};
use crate::parser::tags::{
    collect_text, collect_text_verbatim, is_doc_end, is_doc_tag, is_text_end, next_doc_token,
};
use crate::parser::typeexpr::parse_type;
use crate::tokenizer::Tokenizer;
use serde_json::Value;

/// Tags that carry no value; supplied text is diagnosed and discarded.
const NO_VALUE_TAGS: &[&str] = &["private", "readonly", "static", "async"];

/// Alternate spellings mapped onto one canonical tag name.
fn map_alias(tag: &str) -> &str {
    match tag {
        "fileoverview" | "file" => "overview",
        "return" => "returns",
        "exception" => "throws",
        "arg" | "argument" => "param",
        other => other,
    }
}

/// Free-text description. A repeated description tag is diagnosed; the new
/// value still overwrites the old one.
fn parse_description(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, entry: &mut DocEntry) {
    if entry.contains("description") {
        warn(sink, tok, "duplicate description entry");
    }
    let description = collect_text(tok);
    entry.set_text("description", &description);
}

/// Any tag without a dedicated sub-parser: its text verbatim, or `true`
/// when bare. The no-value flags always come out as `true`.
fn parse_simple_tag(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, tag: &str) -> Value {
    let mut text = collect_text(tok);
    if !text.is_empty() && NO_VALUE_TAGS.contains(&tag) {
        warn(
            sink,
            tok,
            &format!("the @{} tag does not permit a value; the value will be ignored", tag),
        );
        text.clear();
    }
    if text.is_empty() {
        Value::Bool(true)
    } else {
        Value::String(text)
    }
}

fn parse_param_tag(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, entry: &mut DocEntry, key: &str) {
    let mut list = match entry.remove(key) {
        Some(Value::Array(list)) => list,
        _ => Vec::new(),
    };
    parse_param_line(tok, sink, &mut list);
    entry.insert(key, Value::Array(list));
}

fn parse_throws_tag(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, entry: &mut DocEntry) {
    let mut list = match entry.remove("throws") {
        Some(Value::Array(list)) => list,
        _ => Vec::new(),
    };
    list.push(parse_throws(tok, sink));
    entry.insert("throws", Value::Array(list));
}

/// `@type`: merges type fields into the entry itself. Neither `@type` nor
/// `@typedef` permits a trailing description.
fn parse_type_tag(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, entry: &mut DocEntry) {
    parse_type(tok, sink, entry.fields_mut());
    if !is_text_end(tok.token()) {
        warn(
            sink,
            tok,
            "the @type tag does not permit a description; the description will be ignored",
        );
    }
}

fn parse_typedef_tag(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, entry: &mut DocEntry) {
    let typedef = parse_typedef(tok, sink);
    for (key, value) in typedef {
        entry.insert(&key, value);
    }
    if !is_text_end(tok.token()) {
        warn(
            sink,
            tok,
            "the @typedef tag does not permit a description; the description will be ignored",
        );
    }
}

/// Parses one comment block. The cursor stands on the first token after
/// `/**`; on return it stands on the first token after `*/`.
pub fn parse_comment(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink) -> DocEntry {
    let mut entry = DocEntry::new();
    let description = collect_text(tok);
    if !description.is_empty() {
        entry.set_text("description", &description);
    }
    while !is_doc_end(tok.token()) {
        let token = tok.token().to_string();
        if is_doc_tag(&token) {
            next_doc_token(tok);
            let tag = map_alias(&token[1..]).to_string();
            match tag.as_str() {
                "param" | "property" => parse_param_tag(tok, sink, &mut entry, &tag),
                "returns" => {
                    let value = parse_returns(tok, sink);
                    entry.insert("returns", Value::Array(vec![value]));
                }
                "throws" => parse_throws_tag(tok, sink, &mut entry),
                "description" | "descripton" => parse_description(tok, sink, &mut entry),
                "type" => parse_type_tag(tok, sink, &mut entry),
                "typedef" => parse_typedef_tag(tok, sink, &mut entry),
                "example" => {
                    let example = collect_text_verbatim(tok);
                    entry.set_text("example", &example);
                }
                _ => {
                    let value = parse_simple_tag(tok, sink, &tag);
                    entry.insert(&tag, value);
                }
            }
        } else {
            next_doc_token(tok);
        }
    }
    next_doc_token(tok);
    entry
}
