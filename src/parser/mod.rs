//! Source-file parser: comment blocks and the declarations that follow them.
//!
//! The comment parser and the declaration scanner run in lockstep over one
//! shared token cursor. Their halves of each entry are merged here, then
//! handed to the document tree.

pub mod comment;
pub mod decl;
pub mod param;
pub mod tags;
pub mod typeexpr;

use crate::diag::DiagnosticSink;
use crate::model::{add_word, DocEntry};
use crate::tokenizer::Tokenizer;
use crate::tree::DocTree;
use serde_json::Value;

/// Kind fields the declaration scanner can produce. When the comment itself
/// declares a kind, all code-derived kind fields are suppressed.
const CODE_KIND_FIELDS: &[&str] = &["function", "class", "member", "method"];

/// Modifier flags folded into the space-separated `attributes` field.
const ATTRIBUTE_FLAGS: &[&str] = &["static", "readonly", "async"];

/// Folds boolean modifier flags into `attributes`, skipping words already
/// present.
fn fold_attributes(entry: &mut DocEntry) {
    for flag in ATTRIBUTE_FLAGS {
        if entry.is_flag(flag) {
            let attributes = add_word(entry.get_str("attributes"), flag);
            entry.set_text("attributes", &attributes);
        }
    }
}

/// Merges the code-derived half into the comment-derived half. Comment
/// fields win; an explicit kind tag in the comment overrides any kind the
/// scanner inferred.
fn merge_entry(mut entry: DocEntry, code: DocEntry) -> DocEntry {
    let has_kind_tag = CODE_KIND_FIELDS.iter().any(|k| entry.contains(k));
    for (key, value) in code.fields() {
        if has_kind_tag && CODE_KIND_FIELDS.contains(&key.as_str()) {
            continue;
        }
        if !entry.contains(key) {
            entry.insert(key, value.clone());
        }
    }
    fold_attributes(&mut entry);
    entry
}

/// Parses one file's content into the shared document tree.
///
/// Entries following a class declaration inherit that class as `memberOf`
/// unless the comment names one itself.
pub fn parse_file(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, tree: &mut DocTree) {
    let mut open_class: Option<String> = None;
    tok.next_token();
    while !tok.token().is_empty() {
        if tags::is_doc_begin(tok.token()) {
            tags::next_doc_token(tok);
            let comment = comment::parse_comment(tok, sink);
            let code = decl::scan_declaration(tok, open_class.is_some());
            let code_is_class = code.contains("class");
            let mut entry = merge_entry(comment, code);
            if code_is_class {
                open_class = entry.name().map(String::from);
            } else if let Some(class_name) = &open_class {
                if !entry.contains("memberOf") {
                    entry.insert("memberOf", Value::String(class_name.clone()));
                }
            }
            tree.add(entry, tok.filename());
        } else {
            tags::next_doc_token(tok);
        }
    }
}
