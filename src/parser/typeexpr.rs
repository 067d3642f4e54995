//! Type-expression parser for `{...}` annotations.
//!
//! The grammar is `{` [attribute-prefix] alternation `}`. Type text is
//! opaque: it is normalized, never validated. Parsing never fails; a
//! malformed expression yields a diagnostic and a best-effort `type` string.

use crate::diag::{warn, DiagnosticSink};
use crate::parser::tags::{next_doc_token, require_token};
use crate::tokenizer::Tokenizer;
use serde_json::{Map, Value};

fn is_terminator(token: &str) -> bool {
    matches!(token, "}" | "" | "*/")
}

/// Attribute prefix: `?` nullable, `!` non-null, `...` variadic. At most one
/// attribute is retained.
fn parse_attribute(tok: &mut Tokenizer, info: &mut Map<String, Value>) {
    while matches!(tok.token(), "?" | "!" | ".") {
        if tok.token() == "?" {
            info.insert("attributes".into(), Value::String("nullable".into()));
            next_doc_token(tok);
        } else if tok.token() == "!" {
            info.insert("attributes".into(), Value::String("non-null".into()));
            next_doc_token(tok);
        }
        let mut dots = 0;
        while tok.token() == "." {
            dots += 1;
            next_doc_token(tok);
        }
        if dots == 3 {
            info.insert("attributes".into(), Value::String("variadic".into()));
        }
    }
}

/// Identifier sequence up to a structural token. Commas get a trailing space.
fn parse_primitive(tok: &mut Tokenizer) -> String {
    let mut result = String::new();
    while !matches!(tok.token(), "|" | ")" | "}" | "[" | "]" | "" | "*/") {
        result.push_str(tok.token());
        if tok.token() == "," {
            result.push(' ');
        }
        next_doc_token(tok);
    }
    result
}

/// Object-map type `{inner}`, rendered `Object.<inner>`.
fn parse_object(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink) -> String {
    let mut inner = String::new();
    tok.next_token();
    while !is_terminator(tok.token()) {
        inner.push_str(tok.token());
        if tok.token() == "," {
            inner.push(' ');
        }
        next_doc_token(tok);
    }
    if require_token(tok, sink, "missing } in type object definition", "}") {
        format!("Object.<{}>", inner)
    } else {
        String::new()
    }
}

/// Array suffix `[]`, rendered `Array.<type>`.
fn parse_array(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, inner: &str) -> String {
    tok.next_token();
    if require_token(tok, sink, "missing ] in type array definition", "]") {
        format!("Array.<{}>", inner)
    } else {
        String::new()
    }
}

fn parse_single_type(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink) -> String {
    let mut result = if tok.token() == "{" {
        parse_object(tok, sink)
    } else {
        parse_primitive(tok)
    };
    if tok.token() == "[" {
        result = parse_array(tok, sink, &result);
    }
    result
}

/// Parses a `{...}` type annotation into `info`. Always sets `type` (empty
/// when no annotation is present); may set `attributes`. Alternation terms
/// are joined with `", "`; grouping parentheses are stripped.
pub fn parse_type(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, info: &mut Map<String, Value>) {
    let mut type_text = String::new();
    if tok.token() == "{" {
        next_doc_token(tok);
        parse_attribute(tok, info);
        while !is_terminator(tok.token()) {
            if tok.token() == "(" || tok.token() == ")" {
                next_doc_token(tok);
            } else if tok.token() == "|" {
                type_text.push_str(", ");
                next_doc_token(tok);
            } else {
                type_text.push_str(&parse_single_type(tok, sink));
            }
            if tok.token() == "]" {
                warn(sink, tok, "unexpected token ]");
                next_doc_token(tok);
            }
        }
        require_token(tok, sink, "missing } in type definition", "}");
    }
    info.insert("type".into(), Value::String(type_text));
}
