//! Declaration scanner.
//!
//! Classifies the code construct directly following a comment block by
//! consuming just enough raw tokens to infer its kind and name. This is not
//! a JavaScript parser: anything it cannot match yields a kind-less result.

use crate::model::DocEntry;
use crate::tokenizer::Tokenizer;

/// Reserved words, never taken as declaration names.
const RESERVED_WORDS: &[&str] = &[
    "abstract", "arguments", "await", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "debugger", "default", "delete", "do", "double", "else", "enum", "eval",
    "export", "extends", "false", "final", "finally", "float", "for", "function", "goto", "if",
    "implements", "import", "in", "instanceof", "int", "interface", "let", "long", "native", "new",
    "null", "package", "private", "protected", "public", "return", "short", "static", "super",
    "switch", "synchronized", "this", "throw", "throws", "transient", "true", "try", "typeof",
    "var", "void", "volatile", "while", "with", "yield",
];

/// Leading tokens consumed before the construct itself.
const PREFIX_TOKENS: &[&str] = &[
    "static", "async", "const", "var", "let", "=", "module", "exports", ".", "\n",
];

struct NamePath {
    name: String,
    member_of: Option<String>,
}

/// Consumes modifiers and assignment plumbing, recording attribute flags.
fn parse_prefixes(tok: &mut Tokenizer) -> DocEntry {
    let mut result = DocEntry::new();
    while PREFIX_TOKENS.contains(&tok.token()) {
        match tok.token() {
            "async" => result.set_flag("async"),
            "static" => result.set_flag("static"),
            "const" => result.set_flag("readonly"),
            _ => {}
        }
        tok.next_token();
    }
    result
}

fn parse_class(tok: &mut Tokenizer) -> DocEntry {
    let mut result = DocEntry::new();
    result.set_flag("class");
    let name = tok.next_token().to_string();
    result.set_text("name", &name);
    result
}

/// `get`/`set` accessor: the property name must be directly followed by `(`.
fn parse_accessor(tok: &mut Tokenizer) -> DocEntry {
    let mut result = DocEntry::new();
    while matches!(tok.token(), "get" | "set") {
        tok.next_token();
    }
    let name = tok.token().to_string();
    tok.next_token();
    if tok.token() == "(" && !name.is_empty() {
        result.set_flag("member");
        result.set_text("name", &name);
    }
    result
}

/// Bare identifier inside a class body, directly followed by `(`.
fn parse_method(tok: &mut Tokenizer) -> DocEntry {
    let mut result = DocEntry::new();
    let name = tok.token().to_string();
    tok.next_token();
    if tok.token() == "(" && !name.is_empty() {
        result.set_flag("method");
        result.set_text("name", &name);
        tok.next_token();
    }
    result
}

/// Dotted name path like `Class.prototype.method`. `prototype` segments are
/// dropped; the first remaining prefix becomes `memberOf`, the last segment
/// the name.
fn parse_dotted_name(tok: &mut Tokenizer) -> Option<NamePath> {
    if RESERVED_WORDS.contains(&tok.token()) || tok.token().is_empty() {
        return None;
    }
    let mut path = NamePath {
        name: tok.token().to_string(),
        member_of: None,
    };
    tok.next_token();
    while tok.token() == "." {
        tok.next_token();
        if tok.token() != "prototype" {
            if path.member_of.is_none() {
                path.member_of = Some(path.name.clone());
            }
            path.name = tok.token().to_string();
        }
        tok.next_token();
    }
    Some(path)
}

/// Function declaration or function-valued assignment. A name path with a
/// `memberOf` prefix classifies as a method, a plain one as a function.
fn parse_function(tok: &mut Tokenizer) -> DocEntry {
    let mut result = DocEntry::new();
    let mut path = parse_dotted_name(tok);
    while matches!(tok.token(), "=" | ":") {
        tok.next_token();
    }
    if tok.token() == "function" {
        tok.next_token();
    }
    if path.is_none() {
        path = parse_dotted_name(tok);
    }
    if tok.token() == "(" {
        if let Some(path) = path {
            result.set_text("name", &path.name);
            match path.member_of {
                Some(class_name) => {
                    result.set_text("memberOf", &class_name);
                    result.set_flag("method");
                }
                None => result.set_flag("function"),
            }
        }
    }
    result
}

/// Scans the declaration following a comment block. `in_class` is true while
/// a class body is open, letting bare identifiers classify as methods.
pub fn scan_declaration(tok: &mut Tokenizer, in_class: bool) -> DocEntry {
    let mut result = parse_prefixes(tok);
    let construct = match tok.token() {
        "class" => parse_class(tok),
        "function" => parse_function(tok),
        "get" | "set" => parse_accessor(tok),
        "/**" => DocEntry::new(),
        _ if in_class => parse_method(tok),
        _ => parse_function(tok),
    };
    for (key, value) in construct.fields() {
        result.insert(key, value.clone());
    }
    result
}
