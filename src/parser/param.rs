//! Parameter lines and the related single-value tags.
//!
//! A `@param` line is: optional type block, optional `[` marking the
//! parameter optional, a dotted name path, an optional `=default` clause and
//! a trailing description. Dotted names build a nested tree; sibling nodes
//! are kept shape-uniform after every insertion.

use crate::diag::{warn, DiagnosticSink};
use crate::model::unify_string_fields;
use crate::parser::tags::{collect_text, is_doc_end, next_doc_token};
use crate::parser::typeexpr::parse_type;
use crate::tokenizer::Tokenizer;
use serde_json::{Map, Value};

/// Fields every parameter leaf exposes, empty when not supplied.
const CANONICAL_FIELDS: &[&str] = &["type", "attributes", "default", "description"];

fn find_param(name: &str, list: &mut [Value]) -> Option<usize> {
    list.iter()
        .position(|p| p.get("name").and_then(Value::as_str) == Some(name))
}

/// Copies all non-empty string and non-string fields from `source` onto
/// `target` without clobbering children already grown under it.
fn copy_non_empty(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        let empty = value.as_str() == Some("");
        if !empty {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Inserts a parameter along its dotted name path, creating missing
/// intermediate nodes. The leaf receives the parsed properties plus the
/// canonical empty fields; its sibling list is then shape-unified.
fn add_parameter(names: &[String], props: &Map<String, Value>, list: &mut Vec<Value>) {
    let Some((name, rest)) = names.split_first() else {
        return;
    };
    let index = match find_param(name, list) {
        Some(i) => i,
        None => {
            let mut node = Map::new();
            node.insert("name".into(), Value::String(name.clone()));
            list.push(Value::Object(node));
            list.len() - 1
        }
    };
    if !rest.is_empty() {
        if let Some(node) = list[index].as_object_mut() {
            let children = node
                .entry("param")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(children) = children {
                add_parameter(rest, props, children);
            }
        }
        return;
    }
    if let Some(leaf) = list[index].as_object_mut() {
        copy_non_empty(leaf, props);
        for field in CANONICAL_FIELDS {
            if !leaf.contains_key(*field) {
                leaf.insert((*field).into(), Value::String(String::new()));
            }
        }
    }
    unify_string_fields(list);
}

/// `=default` clause: raw tokens joined with spaces up to `]` or the tag
/// boundary.
fn parse_default(tok: &mut Tokenizer) -> String {
    let mut value = String::new();
    if tok.token() == "=" {
        next_doc_token(tok);
        while tok.token() != "]" && !is_doc_end(tok.token()) {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(tok.token());
            next_doc_token(tok);
        }
    }
    value
}

/// Leading `[` marks the parameter optional; the attribute is appended to
/// whatever the type prefix already produced.
fn parse_optional_bracket(tok: &mut Tokenizer, attributes: &mut String) {
    if tok.token() == "[" {
        if !attributes.is_empty() {
            attributes.push_str(", ");
        }
        attributes.push_str("optional");
        next_doc_token(tok);
    }
}

/// Dotted name path. A segment is followed by another only when a `.` comes
/// directly after it; anything else ends the path.
fn parse_name_path(tok: &mut Tokenizer) -> Vec<String> {
    let mut names = Vec::new();
    while !matches!(tok.token(), "=" | "]" | "") && !is_doc_end(tok.token()) {
        names.push(tok.token().to_string());
        next_doc_token(tok);
        if tok.token() != "." {
            break;
        }
        next_doc_token(tok);
    }
    names
}

/// Parses one `@param`/`@property` line into the parameter list.
pub fn parse_param_line(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink, list: &mut Vec<Value>) {
    let mut props = Map::new();
    parse_type(tok, sink, &mut props);
    let mut attributes = props
        .get("attributes")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    parse_optional_bracket(tok, &mut attributes);
    props.insert("attributes".into(), Value::String(attributes.clone()));
    let mut names = parse_name_path(tok);
    if names.is_empty() {
        names.push(String::new());
    }
    props.insert("default".into(), Value::String(parse_default(tok)));
    if tok.token() == "]" {
        next_doc_token(tok);
    } else if attributes == "optional" {
        warn(sink, tok, "] expected");
    }
    props.insert("description".into(), Value::String(collect_text(tok)));
    add_parameter(&names, &props, list);
}

/// `@returns`: type plus description.
pub fn parse_returns(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink) -> Value {
    let mut info = Map::new();
    parse_type(tok, sink, &mut info);
    info.insert("description".into(), Value::String(collect_text(tok)));
    Value::Object(info)
}

/// `@throws`: type plus description, one entry per occurrence.
pub fn parse_throws(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink) -> Value {
    parse_returns(tok, sink)
}

/// `@typedef`: type plus a single-segment name stored under `typedef`.
pub fn parse_typedef(tok: &mut Tokenizer, sink: &mut dyn DiagnosticSink) -> Map<String, Value> {
    let mut info = Map::new();
    parse_type(tok, sink, &mut info);
    let names = parse_name_path(tok);
    match names.first() {
        Some(name) => {
            info.insert("typedef".into(), Value::String(name.clone()));
        }
        None => warn(sink, tok, "typedef without name"),
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::CollectSink;
    use serde_json::json;

    fn parse_line(input: &str) -> (Vec<Value>, CollectSink) {
        let mut list = Vec::new();
        let mut sink = CollectSink::default();
        let mut tok = Tokenizer::new("test", input);
        tok.next_token();
        parse_param_line(&mut tok, &mut sink, &mut list);
        (list, sink)
    }

    #[test]
    fn full_parameter_line() {
        let (list, sink) = parse_line("{number} x the x value */");
        assert!(sink.reports.is_empty());
        assert_eq!(
            list,
            vec![json!({
                "name": "x",
                "type": "number",
                "attributes": "",
                "default": "",
                "description": "the x value"
            })]
        );
    }

    #[test]
    fn optional_with_default() {
        let (list, sink) = parse_line("{string} [mode=fast and loose] run mode */");
        assert!(sink.reports.is_empty());
        assert_eq!(list[0]["attributes"], "optional");
        assert_eq!(list[0]["default"], "fast and loose");
        assert_eq!(list[0]["description"], "run mode");
    }

    #[test]
    fn missing_bracket_close_is_diagnosed() {
        let (_, sink) = parse_line("{string} [mode run mode */");
        assert!(sink.messages().contains(&"] expected"));
    }

    #[test]
    fn dotted_name_builds_tree() {
        let mut list = Vec::new();
        let mut sink = CollectSink::default();
        for line in ["{Object} options the options */", "{boolean} options.flag a flag */"] {
            let mut tok = Tokenizer::new("test", line);
            tok.next_token();
            parse_param_line(&mut tok, &mut sink, &mut list);
        }
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["name"], "options");
        let children = list[0]["param"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["name"], "flag");
        assert_eq!(children[0]["type"], "boolean");
    }

    #[test]
    fn siblings_share_field_shape() {
        let mut list = Vec::new();
        let mut sink = CollectSink::default();
        for line in ["{number} x first */", "y second */"] {
            let mut tok = Tokenizer::new("test", line);
            tok.next_token();
            parse_param_line(&mut tok, &mut sink, &mut list);
        }
        let keys = |v: &Value| {
            let mut k: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
            k.sort();
            k
        };
        assert_eq!(keys(&list[0]), keys(&list[1]));
        assert_eq!(list[1]["type"], "");
    }

    #[test]
    fn typedef_without_name_is_diagnosed() {
        let mut tok = Tokenizer::new("test", "{Object} */");
        tok.next_token();
        let mut sink = CollectSink::default();
        let info = parse_typedef(&mut tok, &mut sink);
        assert!(info.get("typedef").is_none());
        assert_eq!(sink.messages(), vec!["typedef without name"]);
    }

    #[test]
    fn returns_carries_type_and_description() {
        let mut tok = Tokenizer::new("test", "{boolean} true on success */");
        tok.next_token();
        let mut sink = CollectSink::default();
        let value = parse_returns(&mut tok, &mut sink);
        assert_eq!(value["type"], "boolean");
        assert_eq!(value["description"], "true on success");
    }
}
