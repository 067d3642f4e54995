//! Template interpreter.
//!
//! Walks the document tree under control of a [`Template`], concatenating
//! directive renderings. Private nodes render as nothing unless inclusion is
//! enabled, and that suppression is inherited by every nested directive.

use crate::render::{Directive, DirectiveGroup, Template};
use anyhow::{bail, Result};
use regex::{NoExpand, Regex};
use serde_json::Value;

/// `$def` references nested deeper than this fail instead of recursing
/// forever on a cyclic template.
const MAX_REF_DEPTH: usize = 32;

pub struct Generator<'a> {
    template: &'a Template,
    include_private: bool,
}

impl<'a> Generator<'a> {
    pub fn new(template: &'a Template, include_private: bool) -> Self {
        Generator {
            template,
            include_private,
        }
    }

    /// Renders the whole template list against the document root.
    pub fn generate(&self, data: &Value) -> Result<String> {
        let mut output = String::new();
        for group in &self.template.templates {
            output.push_str(&self.apply_group(data, group, true, 0)?);
        }
        Ok(output)
    }

    fn apply_group(
        &self,
        data: &Value,
        group: &DirectiveGroup,
        is_first: bool,
        depth: usize,
    ) -> Result<String> {
        if self.suppressed(data) {
            return Ok(String::new());
        }
        let mut output = String::new();
        for directive in group.directives() {
            if let Some(field) = &directive.if_exists {
                if !self.exists(data.get(field)) {
                    continue;
                }
            }
            if let Some(want_first) = directive.if_isfirst {
                if want_first != is_first {
                    continue;
                }
            }
            if !is_first {
                if let Some(separator) = &directive.separator {
                    output.push_str(separator);
                }
            }
            if let Some(text) = &directive.text {
                output.push_str(&self.substitute(text, data));
            }
            output.push_str(&self.apply_iteration(data, directive, depth)?);
            output.push_str(&self.apply_ref(data, directive, depth)?);
        }
        Ok(output)
    }

    /// `for each` + `iterate on`: one rendering per surviving list element.
    /// A non-list field is treated as a one-element list.
    fn apply_iteration(&self, data: &Value, directive: &Directive, depth: usize) -> Result<String> {
        let (Some(group), Some(field)) = (&directive.for_each, &directive.iterate_on) else {
            return Ok(String::new());
        };
        let elements = match data.get(field) {
            None => &[],
            Some(Value::Array(list)) => list.as_slice(),
            Some(single) => std::slice::from_ref(single),
        };
        let mut output = String::new();
        let mut is_first = true;
        for element in elements {
            if self.suppressed(element) {
                continue;
            }
            output.push_str(&self.apply_group(element, group, is_first, depth)?);
            is_first = false;
        }
        Ok(output)
    }

    /// `$ref`: an independent top-level pass over the same node. Unknown
    /// references render as nothing.
    fn apply_ref(&self, data: &Value, directive: &Directive, depth: usize) -> Result<String> {
        let Some(name) = &directive.reference else {
            return Ok(String::new());
        };
        if depth >= MAX_REF_DEPTH {
            bail!(
                "template $ref nesting exceeds {} levels (cyclic reference to {:?}?)",
                MAX_REF_DEPTH,
                name
            );
        }
        match self.template.defs.get(name) {
            Some(group) => self.apply_group(data, group, true, depth + 1),
            None => Ok(String::new()),
        }
    }

    /// A node with a `private` field renders as nothing unless inclusion is
    /// enabled.
    fn suppressed(&self, data: &Value) -> bool {
        !self.include_private
            && data
                .as_object()
                .is_some_and(|map| map.contains_key("private"))
    }

    /// Field-existence gate. Lists must keep at least one element after the
    /// private filter.
    fn exists(&self, value: Option<&Value>) -> bool {
        match value {
            None => false,
            Some(Value::Array(list)) => list.iter().any(|e| !self.suppressed(e)),
            Some(_) => true,
        }
    }

    /// Replaces whole-word `@field` placeholders with the string fields of
    /// the current node, escaping `*` for markdown. A longer field name
    /// never matches as a substring.
    fn substitute(&self, text: &str, data: &Value) -> String {
        let mut result = text.to_string();
        let Some(map) = data.as_object() else {
            return result;
        };
        for (key, value) in map {
            let Some(replacement) = value.as_str() else {
                continue;
            };
            let Ok(pattern) = Regex::new(&format!(r"@{}\b", regex::escape(key))) else {
                continue;
            };
            let escaped = replacement.replace('*', "\\*");
            result = pattern.replace_all(&result, NoExpand(&escaped)).into_owned();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn template(json: &str) -> Template {
        serde_json::from_str(json).unwrap()
    }

    fn render(template_json: &str, data: Value) -> String {
        let template = template(template_json);
        Generator::new(&template, false).generate(&data).unwrap()
    }

    #[test]
    fn placeholder_substitutes_name() {
        let out = render(r#"{"templates": [{"text": "@name"}]}"#, json!({"name": "foo"}));
        assert_eq!(out, "foo");
    }

    #[test]
    fn longer_field_never_matches_as_substring() {
        let out = render(
            r#"{"templates": [{"text": "@name and @namespace"}]}"#,
            json!({"name": "foo", "namespace": "bar"}),
        );
        assert_eq!(out, "foo and bar");
    }

    #[test]
    fn placeholder_escapes_markdown_emphasis() {
        let out = render(
            r#"{"templates": [{"text": "@description"}]}"#,
            json!({"description": "a * b"}),
        );
        assert_eq!(out, "a \\* b");
    }

    #[test]
    fn iteration_applies_per_element() {
        let out = render(
            r#"{"templates": [{"for each": {"text": "@name;"}, "iterate on": "param"}]}"#,
            json!({"param": [{"name": "a"}, {"name": "b"}]}),
        );
        assert_eq!(out, "a;b;");
    }

    #[test]
    fn separator_suppressed_for_first_element() {
        let out = render(
            r#"{"templates": [{"for each": {"separator": ", ", "text": "@name"}, "iterate on": "param"}]}"#,
            json!({"param": [{"name": "a"}, {"name": "b"}, {"name": "c"}]}),
        );
        assert_eq!(out, "a, b, c");
    }

    #[test]
    fn non_array_field_iterates_once() {
        let out = render(
            r#"{"templates": [{"for each": {"text": "@name"}, "iterate on": "entry"}]}"#,
            json!({"entry": {"name": "only"}}),
        );
        assert_eq!(out, "only");
    }

    #[test]
    fn private_elements_skipped_and_first_shifts() {
        let out = render(
            r#"{"templates": [{"for each": {"separator": ", ", "text": "@name"}, "iterate on": "param"}]}"#,
            json!({"param": [{"name": "a", "private": true}, {"name": "b"}, {"name": "c"}]}),
        );
        assert_eq!(out, "b, c");
    }

    #[test]
    fn private_inclusion_restores_elements() {
        let template = template(
            r#"{"templates": [{"for each": {"separator": ", ", "text": "@name"}, "iterate on": "param"}]}"#,
        );
        let data = json!({"param": [{"name": "a", "private": true}, {"name": "b"}]});
        let out = Generator::new(&template, true).generate(&data).unwrap();
        assert_eq!(out, "a, b");
    }

    #[test]
    fn private_root_renders_empty() {
        let out = render(
            r#"{"templates": [{"text": "@name"}]}"#,
            json!({"name": "secret", "private": true}),
        );
        assert_eq!(out, "");
    }

    #[test]
    fn if_exists_gates_on_empty_and_private_lists() {
        let template_json =
            r#"{"templates": [{"if exists": "param", "text": "has params"}]}"#;
        assert_eq!(render(template_json, json!({"param": []})), "");
        assert_eq!(
            render(template_json, json!({"param": [{"private": true}]})),
            ""
        );
        assert_eq!(
            render(template_json, json!({"param": [{"name": "a"}]})),
            "has params"
        );
    }

    #[test]
    fn if_isfirst_gates_iterations() {
        let out = render(
            r#"{"templates": [{"for each": [
                {"if isfirst": true, "text": "first:@name "},
                {"if isfirst": false, "text": "rest:@name "}
            ], "iterate on": "param"}]}"#,
            json!({"param": [{"name": "a"}, {"name": "b"}]}),
        );
        assert_eq!(out, "first:a rest:b ");
    }

    #[test]
    fn ref_resolves_as_independent_first_pass() {
        let out = render(
            r#"{
                "templates": [{"for each": {"$ref": "item"}, "iterate on": "param"}],
                "$def": {"item": [{"separator": "|", "text": "@name"}, {"if isfirst": true, "text": "!"}]}
            }"#,
            json!({"param": [{"name": "a"}, {"name": "b"}]}),
        );
        assert_eq!(out, "a!b!");
    }

    #[test]
    fn cyclic_ref_fails_with_depth_error() {
        let template = Template {
            templates: vec![DirectiveGroup::Single(Box::new(Directive {
                reference: Some("loop".into()),
                ..Directive::default()
            }))],
            defs: HashMap::from([(
                "loop".to_string(),
                DirectiveGroup::Single(Box::new(Directive {
                    reference: Some("loop".into()),
                    ..Directive::default()
                })),
            )]),
        };
        let err = Generator::new(&template, false)
            .generate(&json!({}))
            .unwrap_err();
        assert!(err.to_string().contains("nesting exceeds"));
    }

    #[test]
    fn unknown_ref_renders_nothing() {
        let out = render(
            r#"{"templates": [{"$ref": "missing"}]}"#,
            json!({"name": "x"}),
        );
        assert_eq!(out, "");
    }
}
