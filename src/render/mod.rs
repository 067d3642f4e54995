//! Template-driven rendering.
//!
//! A template is a JSON object: `templates` holds the ordered top-level
//! directive groups, `$def` a table of reusable groups resolved through
//! `$ref`. A group is a single directive or an array of directives.

pub mod engine;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Built-in markdown template, used when `--template` is not given.
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/markdown.json");

#[derive(Debug, Deserialize)]
pub struct Template {
    pub templates: Vec<DirectiveGroup>,
    #[serde(rename = "$def", default)]
    pub defs: HashMap<String, DirectiveGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DirectiveGroup {
    Single(Box<Directive>),
    List(Vec<Directive>),
}

impl DirectiveGroup {
    pub fn directives(&self) -> &[Directive] {
        match self {
            DirectiveGroup::Single(directive) => std::slice::from_ref(directive),
            DirectiveGroup::List(list) => list,
        }
    }
}

/// One rendering rule. All fields are optional; absent gates pass.
#[derive(Debug, Deserialize, Default)]
pub struct Directive {
    /// Literal text with whole-word `@field` placeholders.
    pub text: Option<String>,
    /// Emitted before every rendering except the first surviving one.
    pub separator: Option<String>,
    /// Sub-group applied per element of the `iterate on` list.
    #[serde(rename = "for each")]
    pub for_each: Option<DirectiveGroup>,
    /// Name of the list field iterated by `for each`.
    #[serde(rename = "iterate on")]
    pub iterate_on: Option<String>,
    /// Gate: the named field must be present (lists: non-empty after the
    /// private filter).
    #[serde(rename = "if exists")]
    pub if_exists: Option<String>,
    /// Gate on first-surviving-iteration status.
    #[serde(rename = "if isfirst")]
    pub if_isfirst: Option<bool>,
    /// Reference into the `$def` table.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
}

/// Loads the template from a file, or the built-in markdown template.
pub fn load(path: Option<&Path>) -> Result<Template> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read template: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("invalid template: {}", path.display()))
        }
        None => serde_json::from_str(DEFAULT_TEMPLATE).context("invalid built-in template"),
    }
}
