//! Aggregated document tree.
//!
//! Entries from all files accumulate into one root: kind-keyed lists at the
//! top level, member/method/function sub-lists per class, and a `file` list
//! for whole-file comments with no structural kind. Every list stays sorted
//! ascending by name; ties keep insertion order.

use crate::model::{unify_string_fields, DocEntry};
use serde_json::{Map, Value};

#[derive(Debug)]
pub struct DocTree {
    root: Map<String, Value>,
}

impl Default for DocTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocTree {
    pub fn new() -> Self {
        let mut root = Map::new();
        root.insert("file".into(), Value::Array(Vec::new()));
        DocTree { root }
    }

    /// Adds one merged entry. Entries with a `memberOf` attach under the
    /// matching class; a member whose class has not been aggregated yet is
    /// dropped without a diagnostic (documented limitation). Entries with a
    /// kind but no `memberOf` attach at the root; kind-less entries land in
    /// the `file` list tagged with the originating filename.
    pub fn add(&mut self, entry: DocEntry, filename: &str) {
        if entry.member_of().is_some() {
            self.add_to_class(entry);
        } else if let Some(kind) = entry.kind() {
            Self::push_sorted(&mut self.root, kind, entry.into_value());
        } else {
            let mut entry = entry;
            entry.set_text("filename", filename);
            Self::push_sorted(&mut self.root, "file", entry.into_value());
        }
    }

    fn add_to_class(&mut self, entry: DocEntry) {
        let Some(kind) = entry.kind() else {
            return;
        };
        let member_of = entry.member_of().unwrap_or_default().to_string();
        let Some(Value::Array(classes)) = self.root.get_mut("class") else {
            return;
        };
        let Some(class_node) = classes
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|c| c.get("name").and_then(Value::as_str) == Some(member_of.as_str()))
        else {
            return;
        };
        Self::push_sorted(class_node, kind, entry.into_value());
    }

    fn push_sorted(parent: &mut Map<String, Value>, key: &str, element: Value) {
        let list = parent
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = list {
            list.push(element);
            list.sort_by(|a, b| Self::name_of(a).cmp(Self::name_of(b)));
        }
    }

    fn name_of(element: &Value) -> &str {
        element.get("name").and_then(Value::as_str).unwrap_or("")
    }

    /// Final pass once all files are aggregated: unify the member-list
    /// sibling shapes of every class so the renderer can iterate uniformly.
    pub fn finalize(&mut self) {
        if let Some(Value::Array(classes)) = self.root.get_mut("class") {
            for class in classes {
                if let Some(Value::Array(members)) =
                    class.as_object_mut().and_then(|c| c.get_mut("member"))
                {
                    unify_string_fields(members);
                }
            }
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}
