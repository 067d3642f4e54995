//! Data model for one documented element.
//!
//! The tag vocabulary is open: any `@tag` becomes a field. A [`DocEntry`] is
//! therefore a JSON object with typed accessors layered over the well-known
//! fields.

use serde_json::{Map, Value};

/// Element kinds in classification priority order. The first field of this
/// list present on an entry decides where the entry is placed in the tree.
pub const KIND_PRIORITY: &[&str] = &["class", "function", "typedef", "callback", "method", "member"];

/// One documented element: free-form tag fields plus code-derived fields.
#[derive(Debug, Clone, Default)]
pub struct DocEntry {
    fields: Map<String, Value>,
}

impl DocEntry {
    pub fn new() -> Self {
        DocEntry::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// True when the field is present as boolean `true` (a bare flag tag).
    pub fn is_flag(&self, key: &str) -> bool {
        self.fields.get(key) == Some(&Value::Bool(true))
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn set_text(&mut self, key: &str, text: &str) {
        self.insert(key, Value::String(text.to_string()));
    }

    pub fn set_flag(&mut self, key: &str) {
        self.insert(key, Value::Bool(true));
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn member_of(&self) -> Option<&str> {
        self.get_str("memberOf")
    }

    /// Element kind: the first [`KIND_PRIORITY`] field present on the entry.
    pub fn kind(&self) -> Option<&'static str> {
        KIND_PRIORITY.iter().copied().find(|k| self.contains(k))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Appends a word to a space-separated word list, skipping words already
/// contained. Used to fold modifier flags into the `attributes` field.
pub fn add_word(current: Option<&str>, word: &str) -> String {
    match current {
        None => word.to_string(),
        Some(cur) if cur.contains(word) => cur.to_string(),
        Some(cur) => format!("{} {}", cur, word),
    }
}

/// Normalizes the shape of sibling objects: every string-valued field present
/// on any sibling is added as an empty string to the siblings missing it.
/// The renderer relies on this to iterate without per-node checks.
pub fn unify_string_fields(list: &mut [Value]) {
    let mut keys: Vec<String> = Vec::new();
    for item in list.iter() {
        if let Some(map) = item.as_object() {
            for (key, value) in map {
                if value.is_string() && !keys.iter().any(|k| k == key) {
                    keys.push(key.clone());
                }
            }
        }
    }
    for item in list.iter_mut() {
        if let Some(map) = item.as_object_mut() {
            for key in &keys {
                if !map.contains_key(key) {
                    map.insert(key.clone(), Value::String(String::new()));
                }
            }
        }
    }
}
