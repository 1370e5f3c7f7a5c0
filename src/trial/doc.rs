//! Absent-tolerant accessor over untrusted registry JSON.
//!
//! Registry documents may be missing any key at any depth, or carry an
//! unexpected type where an object or string was expected. `Node` wraps
//! `Option<&Value>` so navigation reads linearly and absence propagates
//! instead of scattering defensive checks through the normalizer.

use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(Option<&'a Value>);

impl<'a> Node<'a> {
    pub fn root(value: &'a Value) -> Self {
        Node(Some(value))
    }

    /// Child by key; absent unless `self` is an object containing `key`.
    pub fn get(self, key: &str) -> Node<'a> {
        Node(self.0.and_then(|v| v.get(key)))
    }

    pub fn is_object(self) -> bool {
        self.0.is_some_and(Value::is_object)
    }

    pub fn str(self) -> Option<&'a str> {
        self.0.and_then(Value::as_str)
    }

    pub fn string_or(self, fallback: &str) -> String {
        match self.str() {
            Some(s) => s.to_string(),
            None => fallback.to_string(),
        }
    }

    /// String elements of an array value; non-string elements and
    /// non-array values yield nothing.
    pub fn string_list(self) -> Vec<String> {
        match self.0.and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Object elements of an array value, each wrapped for further
    /// navigation; anything else is skipped.
    pub fn objects(self) -> Vec<Node<'a>> {
        match self.0.and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter(|v| v.is_object())
                .map(|v| Node(Some(v)))
                .collect(),
            None => Vec::new(),
        }
    }
}
