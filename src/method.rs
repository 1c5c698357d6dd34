//! Array stringification methods.
//!
//! An array field in a user schema names the function used to turn the
//! runtime array into text. Methods are shared handles: cloning one keeps
//! its identity, so a plan can be checked against the exact method the
//! schema author supplied.
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};
use serde_json::Value;

type StringifyFn = dyn Fn(&[Value]) -> String + Send + Sync;

#[derive(Clone)]
pub struct ArrayMethod {
    name: Arc<str>,
    func: Arc<StringifyFn>,
}

impl ArrayMethod {
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&[Value]) -> String + Send + Sync + 'static,
    {
        Self { name: name.into(), func: Arc::new(func) }
    }

    /// Look up one of the methods every schema may reference by name.
    pub fn builtin(name: &str) -> Option<Self> {
        BUILTINS.get(name).cloned()
    }

    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTINS.keys().copied()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, items: &[Value]) -> String {
        (self.func)(items)
    }
}

/// Identity, not behaviour: two methods are equal when they share the same
/// function handle.
impl PartialEq for ArrayMethod {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl Eq for ArrayMethod {}

impl fmt::Debug for ArrayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArrayMethod").field(&self.name).finish()
    }
}

impl Serialize for ArrayMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

// ------------------------------- Builtins -------------------------------- //

static BUILTINS: Lazy<IndexMap<&'static str, ArrayMethod>> = Lazy::new(|| {
    let mut out = IndexMap::new();
    out.insert("json", ArrayMethod::new("json", stringify_json));
    out.insert("join", ArrayMethod::new("join", stringify_join));
    out
});

fn stringify_json(items: &[Value]) -> String {
    Value::Array(items.to_vec()).to_string()
}

// strings unquoted, everything else in its JSON text form
fn stringify_join(items: &[Value]) -> String {
    items
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtins_keep_identity_across_lookups() {
        let a = ArrayMethod::builtin("json").unwrap();
        let b = ArrayMethod::builtin("json").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, ArrayMethod::builtin("join").unwrap());
    }

    #[test]
    fn equal_behaviour_is_not_equal_identity() {
        let a = ArrayMethod::new("len", |xs: &[Value]| xs.len().to_string());
        let b = ArrayMethod::new("len", |xs: &[Value]| xs.len().to_string());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn builtin_output() {
        let items = [json!("a"), json!(1), json!(true)];
        assert_eq!(ArrayMethod::builtin("json").unwrap().apply(&items), r#"["a",1,true]"#);
        assert_eq!(ArrayMethod::builtin("join").unwrap().apply(&items), "a,1,true");
        assert!(ArrayMethod::builtin("nope").is_none());
        assert_eq!(ArrayMethod::builtin_names().collect::<Vec<_>>(), ["json", "join"]);
    }
}
