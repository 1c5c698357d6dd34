//! Reusable property-path accessors.
//!
//! A [`PathAccessor`] is compiled once from a sequence of property names and
//! then applied to any number of values shaped like the schema it came from:
//! JSON documents, or the schema trees themselves.
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{AccessError, display_path};
use crate::schema::{Node, OriginalNode};

/// Anything a property path can walk into.
pub trait PathTarget {
    fn child(&self, key: &str) -> Option<&Self>;
}

impl PathTarget for Value {
    fn child(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }
}

impl PathTarget for Node {
    fn child(&self, key: &str) -> Option<&Self> {
        match self {
            Node::Object(props) => props.get(key),
            _ => None,
        }
    }
}

impl PathTarget for OriginalNode {
    fn child(&self, key: &str) -> Option<&Self> {
        match self {
            OriginalNode::Object(props) => props.get(key),
            _ => None,
        }
    }
}

// ------------------------------ Accessor --------------------------------- //

/// Equality is by path: equal paths are functionally equivalent accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathAccessor {
    segments: Arc<[String]>,
}

impl PathAccessor {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { segments: segments.into_iter().map(Into::into).collect() }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last property on the path; `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// RFC 6901 JSON Pointer for this path; `""` for the root. Unlike a
    /// dotted join, distinct paths never share a pointer.
    pub fn pointer(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("/{}", s.replace('~', "~0").replace('/', "~1")))
            .collect()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn find<'a, T: PathTarget>(&self, root: &'a T) -> Option<&'a T> {
        self.segments.iter().try_fold(root, |cur, key| cur.child(key))
    }

    pub fn find_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        self.segments
            .iter()
            .try_fold(root, |cur, key| cur.as_object_mut()?.get_mut(key))
    }

    /// Write `value` at this path, creating missing (or null) intermediate
    /// objects along the way.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), AccessError> {
        let Some((last, parents)) = self.segments.split_last() else {
            *root = value;
            return Ok(());
        };
        let mut cur = root;
        for (depth, key) in parents.iter().enumerate() {
            cur = object_slot(cur, &self.segments[..depth])?
                .entry(key.clone())
                .or_insert(Value::Null);
        }
        object_slot(cur, parents)?.insert(last.clone(), value);
        Ok(())
    }
}

fn object_slot<'a>(
    value: &'a mut Value,
    path: &[String],
) -> Result<&'a mut Map<String, Value>, AccessError> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    value
        .as_object_mut()
        .ok_or_else(|| AccessError::NotAnObject { path: display_path(path) })
}

impl Serialize for PathAccessor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.segments.iter())
    }
}

// ------------------------------- Factory --------------------------------- //

/// Compiles a property path into an accessor. Must be a pure function of
/// the path.
pub trait AccessorFactory {
    fn build(&self, path: &[String]) -> PathAccessor;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAccessors;

impl AccessorFactory for DefaultAccessors {
    fn build(&self, path: &[String]) -> PathAccessor {
        PathAccessor::new(path.iter().cloned())
    }
}

impl<F> AccessorFactory for F
where
    F: Fn(&[String]) -> PathAccessor,
{
    fn build(&self, path: &[String]) -> PathAccessor {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TypeMarker;
    use serde_json::json;

    #[test]
    fn find_nested() {
        let find = PathAccessor::new(["a", "b"]);
        assert_eq!(find.find(&json!({"a": {"b": 5}})), Some(&json!(5)));
        assert_eq!(find.find(&json!({"a": 1})), None);
        assert_eq!(find.find(&json!({"a": {"c": 5}})), None);
        assert_eq!(find.name(), Some("b"));
    }

    #[test]
    fn pointer_escapes_and_matches_serde_json() {
        let dotted = PathAccessor::new(["a.b"]);
        let nested = PathAccessor::new(["a", "b"]);
        assert_eq!(dotted.pointer(), "/a.b");
        assert_eq!(nested.pointer(), "/a/b");

        let odd = PathAccessor::new(["x/y", "m~n"]);
        assert_eq!(odd.pointer(), "/x~1y/m~0n");
        let doc = json!({"x/y": {"m~n": 4}});
        assert_eq!(doc.pointer(&odd.pointer()), odd.find(&doc));
        assert_eq!(PathAccessor::new(Vec::<String>::new()).pointer(), "");
    }

    #[test]
    fn root_accessor() {
        let find = PathAccessor::new(Vec::<String>::new());
        let doc = json!([1, 2]);
        assert!(find.is_root());
        assert_eq!(find.name(), None);
        assert_eq!(find.find(&doc), Some(&doc));
    }

    #[test]
    fn set_creates_intermediates() {
        let find = PathAccessor::new(["a", "b", "c"]);
        let mut doc = json!({"a": null, "keep": 1});
        find.set(&mut doc, json!("x")).unwrap();
        assert_eq!(doc, json!({"a": {"b": {"c": "x"}}, "keep": 1}));

        *find.find_mut(&mut doc).unwrap() = json!("y");
        assert_eq!(find.find(&doc), Some(&json!("y")));
    }

    #[test]
    fn set_through_scalar_fails() {
        let find = PathAccessor::new(["a", "b"]);
        let mut doc = json!({"a": 3});
        assert_eq!(
            find.set(&mut doc, json!(1)),
            Err(AccessError::NotAnObject { path: "a".into() })
        );
        assert_eq!(doc, json!({"a": 3}));
    }

    #[test]
    fn walks_schema_trees() {
        let schema = Node::object([(
            "outer",
            Node::object([("inner", Node::Scalar(TypeMarker::Number))]),
        )]);
        let find = PathAccessor::new(["outer", "inner"]);
        assert_eq!(find.find(&schema), Some(&Node::Scalar(TypeMarker::Number)));
    }

    #[test]
    fn closures_are_factories() {
        let upper = |path: &[String]| PathAccessor::new(path.iter().map(|s| s.to_uppercase()));
        assert_eq!(upper.build(&["a".to_string()]).segments(), ["A"]);
        assert_eq!(DefaultAccessors.build(&["a".to_string()]), PathAccessor::new(["a"]));
    }
}
