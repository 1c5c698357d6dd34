//! User-authored schema tree.
//!
//! Same shape as the prepared tree, except that every array keeps the
//! stringification method the author gave it in front of its item schemas.
use indexmap::IndexMap;

use super::{ArrayNode, Node, TypeMarker};
use crate::method::ArrayMethod;

#[derive(Debug, Clone, PartialEq)]
pub enum OriginalNode {
    Scalar(TypeMarker),
    Array {
        method: ArrayMethod,
        items: Vec<OriginalNode>,
    },
    Object(IndexMap<String, OriginalNode>),
}

impl OriginalNode {
    pub fn object<K, I>(props: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, OriginalNode)>,
    {
        OriginalNode::Object(props.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array(method: ArrayMethod, items: Vec<OriginalNode>) -> Self {
        OriginalNode::Array { method, items }
    }

    /// Element at index 0 of an array schema: its stringification method.
    pub fn array_method(&self) -> Option<&ArrayMethod> {
        match self {
            OriginalNode::Array { method, .. } => Some(method),
            _ => None,
        }
    }

    /// Minimal preparation: the same tree with markers in place and each
    /// array's method moved onto its [`ArrayNode`]. Property names are kept
    /// as written.
    pub fn normalize(&self) -> Node {
        match self {
            OriginalNode::Scalar(m) => Node::Scalar(*m),
            OriginalNode::Array { method, items } => Node::Array(ArrayNode {
                items: items.iter().map(OriginalNode::normalize).collect(),
                method: Some(method.clone()),
            }),
            OriginalNode::Object(props) => Node::Object(
                props.iter().map(|(k, v)| (k.clone(), v.normalize())).collect(),
            ),
        }
    }
}

impl From<TypeMarker> for OriginalNode {
    fn from(m: TypeMarker) -> Self {
        OriginalNode::Scalar(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_carries_methods_and_order() {
        let json = ArrayMethod::builtin("json").unwrap();
        let original = OriginalNode::object([
            ("z", TypeMarker::String.into()),
            ("tags", OriginalNode::array(json.clone(), vec![TypeMarker::String.into()])),
            ("a", OriginalNode::object([("b", OriginalNode::from(TypeMarker::Boolean))])),
        ]);

        let Node::Object(props) = original.normalize() else {
            panic!("expected object");
        };
        assert_eq!(props.keys().collect::<Vec<_>>(), ["z", "tags", "a"]);
        match &props["tags"] {
            Node::Array(arr) => {
                assert_eq!(arr.method.as_ref(), Some(&json));
                assert_eq!(arr.items, vec![Node::Scalar(TypeMarker::String)]);
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn array_method_only_on_arrays() {
        assert!(OriginalNode::Scalar(TypeMarker::Number).array_method().is_none());
        let join = ArrayMethod::builtin("join").unwrap();
        assert_eq!(OriginalNode::array(join.clone(), vec![]).array_method(), Some(&join));
    }
}
