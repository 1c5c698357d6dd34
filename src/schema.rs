//! Prepared (normalized) schema tree.
//!
//! A node is a scalar type marker, an array leaf, or an object whose
//! properties keep their declaration order. Arrays are leaves no matter what
//! they contain.
pub mod original;
mod de;

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::method::ArrayMethod;

pub use original::OriginalNode;

// ------------------------------ Markers ---------------------------------- //

/// Closed set of scalar leaf types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeMarker {
    Number,
    String,
    Boolean,
}

impl TypeMarker {
    pub const ALL: [TypeMarker; 3] = [TypeMarker::Number, TypeMarker::String, TypeMarker::Boolean];

    /// The sentinel a prepared schema uses in place of the user's type name.
    pub fn sentinel(self) -> &'static str {
        match self {
            TypeMarker::Number => "number__sjs",
            TypeMarker::String => "string__sjs",
            TypeMarker::Boolean => "boolean__sjs",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeMarker::Number => "number",
            TypeMarker::String => "string",
            TypeMarker::Boolean => "boolean",
        }
    }

    pub fn from_sentinel(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.sentinel() == s)
    }

    /// Accepts either the sentinel or the plain type name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.sentinel() == s || m.name() == s)
    }
}

impl fmt::Display for TypeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ------------------------------- Nodes ----------------------------------- //

/// `Drop`, `Clone`, `PartialEq` and [`OriginalNode::normalize`] recurse
/// per level, so trees thousands of levels deep can exhaust the stack
/// outside the plan builder, which walks iteratively. Loaded schemas stop at
/// [`crate::path_de::MAX_LOADABLE_DEPTH`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(TypeMarker),
    Array(ArrayNode),
    Object(IndexMap<String, Node>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayNode {
    /// Element schemas, as declared. Not walked by the plan builder.
    pub items: Vec<Node>,
    /// Stringification method carried through preparation, when the
    /// preparer kept it. Otherwise the plan builder recovers it from the
    /// original schema.
    pub method: Option<ArrayMethod>,
}

impl Node {
    pub fn empty_object() -> Self {
        Node::Object(IndexMap::new())
    }

    pub fn object<K, I>(props: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Object(props.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array(items: Vec<Node>) -> Self {
        Node::Array(ArrayNode { items, method: None })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Scalar(_) | Node::Array(_))
    }

    pub fn marker(&self) -> Option<TypeMarker> {
        match self {
            Node::Scalar(m) => Some(*m),
            _ => None,
        }
    }
}

impl From<TypeMarker> for Node {
    fn from(m: TypeMarker) -> Self {
        Node::Scalar(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_lookup() {
        for m in TypeMarker::ALL {
            assert_eq!(TypeMarker::from_sentinel(m.sentinel()), Some(m));
            assert_eq!(TypeMarker::parse(m.name()), Some(m));
            assert_eq!(TypeMarker::parse(m.sentinel()), Some(m));
        }
        // plain names are not sentinels
        assert_eq!(TypeMarker::from_sentinel("number"), None);
        assert_eq!(TypeMarker::parse("integer"), None);
    }

    #[test]
    fn leaves() {
        assert!(Node::Scalar(TypeMarker::Boolean).is_leaf());
        assert!(Node::array(vec![]).is_leaf());
        assert!(!Node::empty_object().is_leaf());
        assert_eq!(Node::array(vec![TypeMarker::Number.into()]).marker(), None);
    }
}
