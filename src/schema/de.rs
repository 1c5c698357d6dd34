// Deserialize impls for schema trees. Objects keep document key order.
use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use super::{ArrayNode, Node, OriginalNode, TypeMarker};
use crate::method::ArrayMethod;

// -------------------------------- Node ----------------------------------- //

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a type marker, an array, or an object of schema nodes")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Node, E> {
        TypeMarker::from_sentinel(s)
            .map(Node::Scalar)
            .ok_or_else(|| E::custom(format!("unknown type marker `{s}`")))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Array(ArrayNode { items, method: None }))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut props = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<String, Node>()? {
            props.insert(k, v);
        }
        Ok(Node::Object(props))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

// ---------------------------- OriginalNode ------------------------------- //

struct OriginalVisitor;

impl<'de> Visitor<'de> for OriginalVisitor {
    type Value = OriginalNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a type name, a [method, ...items] array, or an object of schema nodes")
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<OriginalNode, E> {
        TypeMarker::parse(s)
            .map(OriginalNode::Scalar)
            .ok_or_else(|| E::custom(format!("unknown type `{s}`")))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<OriginalNode, A::Error> {
        let name = seq
            .next_element::<String>()?
            .ok_or_else(|| {
                <A::Error as de::Error>::custom("array schema is missing its stringification method")
            })?;
        let method = ArrayMethod::builtin(&name).ok_or_else(|| {
            let known = ArrayMethod::builtin_names().collect::<Vec<_>>().join(", ");
            <A::Error as de::Error>::custom(format!(
                "unknown array method `{name}` (expected one of: {known})"
            ))
        })?;
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<OriginalNode>()? {
            items.push(item);
        }
        Ok(OriginalNode::Array { method, items })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<OriginalNode, A::Error> {
        let mut props = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<String, OriginalNode>()? {
            props.insert(k, v);
        }
        Ok(OriginalNode::Object(props))
    }
}

impl<'de> Deserialize<'de> for OriginalNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OriginalVisitor)
    }
}
