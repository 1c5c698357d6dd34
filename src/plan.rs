//! Schema → traversal plan.
//!
//! Walks a prepared schema depth-first in property declaration order and
//! emits one [`PathDescriptor`] per leaf (scalar marker or array). Encoders
//! and decoders iterate the same plan in the same order, so the order is
//! part of the contract.
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::accessor::{AccessorFactory, DefaultAccessors, PathAccessor};
use crate::error::{AccessError, PlanError, display_path};
use crate::method::ArrayMethod;
use crate::schema::{Node, OriginalNode, TypeMarker};

/// Kept under [`crate::path_de::MAX_LOADABLE_DEPTH`] so a schema loaded from
/// JSON reaches this bound before the parser's own nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 64;

// ------------------------------- Output ---------------------------------- //

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDescriptor {
    name: Option<String>,
    #[serde(rename = "path")]
    find: PathAccessor,
    is_array: bool,
    method: Option<ArrayMethod>,
    marker: Option<TypeMarker>,
}

impl PathDescriptor {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    /// Set exactly when [`Self::is_array`] is.
    pub fn method(&self) -> Option<&ArrayMethod> {
        self.method.as_ref()
    }

    pub fn find(&self) -> &PathAccessor {
        &self.find
    }

    /// Scalar type of the leaf; `None` for arrays.
    pub fn marker(&self) -> Option<TypeMarker> {
        self.marker
    }

    /// The leaf's value in `doc`, with arrays passed through their method.
    pub fn render(&self, doc: &Value) -> Option<Value> {
        let value = self.find.find(doc)?;
        match (&self.method, value) {
            (Some(method), Value::Array(items)) => Some(Value::String(method.apply(items))),
            _ => Some(value.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Plan {
    descriptors: Vec<PathDescriptor>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn descriptors(&self) -> &[PathDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathDescriptor> {
        self.descriptors.iter()
    }

    /// [`PathDescriptor::render`] for every descriptor, in plan order.
    pub fn render(&self, doc: &Value) -> Vec<Option<Value>> {
        self.iter().map(|d| d.render(doc)).collect()
    }

    /// One slot per descriptor, in plan order.
    pub fn read<'v>(&self, doc: &'v Value) -> Vec<Option<&'v Value>> {
        self.iter().map(|d| d.find.find(doc)).collect()
    }

    /// Write `values` back in plan order; the decode side of [`Self::read`].
    pub fn write<I>(&self, target: &mut Value, values: I) -> Result<(), AccessError>
    where
        I: IntoIterator<Item = Value>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        if values.len() != self.len() {
            return Err(AccessError::ArityMismatch { expected: self.len(), actual: values.len() });
        }
        for (d, value) in self.iter().zip(values) {
            d.find.set(target, value)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a PathDescriptor;
    type IntoIter = std::slice::Iter<'a, PathDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

// ------------------------------- Builder --------------------------------- //

#[derive(Debug, Clone)]
pub struct PlanBuilder<F = DefaultAccessors> {
    accessors: F,
    max_depth: usize,
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self { accessors: DefaultAccessors, max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl<F: AccessorFactory> PlanBuilder<F> {
    pub fn with_accessors<G: AccessorFactory>(self, accessors: G) -> PlanBuilder<G> {
        PlanBuilder { accessors, max_depth: self.max_depth }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Compile `prepared` into a plan. Array methods come from the prepared
    /// node when it carries one, else from index 0 of the array at the same
    /// path in `original`.
    pub fn compile(
        &self,
        prepared: &Node,
        original: Option<&OriginalNode>,
    ) -> Result<Plan, PlanError> {
        let mut descriptors = Vec::new();
        // explicit worklist; children pushed in reverse so the first key pops first
        let mut stack: Vec<(&Node, Vec<String>)> = vec![(prepared, Vec::new())];

        while let Some((node, path)) = stack.pop() {
            if path.len() > self.max_depth {
                return Err(PlanError::DepthExceeded {
                    path: display_path(&path),
                    limit: self.max_depth,
                });
            }
            match node {
                Node::Object(props) => {
                    trace!(path = %display_path(&path), props = props.len(), "descend");
                    for (key, child) in props.iter().rev() {
                        let mut child_path = Vec::with_capacity(path.len() + 1);
                        child_path.extend(path.iter().cloned());
                        child_path.push(key.clone());
                        stack.push((child, child_path));
                    }
                }
                Node::Scalar(marker) => {
                    let find = self.accessors.build(&path);
                    descriptors.push(self.finish(find, &path, false, None, Some(*marker)));
                }
                Node::Array(arr) => {
                    let find = self.accessors.build(&path);
                    let method = match &arr.method {
                        Some(method) => method.clone(),
                        None => original
                            .and_then(|root| find.find(root))
                            .and_then(OriginalNode::array_method)
                            .cloned()
                            .ok_or_else(|| PlanError::MissingArrayMethod {
                                path: display_path(&path),
                            })?,
                    };
                    descriptors.push(self.finish(find, &path, true, Some(method), None));
                }
            }
        }

        debug!(leaves = descriptors.len(), "compiled plan");
        Ok(Plan { descriptors })
    }

    fn finish(
        &self,
        find: PathAccessor,
        path: &[String],
        is_array: bool,
        method: Option<ArrayMethod>,
        marker: Option<TypeMarker>,
    ) -> PathDescriptor {
        let name = path.last().cloned();
        debug!(
            path = %display_path(path),
            is_array,
            method = method.as_ref().map(ArrayMethod::name),
            "leaf"
        );
        PathDescriptor { name, find, is_array, method, marker }
    }
}

/// Compile with the default accessors and depth bound.
pub fn compile_plan(prepared: &Node, original: &OriginalNode) -> Result<Plan, PlanError> {
    PlanBuilder::new().compile(prepared, Some(original))
}
