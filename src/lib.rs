//! Compile a serializer schema into a flat traversal plan.
//!
//! A prepared schema is walked once, depth-first in property declaration
//! order, producing one [`PathDescriptor`] per scalar or array leaf. Encoders
//! and decoders then iterate the plan to reach every value of a matching
//! document without touching the schema again.
pub mod accessor;
pub mod error;
pub mod jq_exec;
pub mod method;
pub mod path_de;
pub mod plan;
pub mod schema;

pub use accessor::{AccessorFactory, DefaultAccessors, PathAccessor, PathTarget};
pub use error::{AccessError, LoadError, PlanError};
pub use method::ArrayMethod;
pub use plan::{DEFAULT_MAX_DEPTH, PathDescriptor, Plan, PlanBuilder, compile_plan};
pub use schema::{ArrayNode, Node, OriginalNode, TypeMarker};
