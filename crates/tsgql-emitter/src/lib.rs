//! GraphQL schema emission for tsgql.
//!
//! Takes the [`TypeGraph`] built by `tsgql-collector` and renders it as
//! GraphQL SDL text. Aliases that only rename a scalar or an enum are
//! elided first (see [`renames`]), then every remaining entry is emitted
//! in graph order.

pub mod emitter;
pub mod renames;

pub use emitter::{Emitter, sanitize};
pub use renames::Renames;

use anyhow::Result;
use tsgql_collector::TypeGraph;

/// Render a whole graph as one schema document.
#[tracing::instrument(level = "debug", skip_all, fields(types = graph.len()))]
pub fn emit(graph: &TypeGraph) -> Result<String> {
    Emitter::new(graph).emit_all()
}
