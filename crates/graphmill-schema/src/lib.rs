//! Common record types for Graphmill knowledge graphs.
//!
//! Every ingestion stage emits these records and the filter stage consumes,
//! rewrites, and re-emits them:
//!
//! - [`record`]: the node/edge/graph wire types. Fields a stage does not
//!   model explicitly ride along in a flattened extras map; a stage must
//!   never destroy fields it does not understand.
//! - [`ident`]: structured edge identifiers ([`EdgeId`], `---`-delimited at
//!   the storage boundary) and structured dedup keys ([`EdgeKey`], never
//!   serialized).
//! - [`vocab`]: CURIE helpers and the shared vocabulary constants.

pub mod ident;
pub mod record;
pub mod vocab;

pub use ident::{make_edge_id, EdgeId, EdgeIdError, EdgeKey};
pub use record::{BuildInfo, Edge, Graph, Node};
pub use vocab::{
    curie_prefix, is_biolink_curie, snake_to_camel, BIOLINK_CURIE_PREFIX, SOURCE_NODE_CATEGORY,
};
