//! Streaming readers and writers for Graphmill graph documents.
//!
//! Graph documents routinely run to tens of gigabytes, so nothing here loads
//! a whole file unless the caller asks for it:
//!
//! - [`stream`]: visit the records of one top-level array of a graph
//!   document (`nodes` or `edges`) one at a time, skipping everything else.
//! - [`jsonl`]: lazy JSON-Lines reading and writing for the per-source
//!   extraction dumps.
//! - [`config`]: the small YAML/plain-text inputs that steer a run (remap
//!   tables, the CURIE/URI prefix map, the version file).
//! - [`write`]: whole-document output, compact by default and
//!   pretty-printed in test mode.

pub mod config;
pub mod jsonl;
pub mod stream;
pub mod write;

pub use config::{load_yaml, read_version_file, CurieUriMap};
pub use jsonl::{open_jsonl, JsonLinesReader, JsonLinesWriter};
pub use stream::{read_section_value, stream_section};
pub use write::save_json;
