//! Configuration schema and loading.
//!
//! Settings come from an optional TOML file and `CADENZA__*` environment
//! variables, layered over the defaults defined in `schema`.

mod load;
mod schema;

pub use schema::*;
