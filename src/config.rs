//! Configuration schema and loader.
//!
//! Settings come from struct defaults, an optional TOML file and
//! `KHMUSIC__*` environment variables, in that order.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;
