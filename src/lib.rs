pub mod api;
pub mod conflicts;
pub mod env;
pub mod error;
pub mod index;
pub mod io;
pub mod merge;
pub mod model;
pub mod prefix;
pub mod serialization;
pub mod service;
pub mod validate;
mod raw;

pub use api::NameLists;
pub use conflicts::find_conflicts;
pub use env::{DatabaseRef, EnvVar, NameRef, ServiceRef};
pub use error::{BlueprintError, Result};
pub use index::{index_external_references, index_names, ResourceNames};
pub use io::{
    load_from_file, load_render_yaml, load_render_yaml_from, write_render_yaml,
    write_render_yaml_to, write_to_file, write_with_backup,
};
pub use merge::{copy_blueprint, merge_blueprints};
pub use model::*;
pub use prefix::{prefix_blueprint, prefix_blueprint_with_separator};
pub use serialization::{from_json, from_yaml, to_json, to_yaml, to_yaml_bytes};
pub use service::*;
pub use validate::validate_blueprint;
