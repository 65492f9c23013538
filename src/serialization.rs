use crate::error::{BlueprintError, Result};
use crate::model::Blueprint;
use crate::raw::RawBlueprint;
use crate::validate::misplaced_static_runtimes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for Blueprint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let misplaced = misplaced_static_runtimes(self);
        if !misplaced.is_empty() {
            return Err(serde::ser::Error::custom(misplaced.join("; ")));
        }
        RawBlueprint::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Blueprint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawBlueprint::deserialize(deserializer)?
            .lift()
            .map_err(|defects| serde::de::Error::custom(defects.join("; ")))
    }
}

/// Serializes a blueprint into `render.yaml` form.
///
/// # Errors
/// Returns a `serde_yaml::Error` wrapped in [`BlueprintError::Yaml`], also
/// when a non-static service carries the `static` runtime.
pub fn to_yaml(blueprint: &Blueprint) -> Result<String> {
    Ok(serde_yaml::to_string(blueprint)?)
}

pub fn to_yaml_bytes(blueprint: &Blueprint) -> Result<Vec<u8>> {
    to_yaml(blueprint).map(String::into_bytes)
}

/// Serializes a blueprint into pretty-printed JSON with the same keys as the YAML form.
///
/// # Errors
/// Returns a `serde_json::Error` wrapped in [`BlueprintError::Json`].
pub fn to_json(blueprint: &Blueprint) -> Result<String> {
    Ok(serde_json::to_string_pretty(blueprint)?)
}

/// Parses a `render.yaml` document.
///
/// # Errors
/// [`BlueprintError::Yaml`] if the text is not a well-formed manifest, or
/// [`BlueprintError::Invalid`] listing every service or environment
/// variable that cannot be represented (missing type, missing runtime,
/// ambiguous value source, a key the service's kind does not carry).
/// Keys the manifest format does not know are a [`BlueprintError::Yaml`].
pub fn from_yaml(source: &str) -> Result<Blueprint> {
    let raw: RawBlueprint = serde_yaml::from_str(source)?;
    raw.lift().map_err(|defects| BlueprintError::Invalid { defects })
}

/// Parses the JSON rendition produced by [`to_json`].
///
/// # Errors
/// Same as [`from_yaml`], with [`BlueprintError::Json`] for syntax errors.
pub fn from_json(source: &str) -> Result<Blueprint> {
    let raw: RawBlueprint = serde_json::from_str(source)?;
    raw.lift().map_err(|defects| BlueprintError::Invalid { defects })
}
