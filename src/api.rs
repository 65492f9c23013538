use crate::error::Result;
use crate::index::{index_external_references, index_names, ResourceNames};
use crate::merge::merge_blueprints;
use crate::model::{Blueprint, Database, EnvVarGroup};
use crate::prefix::{prefix_blueprint, prefix_blueprint_with_separator};
use crate::serialization;
use crate::service::Service;
use crate::validate::validate_blueprint;
use std::path::Path;

/// The three name lists of a blueprint in document order, duplicates kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameLists {
    pub services: Vec<String>,
    pub databases: Vec<String>,
    pub env_var_groups: Vec<String>,
}

impl Blueprint {
    /// Serializes the blueprint into `render.yaml` form.
    ///
    /// # Errors
    /// Returns a [`crate::BlueprintError::Yaml`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serialization::to_yaml(self)
    }

    /// Serializes the blueprint into pretty-printed JSON.
    ///
    /// # Errors
    /// Returns a [`crate::BlueprintError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serialization::to_json(self)
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::io::write_to_file(self, path)
    }

    pub fn write_with_backup(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::io::write_with_backup(self, path)
    }

    /// Merges `overlay` into a copy of `self`. See [`merge_blueprints`].
    pub fn merge(&self, overlay: &Blueprint) -> Result<Blueprint> {
        merge_blueprints(Some(self), Some(overlay))
    }

    pub fn prefixed(&self, prefix: &str) -> Blueprint {
        prefix_blueprint(Some(self), prefix)
    }

    pub fn prefixed_with_separator(&self, prefix: &str, separator: &str) -> Blueprint {
        prefix_blueprint_with_separator(Some(self), prefix, separator)
    }

    pub fn validate(&self) -> Vec<String> {
        validate_blueprint(Some(self))
    }

    pub fn defined_names(&self) -> ResourceNames {
        index_names(Some(self))
    }

    pub fn external_references(&self) -> ResourceNames {
        index_external_references(Some(self))
    }

    pub fn resource_names(&self) -> NameLists {
        NameLists {
            services: self.services.iter().map(|s| s.name.clone()).collect(),
            databases: self.databases.iter().map(|db| db.name.clone()).collect(),
            env_var_groups: self.env_var_groups.iter().map(|g| g.name.clone()).collect(),
        }
    }

    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn find_database(&self, name: &str) -> Option<&Database> {
        self.databases.iter().find(|db| db.name == name)
    }

    pub fn find_env_var_group(&self, name: &str) -> Option<&EnvVarGroup> {
        self.env_var_groups.iter().find(|g| g.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Runtime;
    use crate::service::{DeployConfig, WebService};

    fn sample() -> Blueprint {
        Blueprint::new()
            .with_services([
                Service::web("api", WebService::new(Runtime::Node)),
                Service::worker("jobs", DeployConfig::new(Runtime::Ruby)),
                Service::worker("jobs", DeployConfig::new(Runtime::Ruby)),
            ])
            .with_databases([Database::new("main-db")])
            .with_env_var_groups([EnvVarGroup::new("shared")])
    }

    #[test]
    fn test_find_helpers() {
        let bp = sample();
        assert_eq!(bp.find_service("api").map(|s| s.name.as_str()), Some("api"));
        assert!(bp.find_service("missing").is_none());
        assert!(bp.find_database("main-db").is_some());
        assert!(bp.find_env_var_group("shared").is_some());
        assert!(bp.find_env_var_group("main-db").is_none());
    }

    #[test]
    fn test_resource_names_keep_order_and_duplicates() {
        let names = sample().resource_names();
        assert_eq!(names.services, vec!["api", "jobs", "jobs"]);
        assert_eq!(names.databases, vec!["main-db"]);
        assert_eq!(names.env_var_groups, vec!["shared"]);
    }

    #[test]
    fn test_defined_names_are_deduplicated() {
        assert_eq!(sample().defined_names().services.len(), 2);
    }
}
