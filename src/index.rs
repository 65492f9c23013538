//! Name and reference indexing.
//!
//! A reference is *internal* when it names an entity of the same kind that
//! the blueprint itself defines, and *external* otherwise. The split is
//! decided purely by set membership, never by looking at the name.

use crate::env::{EnvVar, NameRef};
use crate::model::Blueprint;
use std::collections::BTreeSet;

/// One name set per collection kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceNames {
    pub services: BTreeSet<String>,
    pub databases: BTreeSet<String>,
    pub env_var_groups: BTreeSet<String>,
}

impl ResourceNames {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.databases.is_empty() && self.env_var_groups.is_empty()
    }

    /// Whether `reference` resolves to a name in the matching set.
    pub fn contains(&self, reference: NameRef<'_>) -> bool {
        match reference {
            NameRef::Service(name) => self.services.contains(name),
            NameRef::Database(name) => self.databases.contains(name),
            NameRef::Group(name) => self.env_var_groups.contains(name),
        }
    }

    fn insert(&mut self, reference: NameRef<'_>) {
        match reference {
            NameRef::Service(name) => self.services.insert(name.to_string()),
            NameRef::Database(name) => self.databases.insert(name.to_string()),
            NameRef::Group(name) => self.env_var_groups.insert(name.to_string()),
        };
    }
}

/// Collects the names a blueprint defines, per kind.
pub fn index_names(blueprint: Option<&Blueprint>) -> ResourceNames {
    let Some(bp) = blueprint else {
        return ResourceNames::default();
    };
    ResourceNames {
        services: bp.services.iter().map(|s| s.name.clone()).collect(),
        databases: bp.databases.iter().map(|db| db.name.clone()).collect(),
        env_var_groups: bp.env_var_groups.iter().map(|g| g.name.clone()).collect(),
    }
}

/// Collects the names referenced by environment variables that the
/// blueprint does not define itself.
pub fn index_external_references(blueprint: Option<&Blueprint>) -> ResourceNames {
    let Some(bp) = blueprint else {
        return ResourceNames::default();
    };
    let defined = index_names(Some(bp));
    let mut external = ResourceNames::default();
    for reference in env_vars(bp).filter_map(EnvVar::reference) {
        if !defined.contains(reference) {
            external.insert(reference);
        }
    }
    external
}

/// Every environment variable in the blueprint: service variables first,
/// then group variables, each in document order.
pub(crate) fn env_vars(bp: &Blueprint) -> impl Iterator<Item = &EnvVar> {
    bp.services
        .iter()
        .flat_map(|s| s.env_vars.iter())
        .chain(bp.env_var_groups.iter().flat_map(|g| g.env_vars.iter()))
}
