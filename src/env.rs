use crate::model::{DatabaseProperty, ServiceProperty, ServiceType};
use serde::{Deserialize, Serialize};

/// An environment variable with exactly one value source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvVar {
    /// A plain `key: value` pair.
    Literal { key: String, value: String },
    /// Prompted for in the dashboard on first deploy, never synced (`sync: false`).
    Secret { key: String },
    /// A random value generated by the platform on deploy.
    Generated { key: String },
    FromDatabase { key: String, reference: DatabaseRef },
    FromService { key: String, reference: ServiceRef },
    /// Pulls every variable of the named group. Has no key of its own.
    FromGroup { group: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseRef {
    pub name: String,
    pub property: DatabaseProperty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRef {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<ServiceProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_var_key: Option<String>,
}

/// A name an [`EnvVar`] points at, tagged with the collection it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameRef<'a> {
    Service(&'a str),
    Database(&'a str),
    Group(&'a str),
}

impl EnvVar {
    pub fn literal(key: impl Into<String>, value: impl Into<String>) -> Self {
        EnvVar::Literal {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn secret(key: impl Into<String>) -> Self {
        EnvVar::Secret { key: key.into() }
    }

    pub fn generated(key: impl Into<String>) -> Self {
        EnvVar::Generated { key: key.into() }
    }

    pub fn from_database(
        key: impl Into<String>,
        database: impl Into<String>,
        property: DatabaseProperty,
    ) -> Self {
        EnvVar::FromDatabase {
            key: key.into(),
            reference: DatabaseRef {
                name: database.into(),
                property,
            },
        }
    }

    pub fn from_service(
        key: impl Into<String>,
        service: impl Into<String>,
        service_type: ServiceType,
        property: ServiceProperty,
    ) -> Self {
        EnvVar::FromService {
            key: key.into(),
            reference: ServiceRef {
                name: service.into(),
                service_type,
                property: Some(property),
                env_var_key: None,
            },
        }
    }

    /// Copies the value of another service's environment variable.
    pub fn from_service_env(
        key: impl Into<String>,
        service: impl Into<String>,
        service_type: ServiceType,
        env_var_key: impl Into<String>,
    ) -> Self {
        EnvVar::FromService {
            key: key.into(),
            reference: ServiceRef {
                name: service.into(),
                service_type,
                property: None,
                env_var_key: Some(env_var_key.into()),
            },
        }
    }

    pub fn from_group(group: impl Into<String>) -> Self {
        EnvVar::FromGroup {
            group: group.into(),
        }
    }

    /// The variable's own key. Group references have none.
    pub fn key(&self) -> Option<&str> {
        match self {
            EnvVar::Literal { key, .. }
            | EnvVar::Secret { key }
            | EnvVar::Generated { key }
            | EnvVar::FromDatabase { key, .. }
            | EnvVar::FromService { key, .. } => Some(key),
            EnvVar::FromGroup { .. } => None,
        }
    }

    /// The resource name this variable depends on, if any.
    pub fn reference(&self) -> Option<NameRef<'_>> {
        match self {
            EnvVar::FromDatabase { reference, .. } => Some(NameRef::Database(&reference.name)),
            EnvVar::FromService { reference, .. } => Some(NameRef::Service(&reference.name)),
            EnvVar::FromGroup { group } => Some(NameRef::Group(group)),
            _ => None,
        }
    }

    /// Mutable access to the referenced name, for renaming.
    pub(crate) fn reference_name_mut(&mut self) -> Option<&mut String> {
        match self {
            EnvVar::FromDatabase { reference, .. } => Some(&mut reference.name),
            EnvVar::FromService { reference, .. } => Some(&mut reference.name),
            EnvVar::FromGroup { group } => Some(group),
            _ => None,
        }
    }
}
