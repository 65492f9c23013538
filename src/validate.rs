use crate::model::{Blueprint, Runtime};
use crate::service::ServiceKind;
use std::collections::HashSet;

/// Checks a blueprint for structural defects and reports all of them.
///
/// The result is advisory: an empty list means the blueprint is well formed.
/// Defects are reported in a fixed order: duplicate service, database and
/// group names, then per-service, per-database and per-group field checks,
/// each in document order, then services running the `static` runtime
/// outside a static site.
///
/// A missing service type or runtime cannot be expressed by [`Blueprint`];
/// the decoder reports those when reading a manifest.
pub fn validate_blueprint(blueprint: Option<&Blueprint>) -> Vec<String> {
    let Some(bp) = blueprint else {
        return vec!["blueprint is absent".to_string()];
    };

    let mut defects = Vec::new();
    duplicates("service", bp.services.iter().map(|s| s.name.as_str()), &mut defects);
    duplicates("database", bp.databases.iter().map(|db| db.name.as_str()), &mut defects);
    duplicates(
        "environment group",
        bp.env_var_groups.iter().map(|g| g.name.as_str()),
        &mut defects,
    );

    for service in &bp.services {
        if service.name.is_empty() {
            defects.push("service missing name".to_string());
        }
    }
    for db in &bp.databases {
        if db.name.is_empty() {
            defects.push("database missing name".to_string());
        }
    }
    for group in &bp.env_var_groups {
        if group.name.is_empty() {
            defects.push("environment group missing name".to_string());
        }
    }
    defects.extend(misplaced_static_runtimes(bp));

    defects
}

/// A runtime-bearing service set to `runtime: static` would be read back
/// as a static site, so it has no manifest form.
pub(crate) fn misplaced_static_runtimes(bp: &Blueprint) -> Vec<String> {
    bp.services
        .iter()
        .filter(|s| {
            !matches!(s.kind, ServiceKind::StaticSite(_)) && s.kind.runtime() == Some(Runtime::Static)
        })
        .map(|s| {
            format!(
                "service {}: runtime static not allowed for {}",
                s.name,
                s.service_type().as_str()
            )
        })
        .collect()
}

/// Reports each name once, however many times it repeats.
fn duplicates<'a>(kind: &str, names: impl Iterator<Item = &'a str>, defects: &mut Vec<String>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for name in names {
        if !seen.insert(name) && reported.insert(name) {
            defects.push(format!("duplicate {kind} name: {name}"));
        }
    }
}
