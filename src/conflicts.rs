use crate::model::Blueprint;
use std::collections::HashSet;

/// Lists same-kind name collisions between `base` and `overlay`.
///
/// Kinds are checked in the order services, databases, environment groups;
/// within a kind the overlay's entries are visited in document order. An
/// absent side never conflicts.
pub fn find_conflicts(base: Option<&Blueprint>, overlay: Option<&Blueprint>) -> Vec<String> {
    let (Some(base), Some(overlay)) = (base, overlay) else {
        return Vec::new();
    };

    let mut conflicts = Vec::new();
    collect(
        "service",
        base.services.iter().map(|s| s.name.as_str()),
        overlay.services.iter().map(|s| s.name.as_str()),
        &mut conflicts,
    );
    collect(
        "database",
        base.databases.iter().map(|db| db.name.as_str()),
        overlay.databases.iter().map(|db| db.name.as_str()),
        &mut conflicts,
    );
    collect(
        "environment group",
        base.env_var_groups.iter().map(|g| g.name.as_str()),
        overlay.env_var_groups.iter().map(|g| g.name.as_str()),
        &mut conflicts,
    );
    conflicts
}

fn collect<'a>(
    kind: &str,
    base: impl Iterator<Item = &'a str>,
    overlay: impl Iterator<Item = &'a str>,
    conflicts: &mut Vec<String>,
) {
    let taken: HashSet<&str> = base.collect();
    for name in overlay {
        if taken.contains(name) {
            conflicts.push(format!("{kind} name conflict: {name}"));
        }
    }
}
