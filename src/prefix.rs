use crate::env::{EnvVar, NameRef};
use crate::index::index_names;
use crate::merge::copy_blueprint;
use crate::model::{Blueprint, Database};
use log::debug;
use std::collections::{BTreeSet, HashMap};

/// Separator used by [`prefix_blueprint_with_separator`] when none is given.
pub const DEFAULT_SEPARATOR: &str = "-";

/// Old name to new name, one table per collection kind.
struct Renames {
    services: HashMap<String, String>,
    databases: HashMap<String, String>,
    env_var_groups: HashMap<String, String>,
}

impl Renames {
    fn new(prefix: &str, bp: &Blueprint) -> Self {
        let names = index_names(Some(bp));
        Renames {
            services: table(prefix, names.services),
            databases: table(prefix, names.databases),
            env_var_groups: table(prefix, names.env_var_groups),
        }
    }

    fn lookup(&self, reference: NameRef<'_>) -> Option<&String> {
        match reference {
            NameRef::Service(name) => self.services.get(name),
            NameRef::Database(name) => self.databases.get(name),
            NameRef::Group(name) => self.env_var_groups.get(name),
        }
    }

    /// Points an internal reference at the renamed entity. External
    /// references have no entry in the table and are left as they are.
    fn rewrite(&self, env_var: &mut EnvVar) {
        let renamed = env_var.reference().and_then(|r| self.lookup(r)).cloned();
        if let (Some(renamed), Some(name)) = (renamed, env_var.reference_name_mut()) {
            *name = renamed;
        }
    }
}

fn table(prefix: &str, names: BTreeSet<String>) -> HashMap<String, String> {
    names
        .into_iter()
        .map(|old| {
            let new = format!("{prefix}{old}");
            (old, new)
        })
        .collect()
}

/// Returns a copy of `blueprint` with `prefix` prepended to every name it
/// defines, and every internal reference updated to match.
///
/// References to names the blueprint does not define are left untouched. An
/// empty prefix or an absent blueprint yields a plain copy. The input is
/// never modified.
pub fn prefix_blueprint(blueprint: Option<&Blueprint>, prefix: &str) -> Blueprint {
    let mut prefixed = copy_blueprint(blueprint);
    if blueprint.is_none() || prefix.is_empty() {
        return prefixed;
    }

    let renames = Renames::new(prefix, &prefixed);

    for service in &mut prefixed.services {
        if let Some(new) = renames.services.get(&service.name) {
            service.name.clone_from(new);
        }
        for env_var in &mut service.env_vars {
            renames.rewrite(env_var);
        }
    }

    let mut replicas_renamed = 0;
    for db in &mut prefixed.databases {
        if let Some(new) = renames.databases.get(&db.name).cloned() {
            replicas_renamed += rename_replicas(db, &new);
            db.name = new;
        }
    }

    for group in &mut prefixed.env_var_groups {
        if let Some(new) = renames.env_var_groups.get(&group.name) {
            group.name.clone_from(new);
        }
        for env_var in &mut group.env_vars {
            renames.rewrite(env_var);
        }
    }

    debug!(
        "prefixed blueprint with {prefix:?}: {} services, {} databases ({replicas_renamed} replicas), {} groups",
        prefixed.services.len(),
        prefixed.databases.len(),
        prefixed.env_var_groups.len(),
    );
    prefixed
}

/// Replicas are nested under their database, so the parent is known
/// exactly. A replica is renamed only when its name begins with the
/// parent's current name; that leading part is swapped for `new_name`. An
/// unnamed parent matches nothing.
fn rename_replicas(db: &mut Database, new_name: &str) -> usize {
    let old_name = db.name.as_str();
    let mut renamed = 0;
    if old_name.is_empty() {
        return renamed;
    }
    for replica in &mut db.read_replicas {
        if let Some(rest) = replica.name.strip_prefix(old_name) {
            replica.name = format!("{new_name}{rest}");
            renamed += 1;
        }
    }
    renamed
}

/// Like [`prefix_blueprint`], joining `prefix` and `separator`. An empty
/// separator falls back to [`DEFAULT_SEPARATOR`].
pub fn prefix_blueprint_with_separator(
    blueprint: Option<&Blueprint>,
    prefix: &str,
    separator: &str,
) -> Blueprint {
    let separator = if separator.is_empty() {
        DEFAULT_SEPARATOR
    } else {
        separator
    };
    prefix_blueprint(blueprint, &format!("{prefix}{separator}"))
}
