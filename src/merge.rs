use crate::conflicts::find_conflicts;
use crate::error::{BlueprintError, Result};
use crate::model::Blueprint;
use log::{debug, warn};

/// Deep copy of a blueprint. An absent blueprint copies to an empty one.
///
/// Every field is owned data, so the copy shares nothing with the source.
pub fn copy_blueprint(blueprint: Option<&Blueprint>) -> Blueprint {
    blueprint.cloned().unwrap_or_default()
}

/// Combines two blueprints into a new one.
///
/// Collections are concatenated, `base` entries first. For the preview
/// settings the overlay wins whenever it sets a value. Any same-kind name
/// collision aborts the merge without producing a partial result; rename
/// one side with [`crate::prefix_blueprint`] first.
///
/// # Errors
///
/// Returns [`BlueprintError::ConflictsFound`] listing every collision.
pub fn merge_blueprints(
    base: Option<&Blueprint>,
    overlay: Option<&Blueprint>,
) -> Result<Blueprint> {
    let (base, overlay) = match (base, overlay) {
        (None, None) => return Ok(Blueprint::default()),
        (Some(only), None) | (None, Some(only)) => return Ok(copy_blueprint(Some(only))),
        (Some(base), Some(overlay)) => (base, overlay),
    };

    let conflicts = find_conflicts(Some(base), Some(overlay));
    if !conflicts.is_empty() {
        warn!("refusing to merge blueprints: {} name conflicts", conflicts.len());
        return Err(BlueprintError::ConflictsFound { conflicts });
    }

    let merged = Blueprint {
        services: base.services.iter().chain(&overlay.services).cloned().collect(),
        databases: base.databases.iter().chain(&overlay.databases).cloned().collect(),
        env_var_groups: base
            .env_var_groups
            .iter()
            .chain(&overlay.env_var_groups)
            .cloned()
            .collect(),
        previews: overlay.previews.or(base.previews),
        previews_expire_after_days: overlay
            .previews_expire_after_days
            .or(base.previews_expire_after_days),
    };

    debug!(
        "merged blueprints: {} services, {} databases, {} groups",
        merged.services.len(),
        merged.databases.len(),
        merged.env_var_groups.len(),
    );
    Ok(merged)
}
