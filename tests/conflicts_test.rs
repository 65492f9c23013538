// Conflict detection tests
use render_blueprint::{
    find_conflicts, Blueprint, Database, DeployConfig, EnvVarGroup, KeyValueStore, Runtime,
    Service, WebService,
};

#[test]
fn test_no_conflicts_for_absent_inputs() {
    let bp = Blueprint::new().with_databases([Database::new("db")]);
    assert!(find_conflicts(None, None).is_empty());
    assert!(find_conflicts(Some(&bp), None).is_empty());
    assert!(find_conflicts(None, Some(&bp)).is_empty());
}

#[test]
fn test_no_conflicts_for_disjoint_names() {
    let base = Blueprint::new().with_services([Service::web("api", WebService::new(Runtime::Node))]);
    let overlay = Blueprint::new().with_services([Service::worker("jobs", DeployConfig::new(Runtime::Node))]);
    assert!(find_conflicts(Some(&base), Some(&overlay)).is_empty());
}

#[test]
fn test_conflicts_reported_in_kind_then_overlay_order() {
    let base = Blueprint::new()
        .with_services([
            Service::web("a", WebService::new(Runtime::Node)),
            Service::web("b", WebService::new(Runtime::Node)),
        ])
        .with_databases([Database::new("db")])
        .with_env_var_groups([EnvVarGroup::new("shared")]);
    let overlay = Blueprint::new()
        .with_env_var_groups([EnvVarGroup::new("shared")])
        .with_databases([Database::new("db")])
        .with_services([
            Service::key_value("b", KeyValueStore::new()),
            Service::worker("a", DeployConfig::new(Runtime::Go)),
        ]);

    assert_eq!(
        find_conflicts(Some(&base), Some(&overlay)),
        vec![
            "service name conflict: b",
            "service name conflict: a",
            "database name conflict: db",
            "environment group name conflict: shared",
        ]
    );
}

#[test]
fn test_same_name_different_kind_is_not_a_conflict() {
    let base = Blueprint::new().with_databases([Database::new("cache")]);
    let overlay = Blueprint::new().with_services([Service::key_value("cache", KeyValueStore::new())]);
    assert!(find_conflicts(Some(&base), Some(&overlay)).is_empty());
}
