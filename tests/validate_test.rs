// Structural validation tests
use render_blueprint::{
    validate_blueprint, Blueprint, Database, DeployConfig, EnvVarGroup, KeyValueStore, Runtime,
    Service, WebService,
};

fn web(name: &str) -> Service {
    Service::web(name, WebService::new(Runtime::Node))
}

#[test]
fn test_absent_blueprint_is_a_defect() {
    assert_eq!(validate_blueprint(None), vec!["blueprint is absent"]);
}

#[test]
fn test_valid_blueprint_has_no_defects() {
    let bp = Blueprint::new()
        .with_services([web("api"), Service::key_value("cache", KeyValueStore::new())])
        .with_databases([Database::new("db")])
        .with_env_var_groups([EnvVarGroup::new("shared")]);
    assert!(validate_blueprint(Some(&bp)).is_empty());
}

#[test]
fn test_duplicate_service_reported_once() {
    let bp = Blueprint::new().with_services([
        web("svc"),
        Service::worker("svc", DeployConfig::new(Runtime::Go)),
        web("svc"),
        web(""),
    ]);

    let defects = validate_blueprint(Some(&bp));
    let duplicates: Vec<&String> = defects.iter().filter(|d| d.contains("svc")).collect();
    assert_eq!(duplicates, vec!["duplicate service name: svc"]);
    assert!(defects.contains(&"service missing name".to_string()));
}

#[test]
fn test_all_defects_reported_in_order() {
    let bp = Blueprint::new()
        .with_services([web(""), web("api"), web("api")])
        .with_databases([Database::new("db"), Database::new("db"), Database::new("")])
        .with_env_var_groups([EnvVarGroup::new("g"), EnvVarGroup::new("g"), EnvVarGroup::new("")]);

    assert_eq!(
        validate_blueprint(Some(&bp)),
        vec![
            "duplicate service name: api",
            "duplicate database name: db",
            "duplicate environment group name: g",
            "service missing name",
            "database missing name",
            "environment group missing name",
        ]
    );
}

#[test]
fn test_method_matches_free_function() {
    let bp = Blueprint::new().with_databases([Database::new("db"), Database::new("db")]);
    assert_eq!(bp.validate(), validate_blueprint(Some(&bp)));
}

#[test]
fn test_static_runtime_outside_static_site_is_a_defect() {
    let bp = Blueprint::new().with_services([
        Service::web("w", WebService::new(Runtime::Static)),
        Service::worker("jobs", DeployConfig::new(Runtime::Static)),
    ]);
    assert_eq!(
        validate_blueprint(Some(&bp)),
        vec![
            "service w: runtime static not allowed for web",
            "service jobs: runtime static not allowed for worker",
        ]
    );
}
