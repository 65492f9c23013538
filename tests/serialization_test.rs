// Codec tests: render.yaml and JSON
use render_blueprint::{
    from_json, from_yaml, to_json, to_yaml, Blueprint, BlueprintError, CronJob, Database,
    DatabaseProperty, DeployConfig, Deployable, EnvVar, MaxMemoryPolicy, PostgresVersion,
    PreviewGeneration, Route, RouteType, Runtime, Service, ServiceKind, ServiceType,
    WebService,
};
use std::fs;
use std::path::PathBuf;

fn read_fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {:?}", path))
}

#[test]
fn test_parse_full_manifest() {
    let bp = from_yaml(&read_fixture("full.yaml")).unwrap();

    assert_eq!(bp.services.len(), 4);
    assert_eq!(bp.databases.len(), 1);
    assert_eq!(bp.env_var_groups.len(), 1);
    assert_eq!(bp.previews.map(|p| p.generation), Some(PreviewGeneration::Automatic));
    assert_eq!(bp.previews_expire_after_days, Some(7));

    let api = bp.find_service("api").unwrap();
    match &api.kind {
        ServiceKind::Web(web) => {
            assert_eq!(web.deploy.runtime, Runtime::Node);
            assert_eq!(web.domains, vec!["api.example.com"]);
            assert_eq!(web.health_check_path.as_deref(), Some("/healthz"));
            assert_eq!(web.deploy.scaling.and_then(|s| s.target_cpu_percent), Some(60));
        }
        other => panic!("Expected a web service, got {other:?}"),
    }
    assert_eq!(
        api.env_vars,
        vec![
            EnvVar::literal("NODE_ENV", "production"),
            EnvVar::from_database("DATABASE_URL", "main-db", DatabaseProperty::ConnectionString),
            EnvVar::from_service(
                "REDIS_URL",
                "cache",
                ServiceType::KeyValue,
                render_blueprint::ServiceProperty::ConnectionString
            ),
            EnvVar::generated("SESSION_SECRET"),
            EnvVar::secret("STRIPE_KEY"),
            EnvVar::from_group("shared"),
        ]
    );

    match &bp.find_service("cleanup").unwrap().kind {
        ServiceKind::Cron(cron) => assert_eq!(cron.schedule, "0 2 * * *"),
        other => panic!("Expected a cron job, got {other:?}"),
    }
    match &bp.find_service("frontend").unwrap().kind {
        ServiceKind::StaticSite(site) => {
            assert_eq!(site.static_publish_path, "./dist");
            assert_eq!(site.routes[0].route_type, RouteType::Rewrite);
        }
        other => panic!("Expected a static site, got {other:?}"),
    }
    match &bp.find_service("cache").unwrap().kind {
        ServiceKind::KeyValue(store) => {
            assert_eq!(store.max_memory_policy, Some(MaxMemoryPolicy::AllkeysLru));
        }
        other => panic!("Expected a key-value store, got {other:?}"),
    }

    let db = bp.find_database("main-db").unwrap();
    assert_eq!(db.postgres_major_version, Some(PostgresVersion::V16));
    assert_eq!(db.disk_size_gb, Some(10));
    assert_eq!(db.read_replicas[0].name, "main-db-replica");
}

#[test]
fn test_full_manifest_survives_reencoding() {
    let bp = from_yaml(&read_fixture("full.yaml")).unwrap();
    let reparsed = from_yaml(&to_yaml(&bp).unwrap()).unwrap();
    assert_eq!(reparsed, bp);

    let via_json = from_json(&to_json(&bp).unwrap()).unwrap();
    assert_eq!(via_json, bp);
}

#[test]
fn test_invalid_services_report_every_defect() {
    match from_yaml(&read_fixture("invalid_services.yaml")) {
        Err(BlueprintError::Invalid { defects }) => assert_eq!(
            defects,
            vec![
                "service api missing runtime",
                "service mystery missing type",
                "cron job nightly missing schedule",
                "env var AMBIGUOUS has conflicting value sources",
                "env var EMPTY has no value source",
            ]
        ),
        other => panic!("Expected invalid-manifest error, got {other:?}"),
    }
}

#[test]
fn test_unknown_type_is_reported() {
    let source = "services:\n  - name: x\n    type: lambda\n    runtime: node\n";
    let err = from_yaml(source).unwrap_err();
    assert_eq!(err.findings(), ["service x has unknown type lambda"]);
}

#[test]
fn test_malformed_yaml_is_a_yaml_error() {
    let result = from_yaml("services: [unclosed");
    assert!(matches!(result, Err(BlueprintError::Yaml(_))));
}

#[test]
fn test_empty_document_parses_to_empty_blueprint() {
    assert_eq!(from_yaml("{}").unwrap(), Blueprint::default());
}

#[test]
fn test_builder_output_encodes_expected_keys() {
    let bp = Blueprint::new()
        .with_services([
            Service::web(
                "api",
                WebService::new(Runtime::Node)
                    .with_git("https://github.com/example/api", Some("main"))
                    .with_build("npm install")
                    .with_autoscaling(1, 4, Some(70))
                    .with_disk("data", "/var/data", Some(5)),
            ),
            Service::cron(
                "cleanup",
                CronJob::new(Runtime::Node, "0 2 * * *").with_start_command("npm run cleanup"),
            ),
            Service::worker(
                "renderer",
                DeployConfig::new(Runtime::Node).with_dockerfile("./Dockerfile", Some(".")),
            ),
        ])
        .with_databases([Database::new("main-db")
            .with_postgres(PostgresVersion::V15)
            .with_private_access()]);

    let yaml = to_yaml(&bp).unwrap();
    for expected in [
        "repo: https://github.com/example/api",
        "branch: main",
        "buildCommand: npm install",
        "targetCPUPercent: 70",
        "sizeGB: 5",
        "mountPath: /var/data",
        "runtime: docker",
        "dockerfilePath: ./Dockerfile",
        "ipAllowList: []",
    ] {
        assert!(yaml.contains(expected), "missing {expected:?} in:\n{yaml}");
    }
    assert_eq!(from_yaml(&yaml).unwrap(), bp);
}

#[test]
fn test_serde_impls_route_through_manifest_form() {
    let bp = Blueprint::new().with_services([Service::static_site(
        "site",
        render_blueprint::StaticSite::new("public").with_routes([Route {
            route_type: RouteType::Redirect,
            source: "/old".to_string(),
            destination: "/new".to_string(),
        }]),
    )]);
    let text = serde_json::to_string(&bp).unwrap();
    let back: Blueprint = serde_json::from_str(&text).unwrap();
    assert_eq!(back, bp);
}

#[test]
fn test_keys_foreign_to_the_kind_are_reported() {
    let source = "services:\n  - name: w\n    type: worker\n    runtime: node\n    domains: [a.example.com]\n    healthCheckPath: /h\n";
    match from_yaml(source) {
        Err(BlueprintError::Invalid { defects }) => assert_eq!(
            defects,
            vec![
                "service w: domains not allowed for worker",
                "service w: healthCheckPath not allowed for worker",
            ]
        ),
        other => panic!("Expected invalid-manifest error, got {other:?}"),
    }
}

#[test]
fn test_unknown_service_key_is_rejected() {
    let source = "services:\n  - name: w\n    type: worker\n    runtime: node\n    unknownKey: 1\n";
    match from_yaml(source) {
        Err(err @ BlueprintError::Yaml(_)) => assert!(err.to_string().contains("unknownKey")),
        other => panic!("Expected YAML error, got {other:?}"),
    }
}

#[test]
fn test_static_runtime_without_publish_path_is_reported() {
    let source = "services:\n  - name: s\n    type: web\n    runtime: static\n    startCommand: serve\n";
    match from_yaml(source) {
        Err(BlueprintError::Invalid { defects }) => assert_eq!(
            defects,
            vec![
                "service s missing staticPublishPath",
                "service s: startCommand not allowed for static site",
            ]
        ),
        other => panic!("Expected invalid-manifest error, got {other:?}"),
    }
}

#[test]
fn test_static_runtime_on_other_kinds_is_reported() {
    let source = "services:\n  - name: w\n    type: worker\n    runtime: static\n";
    let err = from_yaml(source).unwrap_err();
    assert_eq!(err.findings(), ["service w: runtime static not allowed for worker"]);
}

#[test]
fn test_web_service_with_static_runtime_does_not_encode() {
    let bp = Blueprint::new().with_services([Service::web("w", WebService::new(Runtime::Static))]);
    assert!(matches!(to_yaml(&bp), Err(BlueprintError::Yaml(_))));
    assert!(matches!(to_json(&bp), Err(BlueprintError::Json(_))));
}
