use render_blueprint::{
    merge_blueprints, prefix_blueprint, Blueprint, Database, DatabaseProperty, DeployConfig,
    Deployable, EnvVar, PostgresVersion, Runtime, Service, WebService,
};

fn main() {
    let app = Blueprint::new()
        .with_services([Service::web(
            "api",
            WebService::new(Runtime::Node)
                .with_start_command("npm start")
                .with_domains(["api.example.com"]),
        )
        .with_env_var(EnvVar::from_database(
            "DATABASE_URL",
            "main-db",
            DatabaseProperty::ConnectionString,
        ))])
        .with_databases([Database::new("main-db").with_postgres(PostgresVersion::V16)]);

    let jobs = Blueprint::new().with_services([Service::worker(
        "worker",
        DeployConfig::new(Runtime::Python).with_start_command("python worker.py"),
    )]);

    let composed = merge_blueprints(Some(&app), Some(&jobs))
        .map(|merged| prefix_blueprint(Some(&merged), "prod-"))
        .and_then(|bp| bp.to_yaml());

    match composed {
        Ok(yaml) => println!("Composed blueprint:\n{yaml}"),
        Err(e) => eprintln!("Failed to compose blueprint: {e:?}"),
    }
}
