//! The manifest as it appears on the wire.
//!
//! Services and environment variables are flat maps of optional keys here.
//! Lowering a typed [`Blueprint`] into this form is infallible; lifting it
//! back collects every defect before failing.

use crate::env::{DatabaseRef, EnvVar, ServiceRef};
use crate::model::{
    Blueprint, Database, EnvVarGroup, IpAllow, MaxMemoryPolicy, Plan, Previews, Region, Runtime,
    ServiceType,
};
use crate::service::{
    BuildFilter, CronJob, DeployConfig, Disk, DockerConfig, DockerImage, Header, KeyValueStore,
    RegistryCredential, Route, Scaling, Service, ServiceKind, ServicePreviews, StaticSite,
    WebService,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawBlueprint {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<RawService>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<Database>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_var_groups: Vec<RawEnvVarGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previews: Option<Previews>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previews_expire_after_days: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawEnvVarGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<RawEnvVar>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawEnvVar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_database: Option<DatabaseRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_service: Option<ServiceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_group: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawService {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<Runtime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previews: Option<ServicePreviews>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_deploy_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_shutdown_delay_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<Scaling>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env_vars: Vec<RawEnvVar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<DockerImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_credential: Option<RegistryCredential>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_filter: Option<BuildFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<Disk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_publish_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_allow_list: Option<Vec<IpAllow>>,
    #[serde(rename = "maxmemoryPolicy", default, skip_serializing_if = "Option::is_none")]
    pub max_memory_policy: Option<MaxMemoryPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_path: Option<String>,
}

// --- Lowering: typed -> wire ---

impl From<&Blueprint> for RawBlueprint {
    fn from(bp: &Blueprint) -> Self {
        RawBlueprint {
            services: bp.services.iter().map(RawService::from).collect(),
            databases: bp.databases.clone(),
            env_var_groups: bp
                .env_var_groups
                .iter()
                .map(|g| RawEnvVarGroup {
                    name: g.name.clone(),
                    env_vars: g.env_vars.iter().map(RawEnvVar::from).collect(),
                })
                .collect(),
            previews: bp.previews,
            previews_expire_after_days: bp.previews_expire_after_days,
        }
    }
}

impl From<&EnvVar> for RawEnvVar {
    fn from(var: &EnvVar) -> Self {
        let mut raw = RawEnvVar {
            key: var.key().map(str::to_string),
            ..RawEnvVar::default()
        };
        match var {
            EnvVar::Literal { value, .. } => raw.value = Some(value.clone()),
            EnvVar::Secret { .. } => raw.sync = Some(false),
            EnvVar::Generated { .. } => raw.generate_value = Some(true),
            EnvVar::FromDatabase { reference, .. } => raw.from_database = Some(reference.clone()),
            EnvVar::FromService { reference, .. } => raw.from_service = Some(reference.clone()),
            EnvVar::FromGroup { group } => raw.from_group = Some(group.clone()),
        }
        raw
    }
}

impl From<&Service> for RawService {
    fn from(service: &Service) -> Self {
        let mut raw = RawService {
            name: service.name.clone(),
            service_type: Some(service.service_type().as_str().to_string()),
            runtime: service.kind.runtime(),
            env_vars: service.env_vars.iter().map(RawEnvVar::from).collect(),
            ..RawService::default()
        };
        match &service.kind {
            ServiceKind::Web(web) => {
                lower_deploy(&web.deploy, &mut raw);
                raw.domains.clone_from(&web.domains);
                raw.health_check_path.clone_from(&web.health_check_path);
            }
            ServiceKind::Worker(deploy) | ServiceKind::PrivateService(deploy) => {
                lower_deploy(deploy, &mut raw);
            }
            ServiceKind::Cron(cron) => {
                lower_deploy(&cron.deploy, &mut raw);
                raw.schedule = Some(cron.schedule.clone());
            }
            ServiceKind::StaticSite(site) => {
                // The static-service schema has no region or previewPlan.
                raw.static_publish_path = Some(site.static_publish_path.clone());
                raw.repo.clone_from(&site.repo);
                raw.branch.clone_from(&site.branch);
                raw.root_dir.clone_from(&site.root_dir);
                raw.build_command.clone_from(&site.build_command);
                raw.auto_deploy = site.auto_deploy;
                raw.build_filter.clone_from(&site.build_filter);
                raw.domains.clone_from(&site.domains);
                raw.headers.clone_from(&site.headers);
                raw.routes.clone_from(&site.routes);
                raw.previews = site.previews;
            }
            ServiceKind::KeyValue(store) => {
                raw.plan = store.plan;
                raw.region = store.region;
                // The key-value schema requires the allow list, even when empty.
                raw.ip_allow_list = Some(store.ip_allow_list.clone());
                raw.max_memory_policy = store.max_memory_policy;
                raw.previews = store.previews;
                raw.preview_plan = store.preview_plan;
            }
        }
        raw
    }
}

fn lower_deploy(deploy: &DeployConfig, raw: &mut RawService) {
    raw.plan = deploy.plan;
    raw.region = deploy.region;
    raw.repo.clone_from(&deploy.repo);
    raw.branch.clone_from(&deploy.branch);
    raw.root_dir.clone_from(&deploy.root_dir);
    raw.build_command.clone_from(&deploy.build_command);
    raw.start_command.clone_from(&deploy.start_command);
    raw.pre_deploy_command.clone_from(&deploy.pre_deploy_command);
    raw.auto_deploy = deploy.auto_deploy;
    raw.build_filter.clone_from(&deploy.build_filter);
    raw.num_instances = deploy.num_instances;
    raw.scaling = deploy.scaling;
    raw.disk.clone_from(&deploy.disk);
    raw.previews = deploy.previews;
    raw.preview_plan = deploy.preview_plan;
    raw.max_shutdown_delay_seconds = deploy.max_shutdown_delay_seconds;
    if let Some(docker) = &deploy.docker {
        raw.docker_command.clone_from(&docker.docker_command);
        raw.dockerfile_path.clone_from(&docker.dockerfile_path);
        raw.docker_context.clone_from(&docker.docker_context);
        raw.image.clone_from(&docker.image);
        raw.registry_credential.clone_from(&docker.registry_credential);
    }
}

// --- Lifting: wire -> typed ---

impl RawBlueprint {
    /// Lifts the wire form into a [`Blueprint`], or returns every defect found.
    pub(crate) fn lift(self) -> Result<Blueprint, Vec<String>> {
        let mut defects = Vec::new();

        let services = self
            .services
            .into_iter()
            .filter_map(|raw| raw.lift(&mut defects))
            .collect();

        let env_var_groups = self
            .env_var_groups
            .into_iter()
            .map(|raw| EnvVarGroup {
                env_vars: lift_env_vars(raw.env_vars, &mut defects),
                name: raw.name,
            })
            .collect();

        if !defects.is_empty() {
            return Err(defects);
        }
        Ok(Blueprint {
            services,
            databases: self.databases,
            env_var_groups,
            previews: self.previews,
            previews_expire_after_days: self.previews_expire_after_days,
        })
    }
}

fn lift_env_vars(raw: Vec<RawEnvVar>, defects: &mut Vec<String>) -> Vec<EnvVar> {
    raw.into_iter().filter_map(|var| var.lift(defects)).collect()
}

impl RawEnvVar {
    fn lift(self, defects: &mut Vec<String>) -> Option<EnvVar> {
        let secret = self.sync == Some(false);
        let generated = self.generate_value == Some(true);
        let sources = [
            self.value.is_some(),
            secret,
            generated,
            self.from_database.is_some(),
            self.from_service.is_some(),
            self.from_group.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count();

        let label = self.key.clone().unwrap_or_default();
        if sources == 0 {
            defects.push(format!("env var {label} has no value source"));
            return None;
        }
        if sources > 1 {
            defects.push(format!("env var {label} has conflicting value sources"));
            return None;
        }

        if let Some(group) = self.from_group {
            return Some(EnvVar::FromGroup { group });
        }
        let Some(key) = self.key else {
            defects.push("env var missing key".to_string());
            return None;
        };
        let var = if let Some(value) = self.value {
            EnvVar::Literal { key, value }
        } else if let Some(reference) = self.from_database {
            EnvVar::FromDatabase { key, reference }
        } else if let Some(reference) = self.from_service {
            EnvVar::FromService { key, reference }
        } else if generated {
            EnvVar::Generated { key }
        } else {
            EnvVar::Secret { key }
        };
        Some(var)
    }
}

/// What a wire service decodes into, decided by its `type` and `runtime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Web,
    StaticSite,
    Worker,
    PrivateService,
    Cron,
    KeyValue,
}

const DEPLOY_KEYS: &[&str] = &[
    "plan",
    "region",
    "previews",
    "previewPlan",
    "buildCommand",
    "startCommand",
    "preDeployCommand",
    "repo",
    "branch",
    "autoDeploy",
    "maxShutdownDelaySeconds",
    "numInstances",
    "scaling",
    "dockerCommand",
    "dockerfilePath",
    "dockerContext",
    "image",
    "registryCredential",
    "buildFilter",
    "rootDir",
    "disk",
];

const STATIC_SITE_KEYS: &[&str] = &[
    "repo",
    "branch",
    "rootDir",
    "buildCommand",
    "autoDeploy",
    "buildFilter",
    "domains",
    "headers",
    "routes",
    "previews",
    "staticPublishPath",
];

const KEY_VALUE_KEYS: &[&str] = &[
    "plan",
    "region",
    "ipAllowList",
    "maxmemoryPolicy",
    "previews",
    "previewPlan",
];

impl Shape {
    fn of(service_type: ServiceType, runtime: Option<Runtime>) -> Option<Shape> {
        let shape = match (service_type, runtime) {
            (ServiceType::KeyValue, _) => Shape::KeyValue,
            (_, None) => return None,
            (ServiceType::Web, Some(Runtime::Static)) => Shape::StaticSite,
            (ServiceType::Web, Some(_)) => Shape::Web,
            (ServiceType::Worker, Some(_)) => Shape::Worker,
            (ServiceType::PrivateService, Some(_)) => Shape::PrivateService,
            (ServiceType::Cron, Some(_)) => Shape::Cron,
        };
        Some(shape)
    }

    fn label(self) -> &'static str {
        match self {
            Shape::Web => "web",
            Shape::StaticSite => "static site",
            Shape::Worker => "worker",
            Shape::PrivateService => "pserv",
            Shape::Cron => "cron",
            Shape::KeyValue => "keyvalue",
        }
    }

    fn allows(self, key: &str) -> bool {
        match self {
            Shape::Web => {
                DEPLOY_KEYS.contains(&key) || key == "domains" || key == "healthCheckPath"
            }
            Shape::Worker | Shape::PrivateService => DEPLOY_KEYS.contains(&key),
            Shape::Cron => DEPLOY_KEYS.contains(&key) || key == "schedule",
            Shape::StaticSite => STATIC_SITE_KEYS.contains(&key),
            Shape::KeyValue => KEY_VALUE_KEYS.contains(&key),
        }
    }
}

impl RawService {
    fn lift(self, defects: &mut Vec<String>) -> Option<Service> {
        let name = self.name.clone();
        let before = defects.len();
        let env_vars = lift_env_vars(self.env_vars.clone(), defects);

        let service_type = match self.service_type.as_deref() {
            None | Some("") => {
                defects.push(format!("service {name} missing type"));
                None
            }
            Some(tag) => {
                let parsed = ServiceType::from_tag(tag);
                if parsed.is_none() {
                    defects.push(format!("service {name} has unknown type {tag}"));
                }
                parsed
            }
        };
        if service_type != Some(ServiceType::KeyValue) && self.runtime.is_none() {
            defects.push(format!("service {name} missing runtime"));
        }
        if service_type == Some(ServiceType::Cron) && self.schedule.is_none() {
            defects.push(format!("cron job {name} missing schedule"));
        }
        let shape = service_type.and_then(|t| Shape::of(t, self.runtime));
        if let Some(shape) = shape {
            self.check_shape(shape, defects);
        }
        if defects.len() > before {
            return None;
        }

        let runtime = self.runtime;
        let kind = match shape? {
            Shape::KeyValue => ServiceKind::KeyValue(self.key_value()),
            Shape::StaticSite => ServiceKind::StaticSite(self.static_site()),
            Shape::Web => ServiceKind::Web(WebService {
                domains: self.domains.clone(),
                health_check_path: self.health_check_path.clone(),
                deploy: self.deploy(runtime?),
            }),
            Shape::Worker => ServiceKind::Worker(self.deploy(runtime?)),
            Shape::PrivateService => ServiceKind::PrivateService(self.deploy(runtime?)),
            Shape::Cron => ServiceKind::Cron(CronJob {
                schedule: self.schedule.clone().unwrap_or_default(),
                deploy: self.deploy(runtime?),
            }),
        };
        Some(Service {
            name,
            env_vars,
            kind,
        })
    }

    /// Reports every key the decoded kind has no place for, so nothing in
    /// the manifest is dropped silently.
    fn check_shape(&self, shape: Shape, defects: &mut Vec<String>) {
        let name = &self.name;
        let label = shape.label();
        match (shape, self.runtime) {
            (Shape::StaticSite, _) if self.static_publish_path.is_none() => {
                defects.push(format!("service {name} missing staticPublishPath"));
            }
            (Shape::KeyValue, Some(_)) => {
                defects.push(format!("service {name}: runtime not allowed for {label}"));
            }
            (Shape::Worker | Shape::PrivateService | Shape::Cron, Some(Runtime::Static)) => {
                defects.push(format!("service {name}: runtime static not allowed for {label}"));
            }
            _ => {}
        }
        for key in self.set_keys() {
            if !shape.allows(key) {
                defects.push(format!("service {name}: {key} not allowed for {label}"));
            }
        }
    }

    /// Wire keys carrying a value, in manifest order.
    fn set_keys(&self) -> impl Iterator<Item = &'static str> {
        [
            ("plan", self.plan.is_some()),
            ("previews", self.previews.is_some()),
            ("previewPlan", self.preview_plan.is_some()),
            ("buildCommand", self.build_command.is_some()),
            ("startCommand", self.start_command.is_some()),
            ("preDeployCommand", self.pre_deploy_command.is_some()),
            ("repo", self.repo.is_some()),
            ("branch", self.branch.is_some()),
            ("autoDeploy", self.auto_deploy.is_some()),
            ("maxShutdownDelaySeconds", self.max_shutdown_delay_seconds.is_some()),
            ("domains", !self.domains.is_empty()),
            ("region", self.region.is_some()),
            ("numInstances", self.num_instances.is_some()),
            ("scaling", self.scaling.is_some()),
            ("dockerCommand", self.docker_command.is_some()),
            ("dockerfilePath", self.dockerfile_path.is_some()),
            ("dockerContext", self.docker_context.is_some()),
            ("image", self.image.is_some()),
            ("registryCredential", self.registry_credential.is_some()),
            ("buildFilter", self.build_filter.is_some()),
            ("rootDir", self.root_dir.is_some()),
            ("disk", self.disk.is_some()),
            ("staticPublishPath", self.static_publish_path.is_some()),
            ("headers", !self.headers.is_empty()),
            ("routes", !self.routes.is_empty()),
            ("schedule", self.schedule.is_some()),
            ("ipAllowList", self.ip_allow_list.is_some()),
            ("maxmemoryPolicy", self.max_memory_policy.is_some()),
            ("healthCheckPath", self.health_check_path.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, set)| set.then_some(key))
    }

    fn deploy(&self, runtime: Runtime) -> DeployConfig {
        let has_docker = self.docker_command.is_some()
            || self.dockerfile_path.is_some()
            || self.docker_context.is_some()
            || self.image.is_some()
            || self.registry_credential.is_some();
        DeployConfig {
            runtime,
            plan: self.plan,
            region: self.region,
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            root_dir: self.root_dir.clone(),
            build_command: self.build_command.clone(),
            start_command: self.start_command.clone(),
            pre_deploy_command: self.pre_deploy_command.clone(),
            auto_deploy: self.auto_deploy,
            build_filter: self.build_filter.clone(),
            docker: has_docker.then(|| DockerConfig {
                docker_command: self.docker_command.clone(),
                dockerfile_path: self.dockerfile_path.clone(),
                docker_context: self.docker_context.clone(),
                image: self.image.clone(),
                registry_credential: self.registry_credential.clone(),
            }),
            num_instances: self.num_instances,
            scaling: self.scaling,
            disk: self.disk.clone(),
            previews: self.previews,
            preview_plan: self.preview_plan,
            max_shutdown_delay_seconds: self.max_shutdown_delay_seconds,
        }
    }

    fn static_site(&self) -> StaticSite {
        StaticSite {
            static_publish_path: self.static_publish_path.clone().unwrap_or_default(),
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            root_dir: self.root_dir.clone(),
            build_command: self.build_command.clone(),
            auto_deploy: self.auto_deploy,
            build_filter: self.build_filter.clone(),
            domains: self.domains.clone(),
            headers: self.headers.clone(),
            routes: self.routes.clone(),
            previews: self.previews,
        }
    }

    fn key_value(&self) -> KeyValueStore {
        KeyValueStore {
            plan: self.plan,
            region: self.region,
            ip_allow_list: self.ip_allow_list.clone().unwrap_or_default(),
            max_memory_policy: self.max_memory_policy,
            previews: self.previews,
            preview_plan: self.preview_plan,
        }
    }
}
