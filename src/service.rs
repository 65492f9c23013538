use crate::env::EnvVar;
use crate::model::{IpAllow, MaxMemoryPolicy, Plan, PreviewGeneration, Region, RouteType, Runtime, ServiceType};
use serde::{Deserialize, Serialize};

/// A deployable unit in a blueprint.
///
/// The name and environment are common to every kind; everything else lives
/// in the kind payload, so a field that only makes sense for one kind cannot
/// be set on another.
#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    pub env_vars: Vec<EnvVar>,
    pub kind: ServiceKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServiceKind {
    Web(WebService),
    Worker(DeployConfig),
    PrivateService(DeployConfig),
    Cron(CronJob),
    StaticSite(StaticSite),
    KeyValue(KeyValueStore),
}

impl ServiceKind {
    /// The manifest `type` tag. Static sites are published as `web`.
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceKind::Web(_) | ServiceKind::StaticSite(_) => ServiceType::Web,
            ServiceKind::Worker(_) => ServiceType::Worker,
            ServiceKind::PrivateService(_) => ServiceType::PrivateService,
            ServiceKind::Cron(_) => ServiceType::Cron,
            ServiceKind::KeyValue(_) => ServiceType::KeyValue,
        }
    }

    pub fn runtime(&self) -> Option<Runtime> {
        match self {
            ServiceKind::Web(web) => Some(web.deploy.runtime),
            ServiceKind::Worker(deploy) | ServiceKind::PrivateService(deploy) => Some(deploy.runtime),
            ServiceKind::Cron(cron) => Some(cron.deploy.runtime),
            ServiceKind::StaticSite(_) => Some(Runtime::Static),
            ServiceKind::KeyValue(_) => None,
        }
    }
}

impl Service {
    pub fn new(name: impl Into<String>, kind: ServiceKind) -> Self {
        Service {
            name: name.into(),
            env_vars: Vec::new(),
            kind,
        }
    }

    pub fn web(name: impl Into<String>, web: WebService) -> Self {
        Service::new(name, ServiceKind::Web(web))
    }

    pub fn worker(name: impl Into<String>, deploy: DeployConfig) -> Self {
        Service::new(name, ServiceKind::Worker(deploy))
    }

    pub fn private_service(name: impl Into<String>, deploy: DeployConfig) -> Self {
        Service::new(name, ServiceKind::PrivateService(deploy))
    }

    pub fn cron(name: impl Into<String>, cron: CronJob) -> Self {
        Service::new(name, ServiceKind::Cron(cron))
    }

    pub fn static_site(name: impl Into<String>, site: StaticSite) -> Self {
        Service::new(name, ServiceKind::StaticSite(site))
    }

    pub fn key_value(name: impl Into<String>, store: KeyValueStore) -> Self {
        Service::new(name, ServiceKind::KeyValue(store))
    }

    pub fn service_type(&self) -> ServiceType {
        self.kind.service_type()
    }

    pub fn with_env_vars(mut self, env_vars: impl IntoIterator<Item = EnvVar>) -> Self {
        self.env_vars.extend(env_vars);
        self
    }

    pub fn with_env_var(self, env_var: EnvVar) -> Self {
        self.with_env_vars([env_var])
    }

    pub fn with_env(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_env_var(EnvVar::literal(key, value))
    }
}

// --- Kind payloads ---

/// Settings shared by every kind that builds and runs code.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployConfig {
    pub runtime: Runtime,
    pub plan: Option<Plan>,
    pub region: Option<Region>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub root_dir: Option<String>,
    pub build_command: Option<String>,
    pub start_command: Option<String>,
    pub pre_deploy_command: Option<String>,
    pub auto_deploy: Option<bool>,
    pub build_filter: Option<BuildFilter>,
    pub docker: Option<DockerConfig>,
    pub num_instances: Option<u32>,
    pub scaling: Option<Scaling>,
    pub disk: Option<Disk>,
    pub previews: Option<ServicePreviews>,
    pub preview_plan: Option<Plan>,
    pub max_shutdown_delay_seconds: Option<u32>,
}

impl DeployConfig {
    pub fn new(runtime: Runtime) -> Self {
        DeployConfig {
            runtime,
            plan: None,
            region: None,
            repo: None,
            branch: None,
            root_dir: None,
            build_command: None,
            start_command: None,
            pre_deploy_command: None,
            auto_deploy: None,
            build_filter: None,
            docker: None,
            num_instances: None,
            scaling: None,
            disk: None,
            previews: None,
            preview_plan: None,
            max_shutdown_delay_seconds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebService {
    pub deploy: DeployConfig,
    pub domains: Vec<String>,
    pub health_check_path: Option<String>,
}

impl WebService {
    pub fn new(runtime: Runtime) -> Self {
        WebService {
            deploy: DeployConfig::new(runtime),
            domains: Vec::new(),
            health_check_path: None,
        }
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains.extend(domains.into_iter().map(Into::into));
        self
    }

    pub fn with_health_check(mut self, path: impl Into<String>) -> Self {
        self.health_check_path = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CronJob {
    pub deploy: DeployConfig,
    /// Cron expression, e.g. `0 2 * * *`.
    pub schedule: String,
}

impl CronJob {
    pub fn new(runtime: Runtime, schedule: impl Into<String>) -> Self {
        CronJob {
            deploy: DeployConfig::new(runtime),
            schedule: schedule.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticSite {
    pub static_publish_path: String,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub root_dir: Option<String>,
    pub build_command: Option<String>,
    pub auto_deploy: Option<bool>,
    pub build_filter: Option<BuildFilter>,
    pub domains: Vec<String>,
    pub headers: Vec<Header>,
    pub routes: Vec<Route>,
    pub previews: Option<ServicePreviews>,
}

impl StaticSite {
    pub fn new(publish_path: impl Into<String>) -> Self {
        StaticSite {
            static_publish_path: publish_path.into(),
            ..StaticSite::default()
        }
    }

    pub fn with_git(mut self, repo: impl Into<String>, branch: Option<&str>) -> Self {
        self.repo = Some(repo.into());
        self.branch = branch.map(str::to_string);
        self
    }

    pub fn with_build(mut self, command: impl Into<String>) -> Self {
        self.build_command = Some(command.into());
        self
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains.extend(domains.into_iter().map(Into::into));
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = Header>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn with_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValueStore {
    pub plan: Option<Plan>,
    pub region: Option<Region>,
    pub ip_allow_list: Vec<IpAllow>,
    pub max_memory_policy: Option<MaxMemoryPolicy>,
    pub previews: Option<ServicePreviews>,
    pub preview_plan: Option<Plan>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        KeyValueStore::default()
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_ip_allow_list(mut self, entries: impl IntoIterator<Item = IpAllow>) -> Self {
        self.ip_allow_list.extend(entries);
        self
    }

    pub fn with_public_access(self) -> Self {
        self.with_ip_allow_list([IpAllow::public()])
    }

    pub fn with_max_memory_policy(mut self, policy: MaxMemoryPolicy) -> Self {
        self.max_memory_policy = Some(policy);
        self
    }
}

/// Builder methods shared by every runtime-bearing payload.
pub trait Deployable: Sized {
    fn deploy_mut(&mut self) -> &mut DeployConfig;

    fn with_plan(mut self, plan: Plan) -> Self {
        self.deploy_mut().plan = Some(plan);
        self
    }

    fn with_region(mut self, region: Region) -> Self {
        self.deploy_mut().region = Some(region);
        self
    }

    fn with_git(mut self, repo: impl Into<String>, branch: Option<&str>) -> Self {
        let deploy = self.deploy_mut();
        deploy.repo = Some(repo.into());
        deploy.branch = branch.map(str::to_string);
        self
    }

    fn with_root_dir(mut self, dir: impl Into<String>) -> Self {
        self.deploy_mut().root_dir = Some(dir.into());
        self
    }

    fn with_build(mut self, command: impl Into<String>) -> Self {
        self.deploy_mut().build_command = Some(command.into());
        self
    }

    fn with_start_command(mut self, command: impl Into<String>) -> Self {
        self.deploy_mut().start_command = Some(command.into());
        self
    }

    fn with_pre_deploy(mut self, command: impl Into<String>) -> Self {
        self.deploy_mut().pre_deploy_command = Some(command.into());
        self
    }

    fn with_auto_deploy(mut self, enabled: bool) -> Self {
        self.deploy_mut().auto_deploy = Some(enabled);
        self
    }

    fn with_build_filter(mut self, filter: BuildFilter) -> Self {
        self.deploy_mut().build_filter = Some(filter);
        self
    }

    fn with_docker(mut self, docker: DockerConfig) -> Self {
        self.deploy_mut().docker = Some(docker);
        self
    }

    /// Builds from a Dockerfile. Switches the runtime to `docker`.
    fn with_dockerfile(mut self, path: impl Into<String>, context: Option<&str>) -> Self {
        let deploy = self.deploy_mut();
        deploy.runtime = Runtime::Docker;
        let docker = deploy.docker.get_or_insert_with(DockerConfig::default);
        docker.dockerfile_path = Some(path.into());
        docker.docker_context = context.map(str::to_string);
        self
    }

    /// Deploys a prebuilt image. Switches the runtime to `image`.
    fn with_docker_image(mut self, url: impl Into<String>) -> Self {
        let deploy = self.deploy_mut();
        deploy.runtime = Runtime::Image;
        deploy.docker.get_or_insert_with(DockerConfig::default).image = Some(DockerImage {
            url: url.into(),
            credentials: None,
        });
        self
    }

    fn with_instances(mut self, num_instances: u32) -> Self {
        self.deploy_mut().num_instances = Some(num_instances);
        self
    }

    fn with_autoscaling(mut self, min: u32, max: u32, target_cpu_percent: Option<u32>) -> Self {
        self.deploy_mut().scaling = Some(Scaling {
            min_instances: Some(min),
            max_instances: Some(max),
            target_memory_percent: None,
            target_cpu_percent,
        });
        self
    }

    fn with_disk(mut self, name: impl Into<String>, mount_path: impl Into<String>, size_gb: Option<u32>) -> Self {
        self.deploy_mut().disk = Some(Disk {
            name: name.into(),
            mount_path: mount_path.into(),
            size_gb,
        });
        self
    }

    fn with_previews(mut self, generation: PreviewGeneration, plan: Option<Plan>) -> Self {
        let deploy = self.deploy_mut();
        deploy.previews = Some(ServicePreviews { generation });
        deploy.preview_plan = plan;
        self
    }

    fn with_max_shutdown_delay(mut self, seconds: u32) -> Self {
        self.deploy_mut().max_shutdown_delay_seconds = Some(seconds);
        self
    }
}

impl Deployable for DeployConfig {
    fn deploy_mut(&mut self) -> &mut DeployConfig {
        self
    }
}

impl Deployable for WebService {
    fn deploy_mut(&mut self) -> &mut DeployConfig {
        &mut self.deploy
    }
}

impl Deployable for CronJob {
    fn deploy_mut(&mut self) -> &mut DeployConfig {
        &mut self.deploy
    }
}

// --- Shared leaf records ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerConfig {
    pub docker_command: Option<String>,
    pub dockerfile_path: Option<String>,
    pub docker_context: Option<String>,
    pub image: Option<DockerImage>,
    pub registry_credential: Option<RegistryCredential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<RegistryCredential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryCredential {
    pub from_registry_creds: RegistryCredsRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCredsRef {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scaling {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_memory_percent: Option<u32>,
    #[serde(rename = "targetCPUPercent", default, skip_serializing_if = "Option::is_none")]
    pub target_cpu_percent: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    pub name: String,
    pub mount_path: String,
    #[serde(rename = "sizeGB", default, skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub path: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "type")]
    pub route_type: RouteType,
    pub source: String,
    pub destination: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePreviews {
    pub generation: PreviewGeneration,
}
