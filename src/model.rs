use crate::env::EnvVar;
use crate::service::Service;
use serde::{Deserialize, Serialize};

// --- Enum catalog ---

/// The `type` tag a service carries in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "web")]
    Web,
    #[serde(rename = "worker")]
    Worker,
    #[serde(rename = "pserv")]
    PrivateService,
    #[serde(rename = "cron")]
    Cron,
    #[serde(rename = "keyvalue", alias = "redis")]
    KeyValue,
}

impl ServiceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Web => "web",
            ServiceType::Worker => "worker",
            ServiceType::PrivateService => "pserv",
            ServiceType::Cron => "cron",
            ServiceType::KeyValue => "keyvalue",
        }
    }

    /// Parses a manifest tag. `redis` is the deprecated spelling of `keyvalue`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "web" => Some(ServiceType::Web),
            "worker" => Some(ServiceType::Worker),
            "pserv" => Some(ServiceType::PrivateService),
            "cron" => Some(ServiceType::Cron),
            "keyvalue" | "redis" => Some(ServiceType::KeyValue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Node,
    Python,
    Ruby,
    Go,
    Rust,
    Docker,
    Static,
    Image,
}

/// Instance plans for services, databases and key-value stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plan {
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "starter")]
    Starter,
    #[serde(rename = "standard")]
    Standard,
    #[serde(rename = "standard-2x")]
    Standard2x,
    #[serde(rename = "standard-4x")]
    Standard4x,
    #[serde(rename = "pro")]
    Pro,
    #[serde(rename = "pro-2x")]
    Pro2x,
    #[serde(rename = "pro-4x")]
    Pro4x,
    #[serde(rename = "pro-max")]
    ProMax,
    #[serde(rename = "basic-256mb")]
    Basic256Mb,
    #[serde(rename = "basic-1gb")]
    Basic1Gb,
    #[serde(rename = "basic-4gb")]
    Basic4Gb,
    #[serde(rename = "pro-8gb")]
    Pro8Gb,
    #[serde(rename = "pro-16gb")]
    Pro16Gb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Oregon,
    Virginia,
    Frankfurt,
    Singapore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewGeneration {
    Automatic,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    Redirect,
    Rewrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaxMemoryPolicy {
    AllkeysLru,
    AllkeysRandom,
    VolatileLru,
    VolatileRandom,
    VolatileTtl,
    Noeviction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatabaseProperty {
    ConnectionString,
    InternalConnectionString,
    Host,
    Port,
    User,
    Password,
    Database,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceProperty {
    Host,
    Port,
    HostPort,
    ConnectionString,
    InternalConnectionString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostgresVersion {
    #[serde(rename = "13")]
    V13,
    #[serde(rename = "14")]
    V14,
    #[serde(rename = "15")]
    V15,
    #[serde(rename = "16")]
    V16,
}

// --- Document ---

/// A blueprint: the root aggregate of a `render.yaml` manifest.
///
/// Names are unique per collection kind. A service and a database may share
/// a name; two services may not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blueprint {
    pub services: Vec<Service>,
    pub databases: Vec<Database>,
    pub env_var_groups: Vec<EnvVarGroup>,
    pub previews: Option<Previews>,
    pub previews_expire_after_days: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Previews {
    pub generation: PreviewGeneration,
}

/// A named, reusable set of environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVarGroup {
    pub name: String,
    pub env_vars: Vec<EnvVar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReplica {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighAvailability {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAllow {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IpAllow {
    pub fn new(source: impl Into<String>) -> Self {
        IpAllow {
            source: source.into(),
            description: None,
        }
    }

    pub fn described(source: impl Into<String>, description: impl Into<String>) -> Self {
        IpAllow {
            source: source.into(),
            description: Some(description.into()),
        }
    }

    /// The allow-list entry that opens access to every address.
    pub fn public() -> Self {
        IpAllow::described("0.0.0.0/0", "public access")
    }
}

/// A managed PostgreSQL database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_plan: Option<Plan>,
    #[serde(
        rename = "diskSizeGB",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub disk_size_gb: Option<u32>,
    #[serde(
        rename = "previewDiskSizeGB",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub preview_disk_size_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgres_major_version: Option<PostgresVersion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// `Some(vec![])` blocks every external connection; `None` leaves the
    /// platform default in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_allow_list: Option<Vec<IpAllow>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read_replicas: Vec<ReadReplica>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_availability: Option<HighAvailability>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Database {
            name: name.into(),
            ..Database::default()
        }
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn with_preview_plan(mut self, plan: Plan) -> Self {
        self.preview_plan = Some(plan);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_postgres(mut self, version: PostgresVersion) -> Self {
        self.postgres_major_version = Some(version);
        self
    }

    /// Sets the name of the database inside the PostgreSQL instance, which
    /// may differ from the resource name.
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = Some(name.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_disk_size(mut self, size_gb: u32) -> Self {
        self.disk_size_gb = Some(size_gb);
        self
    }

    pub fn with_preview_disk_size(mut self, size_gb: u32) -> Self {
        self.preview_disk_size_gb = Some(size_gb);
        self
    }

    pub fn with_ip_allow_list(mut self, entries: impl IntoIterator<Item = IpAllow>) -> Self {
        self.ip_allow_list
            .get_or_insert_with(Vec::new)
            .extend(entries);
        self
    }

    pub fn with_public_access(self) -> Self {
        self.with_ip_allow_list([IpAllow::public()])
    }

    pub fn with_private_access(mut self) -> Self {
        self.ip_allow_list = Some(Vec::new());
        self
    }

    pub fn with_read_replicas<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.read_replicas
            .extend(names.into_iter().map(|name| ReadReplica { name: name.into() }));
        self
    }

    pub fn with_high_availability(mut self) -> Self {
        self.high_availability = Some(HighAvailability { enabled: true });
        self
    }
}

impl EnvVarGroup {
    pub fn new(name: impl Into<String>) -> Self {
        EnvVarGroup {
            name: name.into(),
            env_vars: Vec::new(),
        }
    }

    pub fn with_env_vars(mut self, env_vars: impl IntoIterator<Item = EnvVar>) -> Self {
        self.env_vars.extend(env_vars);
        self
    }

    pub fn with_env(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_env_vars([EnvVar::literal(key, value)])
    }

    pub fn with_secret(self, key: impl Into<String>) -> Self {
        self.with_env_vars([EnvVar::secret(key)])
    }

    pub fn with_generated(self, key: impl Into<String>) -> Self {
        self.with_env_vars([EnvVar::generated(key)])
    }
}

impl Blueprint {
    pub fn new() -> Self {
        Blueprint::default()
    }

    pub fn with_services(mut self, services: impl IntoIterator<Item = Service>) -> Self {
        self.services.extend(services);
        self
    }

    pub fn with_databases(mut self, databases: impl IntoIterator<Item = Database>) -> Self {
        self.databases.extend(databases);
        self
    }

    pub fn with_env_var_groups(mut self, groups: impl IntoIterator<Item = EnvVarGroup>) -> Self {
        self.env_var_groups.extend(groups);
        self
    }

    pub fn with_previews(
        mut self,
        generation: PreviewGeneration,
        expire_after_days: Option<u32>,
    ) -> Self {
        self.previews = Some(Previews { generation });
        if expire_after_days.is_some() {
            self.previews_expire_after_days = expire_after_days;
        }
        self
    }
}
