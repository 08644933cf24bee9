use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::flags::FeatureFlags;
use crate::mock::bundled_mock_version;
use crate::resolver::FeatureResolver;
use crate::version::NodeVersion;

pub static APP_NAME: &str = "testcluster";
pub static ENV_PREFIX: &str = "TESTCLUSTER_";
pub const DEFAULT_SERVER_VERSION: &str = "5.1.0";
static DEFAULT_CONFIG: Lazy<TestConfig> = Lazy::new(TestConfig::default);

/// Suite-level settings. An empty `server` selects the mock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    #[serde(default)]
    pub server: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default, deserialize_with = "deserialize_version")]
    pub version: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub disable_logger: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            user: default_user(),
            password: default_password(),
            bucket: default_bucket(),
            version: None,
            collection: None,
            features: String::new(),
            disable_logger: false,
        }
    }
}

/// Unquoted releases such as `version = 7.0` arrive as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Text(String),
    Int(u64),
    Float(f64),
}

fn deserialize_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<RawVersion>::deserialize(deserializer)?.map(|raw| match raw {
            RawVersion::Text(text) => text,
            RawVersion::Int(major) => major.to_string(),
            RawVersion::Float(release) => release.to_string(),
        }),
    )
}

fn default_user() -> String {
    "Administrator".into()
}

fn default_password() -> String {
    "password".into()
}

fn default_bucket() -> String {
    "default".into()
}

impl TestConfig {
    /// Defaults, then a TOML file, then `TESTCLUSTER_*` environment variables.
    pub fn load(explicit_path: Option<&Utf8Path>) -> Result<Self> {
        Self::figment(explicit_path)
            .extract()
            .context("failed to load testcluster configuration")
    }

    pub fn figment(explicit_path: Option<&Utf8Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(DEFAULT_CONFIG.clone()));

        if let Some(path) = explicit_path {
            figment = figment.merge(Toml::file(path));
        } else if let Some(path) = resolve_default_config_path() {
            figment = figment.merge(Toml::file(path));
        } else {
            warn!("no config file found; relying on defaults + env overrides");
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["version"]));

        // Taken verbatim so "7.10" is not read as the float 7.1.
        match std::env::var(format!("{ENV_PREFIX}VERSION")) {
            Ok(raw) => figment.merge(Serialized::default("version", raw)),
            Err(_) => figment,
        }
    }

    pub fn is_mock(&self) -> bool {
        self.server.trim().is_empty()
    }

    pub fn feature_flags(&self) -> Result<FeatureFlags> {
        self.features
            .parse()
            .with_context(|| format!("invalid features setting {:?}", self.features))
    }

    /// Version of the real cluster under test, defaulting when unset.
    pub fn server_version(&self) -> Result<NodeVersion> {
        let raw = self
            .version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_SERVER_VERSION);
        raw.parse()
            .with_context(|| format!("invalid server version {raw:?}"))
    }

    /// Build the resolver for this configuration. In mock mode the version is
    /// the mock's own and the configured `version` is ignored.
    pub fn resolver(&self) -> Result<FeatureResolver> {
        self.resolver_for_mode(self.is_mock())
    }

    pub fn resolver_for_mode(&self, mock: bool) -> Result<FeatureResolver> {
        let version = if mock {
            bundled_mock_version().context("mock reported an invalid version")?
        } else {
            self.server_version()?
        };
        Ok(FeatureResolver::new(version, self.feature_flags()?))
    }
}

fn workspace_root() -> &'static Utf8Path {
    static ROOT: Lazy<Utf8PathBuf> = Lazy::new(|| {
        let manifest_dir = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        manifest_dir
            .parent()
            .and_then(|p| p.parent())
            .map(Utf8PathBuf::from)
            .unwrap_or(manifest_dir)
    });
    ROOT.as_path()
}

fn resolve_default_config_path() -> Option<Utf8PathBuf> {
    let repo_relative = workspace_root().join("config/testcluster.toml");
    if repo_relative.exists() {
        return Some(repo_relative);
    }

    if let Some(dirs) = ProjectDirs::from("io", "TestCluster", APP_NAME)
        && let Ok(path) = Utf8PathBuf::from_path_buf(dirs.config_dir().join("config.toml"))
        && path.exists()
    {
        return Some(path);
    }

    None
}
