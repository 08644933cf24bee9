use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml_bw as serde_yaml;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilityDocError {
    #[error("failed to read {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        source: serde_yaml::Error,
        path: PathBuf,
    },
}

/// Documented gaps between the mock and a real cluster.
#[derive(Debug, Deserialize)]
pub struct CapabilityDoc {
    pub mock_version: String,
    pub downgrades: Vec<Downgrade>,
    #[serde(default)]
    pub version_gated: Vec<VersionGate>,
}

#[derive(Debug, Deserialize)]
pub struct Downgrade {
    pub feature: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct VersionGate {
    pub feature: String,
    pub min_mock_version: String,
}

impl CapabilityDoc {
    pub fn downgraded_features(&self) -> BTreeSet<String> {
        self.downgrades.iter().map(|d| d.feature.clone()).collect()
    }
}

pub fn load_capabilities(path: &Path) -> Result<CapabilityDoc, CapabilityDocError> {
    let data = fs::read_to_string(path).map_err(|source| CapabilityDocError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    serde_yaml::from_str(&data).map_err(|source| CapabilityDocError::Parse {
        source,
        path: path.to_path_buf(),
    })
}

pub fn capabilities_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("capabilities")
        .join("mock.yaml")
}
