use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::info;

use crate::client::Collection;
use crate::error::TestClusterError;

pub const BREWERY_DATASET: &str = "beer_sample_brewery_five";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreweryGeo {
    pub accuracy: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreweryDocument {
    pub name: String,
    pub city: String,
    pub state: String,
    pub code: String,
    pub country: String,
    pub phone: String,
    pub website: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub updated: String,
    pub description: String,
    pub address: Vec<String>,
    pub geo: BreweryGeo,
}

/// Load `testdata/<name>.json`.
pub fn load_json_dataset<T: DeserializeOwned>(name: &str) -> Result<T> {
    load_json_file(&testdata_root().join(format!("{name}.json")))
}

pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("invalid JSON in dataset {}", path.display()))
}

/// Seed `collection` with the five-brewery sample, keyed by brewery name.
pub async fn create_brewery_dataset<C: Collection>(
    collection: &C,
) -> Result<usize, TestClusterError> {
    let dataset: Vec<BreweryDocument> = load_json_dataset(BREWERY_DATASET)
        .map_err(|err| TestClusterError::setup("could not read test dataset", err))?;
    seed_collection(collection, &dataset).await
}

pub async fn seed_collection<C: Collection>(
    collection: &C,
    dataset: &[BreweryDocument],
) -> Result<usize, TestClusterError> {
    for doc in dataset {
        let value = serde_json::to_value(doc)
            .map_err(|err| TestClusterError::setup("could not encode dataset document", err))?;
        collection
            .upsert(&doc.name, value)
            .await
            .map_err(|err| TestClusterError::setup("could not create dataset", err))?;
    }
    info!(
        collection = collection.name(),
        documents = dataset.len(),
        "seeded dataset"
    );
    Ok(dataset.len())
}

fn testdata_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}
