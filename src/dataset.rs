// @file dataset.rs
// @brief per-party result records and the sources they are fetched from

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct ResultRecord {
    pub region_name: String,
    pub percentage: f64,
}

impl ResultRecord {
    pub fn new(region_name: &str, percentage: f64) -> ResultRecord {
        ResultRecord {
            region_name: region_name.to_string(),
            percentage,
        }
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}%", self.region_name, self.percentage)
    }
}

// wire form of one element of the results array
#[derive(Deserialize)]
struct RawRecord {
    constituency_name: String,
    votes_percentage: f64,
}

/// Records of one party, in payload order. `skipped` counts elements that could not be
/// decoded and were left out.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub records: Vec<ResultRecord>,
    pub skipped: usize,
}

impl Dataset {
    pub fn new(records: Vec<ResultRecord>) -> Dataset {
        Dataset { records, skipped: 0 }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest percentage in the dataset, never below zero; zero when empty.
    pub fn max_percentage(&self) -> f64 {
        self.records
            .iter()
            .map(|r| r.percentage)
            .filter(|p| p.is_finite())
            .fold(0.0, f64::max)
    }
}

/// Decodes a results payload. The payload itself must be a JSON array; a bad element
/// only costs that element.
pub fn parse_dataset(json: &str) -> Result<Dataset> {
    let value: Value = serde_json::from_str(json).context("failed to parse results payload")?;
    let Value::Array(elems) = value else {
        return Err(anyhow!("results payload is not an array"));
    };

    let mut dataset = Dataset::default();
    for (i, elem) in elems.into_iter().enumerate() {
        match RawRecord::deserialize(elem) {
            Ok(raw) => dataset.records.push(ResultRecord {
                region_name: raw.constituency_name,
                percentage: raw.votes_percentage,
            }),
            Err(e) => {
                log::warn!("skip malformed record #{i}: {e}");
                dataset.skipped += 1;
            }
        }
    }
    log::debug!("decoded {} records ({} skipped)", dataset.len(), dataset.skipped);
    Ok(dataset)
}

/// Where result datasets come from, one per party slug.
pub trait DataSource {
    fn fetch(&self, slug: &str) -> Result<Dataset>;
}

/// Reads `<dir>/<slug>_mock_data.json`.
#[derive(Clone, Debug)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> JsonDirSource {
        JsonDirSource { dir: dir.into() }
    }

    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}_mock_data.json"))
    }
}

impl DataSource for JsonDirSource {
    fn fetch(&self, slug: &str) -> Result<Dataset> {
        let path = self.path_for(slug);
        log::info!("loading results from {}", path.display());
        let json = std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
        parse_dataset(&json).with_context(|| format!("in {}", path.display()))
    }
}
