mod raw;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, instrument};

use self::raw::RawBatch;
use crate::kubernetes_objects::job::JobDescriptor;

pub use self::raw::BatchParseError;

/// Batch submitted when no `--batch` file is given.
pub const EMBEDDED_BATCH: &str = r#"
{
    "batchJob1": [
        {
            "jobName": "job1",
            "image": "docker_img_1",
            "requestMem": "500Mi",
            "requestCpu": "200m"
        },
        {
            "jobName": "job2",
            "image": "docker_img_2",
            "requestMem": "1Gi",
            "requestCpu": "100m"
        },
        {
            "jobName": "job3",
            "image": "docker_img_3",
            "requestMem": "2Gi",
            "requestCpu": "200m"
        }
    ]
}
"#;

/// Where the job list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    Embedded,
    File(PathBuf),
}

/// Ordered, validated list of jobs. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    jobs: Vec<JobDescriptor>,
}

#[derive(Error, Debug)]
pub enum BatchLoadError {
    #[error("Malformed input: cannot read batch file '{0}': {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Malformed input: batch is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed input: batch is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Malformed input: {0}")]
    Invalid(#[from] BatchParseError),
}

impl Batch {
    pub fn embedded() -> Result<Batch, BatchLoadError> {
        Batch::from_json(EMBEDDED_BATCH)
    }

    pub fn from_json(document: &str) -> Result<Batch, BatchLoadError> {
        let raw: RawBatch = serde_json::from_str(document)?;
        Ok(Batch::try_from(raw)?)
    }

    pub fn from_yaml(document: &str) -> Result<Batch, BatchLoadError> {
        let raw: RawBatch = serde_yaml::from_str(document)?;
        Ok(Batch::try_from(raw)?)
    }

    /// Reads a batch file; `.yaml`/`.yml` files are YAML, anything else JSON.
    pub async fn from_file(path: &Path) -> Result<Batch, BatchLoadError> {
        let document = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BatchLoadError::Read(path.to_path_buf(), e))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Batch::from_yaml(&document),
            _ => Batch::from_json(&document),
        }
    }

    pub fn jobs(&self) -> &[JobDescriptor] {
        &self.jobs
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.jobs.iter().map(|job| job.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[instrument("load_batch")]
pub async fn load_batch(source: &BatchSource) -> Result<Batch, BatchLoadError> {
    let batch = match source {
        BatchSource::Embedded => Batch::embedded()?,
        BatchSource::File(path) => Batch::from_file(path).await?,
    };

    info!("Loaded {} jobs:", batch.len());
    for job in batch.jobs() {
        info!(
            "  {} (image: {}, cpu: {}, memory: {})",
            job.name, job.image, job.cpu_request, job.memory_request
        );
    }

    Ok(batch)
}
