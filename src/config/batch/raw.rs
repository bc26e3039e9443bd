use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;

use super::Batch;
use crate::kubernetes_objects::job::JobDescriptor;
use crate::kubernetes_objects::quantity::QuantityParseError;

const MAX_NAME_LENGTH: usize = 63;

#[cfg_attr(test, derive(PartialEq))]
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawBatch {
    pub(super) batch_job1: Vec<RawJobDetail>,
}

#[cfg_attr(test, derive(PartialEq))]
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawJobDetail {
    /// Job name, also matched by affinity rules
    pub(super) job_name: String,

    /// Container image
    ///
    /// Example: "docker_img_1"
    pub(super) image: String,

    /// Example: "500Mi"
    pub(super) request_mem: String,

    /// Example: "200m"
    pub(super) request_cpu: String,
}

#[derive(Error, Debug)]
pub enum BatchParseError {
    #[error("batch contains no jobs")]
    NoJobs,

    #[error("job #{index} has an empty '{field}' field")]
    EmptyField { index: usize, field: &'static str },

    #[error(
        "job name '{name}' is not a valid DNS-1123 label (lowercase alphanumerics and '-', at most 63 characters)"
    )]
    InvalidName { name: String },

    #[error("job name '{name}' is defined more than once")]
    DuplicateName { name: String },

    #[error("job '{name}' has an invalid {field} request: {source}")]
    InvalidQuantity {
        name: String,
        field: &'static str,
        #[source]
        source: QuantityParseError,
    },
}

impl TryFrom<RawBatch> for Batch {
    type Error = BatchParseError;

    fn try_from(raw: RawBatch) -> Result<Self, Self::Error> {
        if raw.batch_job1.is_empty() {
            return Err(BatchParseError::NoJobs);
        }

        let mut names = BTreeSet::new();
        let jobs = raw
            .batch_job1
            .into_iter()
            .enumerate()
            .map(|(index, detail)| {
                let descriptor = detail.into_descriptor(index)?;
                if !names.insert(descriptor.name.clone()) {
                    return Err(BatchParseError::DuplicateName {
                        name: descriptor.name,
                    });
                }
                Ok(descriptor)
            })
            .collect::<Result<Vec<_>, BatchParseError>>()?;

        Ok(Batch { jobs })
    }
}

impl RawJobDetail {
    fn into_descriptor(self, index: usize) -> Result<JobDescriptor, BatchParseError> {
        for (field, value) in [
            ("jobName", &self.job_name),
            ("image", &self.image),
            ("requestCpu", &self.request_cpu),
            ("requestMem", &self.request_mem),
        ] {
            if value.trim().is_empty() {
                return Err(BatchParseError::EmptyField { index, field });
            }
        }

        if !is_dns1123_label(&self.job_name) {
            return Err(BatchParseError::InvalidName {
                name: self.job_name,
            });
        }

        let cpu_request =
            self.request_cpu
                .parse()
                .map_err(|source| BatchParseError::InvalidQuantity {
                    name: self.job_name.clone(),
                    field: "cpu",
                    source,
                })?;
        let memory_request =
            self.request_mem
                .parse()
                .map_err(|source| BatchParseError::InvalidQuantity {
                    name: self.job_name.clone(),
                    field: "memory",
                    source,
                })?;

        Ok(JobDescriptor {
            name: self.job_name,
            image: self.image,
            cpu_request,
            memory_request,
        })
    }
}

fn is_dns1123_label(name: &str) -> bool {
    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    name.len() <= MAX_NAME_LENGTH
        && name.starts_with(alnum)
        && name.ends_with(alnum)
        && name.chars().all(|c| alnum(c) || c == '-')
}
