use k8s_openapi::api::core::v1::{
    Affinity, PodAffinity, PodAffinityTerm, PodAntiAffinity, WeightedPodAffinityTerm,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, LabelSelectorRequirement};
use thiserror::Error;

use super::{AFFINITY_WEIGHT, HOSTNAME_TOPOLOGY_KEY, JOB_NAME_LABEL};
use crate::config::batch::Batch;

/// Soft scheduling preference attached to every pod of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffinityPolicy {
    /// Prefer nodes already running pods of `targets`.
    Colocate { targets: Vec<String> },

    /// Prefer nodes without pods of `avoid` while still preferring nodes with
    /// pods of `prefer`.
    Separate {
        avoid: Vec<String>,
        prefer: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum AffinityPolicyError {
    #[error("Job '{0}' cannot be isolated because it is not part of the batch")]
    UnknownIsolatedJob(String),
}

impl AffinityPolicy {
    /// Co-locate every job of the batch with each other.
    pub fn colocate(batch: &Batch) -> AffinityPolicy {
        AffinityPolicy::Colocate {
            targets: batch.names().map(str::to_string).collect(),
        }
    }

    /// Keep `isolated` away from the rest of the batch while the remaining
    /// jobs stay together.
    pub fn isolate(batch: &Batch, isolated: &str) -> Result<AffinityPolicy, AffinityPolicyError> {
        if !batch.names().any(|name| name == isolated) {
            return Err(AffinityPolicyError::UnknownIsolatedJob(
                isolated.to_string(),
            ));
        }

        Ok(AffinityPolicy::Separate {
            avoid: vec![isolated.to_string()],
            prefer: batch
                .names()
                .filter(|name| *name != isolated)
                .map(str::to_string)
                .collect(),
        })
    }

    /// Rules whose name list is empty are left out, since the API server
    /// rejects an `In` requirement without values.
    pub fn to_affinity(&self) -> Affinity {
        match self {
            AffinityPolicy::Colocate { targets } => Affinity {
                pod_affinity: pod_affinity(targets),
                ..Default::default()
            },
            AffinityPolicy::Separate { avoid, prefer } => Affinity {
                pod_anti_affinity: preferred_term(avoid).map(|term| PodAntiAffinity {
                    preferred_during_scheduling_ignored_during_execution: Some(vec![term]),
                    ..Default::default()
                }),
                pod_affinity: pod_affinity(prefer),
                ..Default::default()
            },
        }
    }
}

fn pod_affinity(job_names: &[String]) -> Option<PodAffinity> {
    preferred_term(job_names).map(|term| PodAffinity {
        preferred_during_scheduling_ignored_during_execution: Some(vec![term]),
        ..Default::default()
    })
}

fn preferred_term(job_names: &[String]) -> Option<WeightedPodAffinityTerm> {
    if job_names.is_empty() {
        return None;
    }

    Some(WeightedPodAffinityTerm {
        weight: AFFINITY_WEIGHT,
        pod_affinity_term: PodAffinityTerm {
            topology_key: HOSTNAME_TOPOLOGY_KEY.to_string(),
            label_selector: Some(LabelSelector {
                match_expressions: Some(vec![LabelSelectorRequirement {
                    key: JOB_NAME_LABEL.to_string(),
                    operator: "In".to_string(),
                    values: Some(job_names.to_vec()),
                }]),
                ..Default::default()
            }),
            ..Default::default()
        },
    })
}
