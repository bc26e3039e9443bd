use std::collections::BTreeMap;

use k8s_openapi::api::batch::v1::{Job, JobSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec, ResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use super::affinity::AffinityPolicy;
use super::quantity::ResourceQuantity;
use super::{BACKOFF_LIMIT, IMAGE_PULL_POLICY, RESTART_POLICY};

/// One entry of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    /// Job name, container name and value of the pods' `job-name` label
    pub name: String,

    /// Container image reference
    pub image: String,

    pub cpu_request: ResourceQuantity,

    pub memory_request: ResourceQuantity,
}

impl JobDescriptor {
    /// Requests and limits are identical so the pod lands in the Guaranteed
    /// QoS class.
    fn resources(&self) -> ResourceRequirements {
        let amounts: BTreeMap<String, Quantity> = BTreeMap::from([
            ("cpu".to_string(), self.cpu_request.to_quantity()),
            ("memory".to_string(), self.memory_request.to_quantity()),
        ]);

        ResourceRequirements {
            requests: Some(amounts.clone()),
            limits: Some(amounts),
            ..Default::default()
        }
    }

    /// Builds the `batch/v1` Job submitted for this descriptor.
    pub fn to_manifest(&self, namespace: &str, policy: &AffinityPolicy) -> Job {
        Job {
            metadata: ObjectMeta {
                name: Some(self.name.clone()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: Some(JobSpec {
                backoff_limit: Some(BACKOFF_LIMIT),
                template: PodTemplateSpec {
                    metadata: None,
                    spec: Some(PodSpec {
                        affinity: Some(policy.to_affinity()),
                        containers: vec![Container {
                            name: self.name.clone(),
                            image: Some(self.image.clone()),
                            image_pull_policy: Some(IMAGE_PULL_POLICY.to_string()),
                            resources: Some(self.resources()),
                            ..Default::default()
                        }],
                        restart_policy: Some(RESTART_POLICY.to_string()),
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
