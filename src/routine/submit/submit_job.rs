use k8s_openapi::api::batch::v1::Job;
use tracing::{Instrument, error, info, instrument, trace_span};

use crate::error::SpannedExt;
use crate::kubernetes_objects::affinity::AffinityPolicy;
use crate::kubernetes_objects::job::JobDescriptor;
use crate::kubernetes_objects::job_api::JobApi;

use super::error::SubmitRoutineError;

#[instrument(
    "submit_job",
    skip(api, descriptor, policy),
    fields(kubernetes_namespace = %namespace, job_name = %descriptor.name)
)]
pub(super) async fn submit_job(
    api: &dyn JobApi,
    namespace: &str,
    descriptor: &JobDescriptor,
    policy: &AffinityPolicy,
) -> Result<Job, SubmitRoutineError> {
    let manifest = descriptor.to_manifest(namespace, policy);

    let created = async { api.create_job(namespace, &manifest).await.with_span_trace() }
        .instrument(trace_span!("create_job"))
        .await
        .map_err(|e| {
            error!("Failed to create job '{}': {}", descriptor.name, e);
            SubmitRoutineError::Submission(descriptor.name.clone(), e)
        })?;

    info!(
        "Created job '{}' in namespace '{}' (uid: {}).",
        created.metadata.name.as_deref().unwrap_or(&descriptor.name),
        namespace,
        created.metadata.uid.as_deref().unwrap_or("<unknown>")
    );

    Ok(created)
}
