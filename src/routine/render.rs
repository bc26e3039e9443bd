use tracing::instrument;

use crate::config::batch::Batch;
use crate::kubernetes_objects::affinity::AffinityPolicy;

/// Job manifests of a batch as a multi-document YAML stream.
#[instrument("render_batch", skip(batch, policy), level = "trace")]
pub(crate) fn render_batch(
    batch: &Batch,
    policy: &AffinityPolicy,
    namespace: &str,
) -> Result<String, serde_yaml::Error> {
    batch
        .jobs()
        .iter()
        .map(|descriptor| serde_yaml::to_string(&descriptor.to_manifest(namespace, policy)))
        .collect::<Result<Vec<_>, _>>()
        .map(|documents| {
            documents
                .iter()
                .map(|document| format!("---\n{document}"))
                .collect()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::batch::v1::Job;
    use serde::Deserialize;

    #[test]
    fn test_render_embedded_batch() {
        let batch = Batch::embedded().unwrap();
        let policy = AffinityPolicy::colocate(&batch);

        let rendered = render_batch(&batch, &policy, "batch").unwrap();

        let jobs = serde_yaml::Deserializer::from_str(&rendered)
            .map(|document| Job::deserialize(document).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(jobs.len(), 3);
        for (job, descriptor) in jobs.iter().zip(batch.jobs()) {
            assert_eq!(job, &descriptor.to_manifest("batch", &policy));
        }
        assert!(rendered.contains("apiVersion: batch/v1"));
        assert!(rendered.contains("kind: Job"));
        assert!(rendered.contains("topologyKey: kubernetes.io/hostname"));
    }
}
