pub mod error;
mod submit_job;

use k8s_openapi::api::batch::v1::Job;
use tracing::{info, instrument};

use crate::config::batch::Batch;
use crate::kubernetes_objects::affinity::AffinityPolicy;
use crate::kubernetes_objects::job_api::Connector;

use self::error::SubmitRoutineError;
use self::submit_job::submit_job;

pub(crate) struct SubmitRoutineContext {
    pub(crate) namespace: String,
    pub(crate) batch: Batch,
    pub(crate) policy: AffinityPolicy,
}

impl SubmitRoutineContext {
    pub(crate) fn new(namespace: String, batch: Batch, policy: AffinityPolicy) -> Self {
        SubmitRoutineContext {
            namespace,
            batch,
            policy,
        }
    }

    /// Connects once, then creates the jobs one by one in batch order. The
    /// first failure stops the batch.
    #[instrument("submit_batch", skip(self, connector), fields(kubernetes_namespace = %self.namespace))]
    pub(crate) async fn run<C>(&self, connector: &C) -> Result<Vec<Job>, SubmitRoutineError>
    where
        C: Connector + ?Sized,
    {
        info!("Submitting {} jobs with {:?}...", self.batch.len(), self.policy);

        let api = connector.connect().await?;

        let mut created = Vec::with_capacity(self.batch.len());
        for descriptor in self.batch.jobs() {
            created.push(submit_job(api.as_ref(), &self.namespace, descriptor, &self.policy).await?);
        }

        info!("All {} jobs submitted.", created.len());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpannedErr;
    use crate::kubernetes_objects::job_api::{ConnectionError, JobApi, MockConnector, MockJobApi};
    use k8s_openapi::api::core::v1::{Affinity, WeightedPodAffinityTerm};
    use mockall::Sequence;

    fn affinity_of(job: &Job) -> Affinity {
        job.spec
            .as_ref()
            .and_then(|spec| spec.template.spec.as_ref())
            .and_then(|pod| pod.affinity.clone())
            .unwrap()
    }

    fn selector_values(terms: Option<Vec<WeightedPodAffinityTerm>>) -> Vec<String> {
        let terms = terms.unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].weight, 100);
        terms[0]
            .pod_affinity_term
            .label_selector
            .clone()
            .and_then(|selector| selector.match_expressions)
            .unwrap()[0]
            .values
            .clone()
            .unwrap()
    }

    fn connector_for(api: MockJobApi) -> MockConnector {
        let mut connector = MockConnector::new();
        connector
            .expect_connect()
            .times(1)
            .return_once(move || Ok(Box::new(api) as Box<dyn JobApi>));
        connector
    }

    #[tokio::test]
    async fn test_colocate_submits_every_job_in_order() {
        let batch = Batch::embedded().unwrap();
        let policy = AffinityPolicy::colocate(&batch);
        let mut api = MockJobApi::new();
        let mut seq = Sequence::new();

        for name in ["job1", "job2", "job3"] {
            api.expect_create_job()
                .withf(move |namespace, job| {
                    let pod = job.spec.as_ref().unwrap().template.spec.as_ref().unwrap();
                    namespace == "default"
                        && job.metadata.name.as_deref() == Some(name)
                        && pod.restart_policy.as_deref() == Some("Never")
                        && job.spec.as_ref().unwrap().backoff_limit == Some(0)
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, job| Ok(job.clone()));
        }

        let context = SubmitRoutineContext::new("default".to_string(), batch, policy);
        let created = context.run(&connector_for(api)).await.unwrap();

        assert_eq!(created.len(), 3);
        for job in &created {
            let affinity = affinity_of(job);
            assert!(affinity.pod_anti_affinity.is_none());
            assert_eq!(
                selector_values(
                    affinity
                        .pod_affinity
                        .unwrap()
                        .preferred_during_scheduling_ignored_during_execution
                ),
                vec!["job1", "job2", "job3"]
            );
        }
    }

    #[tokio::test]
    async fn test_separate_isolates_first_job() {
        let batch = Batch::embedded().unwrap();
        let policy = AffinityPolicy::isolate(&batch, "job1").unwrap();
        let mut api = MockJobApi::new();
        api.expect_create_job()
            .times(3)
            .returning(|_, job| Ok(job.clone()));

        let context = SubmitRoutineContext::new("default".to_string(), batch, policy);
        let created = context.run(&connector_for(api)).await.unwrap();

        let job1 = &created[0];
        assert_eq!(job1.metadata.name.as_deref(), Some("job1"));
        let affinity = affinity_of(job1);
        assert_eq!(
            selector_values(
                affinity
                    .pod_anti_affinity
                    .unwrap()
                    .preferred_during_scheduling_ignored_during_execution
            ),
            vec!["job1"]
        );
        assert_eq!(
            selector_values(
                affinity
                    .pod_affinity
                    .unwrap()
                    .preferred_during_scheduling_ignored_during_execution
            ),
            vec!["job2", "job3"]
        );
    }

    #[tokio::test]
    async fn test_failed_create_stops_batch() {
        let batch = Batch::embedded().unwrap();
        let policy = AffinityPolicy::colocate(&batch);
        let mut api = MockJobApi::new();
        let mut seq = Sequence::new();

        api.expect_create_job()
            .withf(|_, job| job.metadata.name.as_deref() == Some("job1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, job| Ok(job.clone()));
        api.expect_create_job()
            .withf(|_, job| job.metadata.name.as_deref() == Some("job2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(kube::Error::Service("admission webhook denied".into())));
        api.expect_create_job()
            .withf(|_, job| job.metadata.name.as_deref() == Some("job3"))
            .times(0);

        let context = SubmitRoutineContext::new("default".to_string(), batch, policy);
        let result = context.run(&connector_for(api)).await;

        match result {
            Err(SubmitRoutineError::Submission(name, e)) => {
                assert_eq!(name, "job2");
                assert!(matches!(e.inner(), kube::Error::Service(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_failure_submits_nothing() {
        let batch = Batch::embedded().unwrap();
        let policy = AffinityPolicy::colocate(&batch);
        let mut connector = MockConnector::new();
        connector.expect_connect().times(1).returning(|| {
            Err(ConnectionError::Authentication(SpannedErr::new(
                kube::Error::Service("Unauthorized".into()),
            )))
        });

        let context = SubmitRoutineContext::new("default".to_string(), batch, policy);
        let result = context.run(&connector).await;

        assert!(matches!(
            result,
            Err(SubmitRoutineError::Connection(ConnectionError::Authentication(_)))
        ));
    }
}
