use std::path::PathBuf;

use async_trait::async_trait;
use k8s_openapi::api::batch::v1::Job;
use kube::api::PostParams;
use kube::config::{KubeConfigOptions, Kubeconfig, KubeconfigError};
use kube::{Api, Client};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::{Instrument, info, instrument, trace_span};
use tracing_error::{ExtractSpanTrace, SpanTrace};

use super::FIELD_MANAGER;
use crate::error::{SpannedErr, SpannedExt};

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to load kubeconfig '{0}': {1}")]
    Kubeconfig(PathBuf, SpannedErr<KubeconfigError>),

    #[error("Failed to create kubernetes client: {0}")]
    KubeClient(SpannedErr<kube::Error>),

    #[error("Failed to authenticate against the kubernetes API server: {0}")]
    Authentication(SpannedErr<kube::Error>),
}

impl ExtractSpanTrace for ConnectionError {
    fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            ConnectionError::Kubeconfig(_, e) => e.span_trace(),
            ConnectionError::KubeClient(e) => e.span_trace(),
            ConnectionError::Authentication(e) => e.span_trace(),
        }
    }
}

/// Creation endpoint for namespaced Jobs.
#[cfg_attr(test, automock)]
#[async_trait]
pub(crate) trait JobApi: Send + Sync {
    async fn create_job(&self, namespace: &str, job: &Job) -> Result<Job, kube::Error>;
}

/// Source of an authenticated [`JobApi`].
#[cfg_attr(test, automock)]
#[async_trait]
pub(crate) trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn JobApi>, ConnectionError>;
}

pub(crate) struct KubeJobApi {
    client: Client,
}

#[async_trait]
impl JobApi for KubeJobApi {
    async fn create_job(&self, namespace: &str, job: &Job) -> Result<Job, kube::Error> {
        let api: Api<Job> = Api::namespaced(self.client.clone(), namespace);
        let post_params = PostParams {
            field_manager: Some(FIELD_MANAGER.to_string()),
            ..Default::default()
        };
        api.create(&post_params, job).await
    }
}

/// Connects with the current context of a kubeconfig file.
pub(crate) struct KubeConnector {
    kubeconfig: PathBuf,
}

impl KubeConnector {
    pub(crate) fn new(kubeconfig: PathBuf) -> KubeConnector {
        KubeConnector { kubeconfig }
    }
}

#[async_trait]
impl Connector for KubeConnector {
    #[instrument("connect", skip(self), fields(kubeconfig = %self.kubeconfig.display()))]
    async fn connect(&self) -> Result<Box<dyn JobApi>, ConnectionError> {
        let config = async {
            let kubeconfig = Kubeconfig::read_from(&self.kubeconfig)?;
            let config =
                kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                    .await?;
            Ok::<_, KubeconfigError>(config)
        }
        .instrument(trace_span!("load_kubeconfig"))
        .await
        .with_span_trace()
        .map_err(|e| ConnectionError::Kubeconfig(self.kubeconfig.clone(), e))?;

        info!("Connecting to {}...", config.cluster_url);

        let client = Client::try_from(config)
            .with_span_trace()
            .map_err(ConnectionError::KubeClient)?;

        let version = client
            .apiserver_version()
            .instrument(trace_span!("apiserver_version"))
            .await
            .with_span_trace()
            .map_err(ConnectionError::Authentication)?;

        info!(
            "Connected to kubernetes API server {}.{} ({}).",
            version.major, version.minor, version.git_version
        );

        Ok(Box::new(KubeJobApi { client }))
    }
}
