pub mod batch;
pub mod kubeconfig;

use std::ffi::OsString;
use std::path::PathBuf;

use tracing::warn;

use self::batch::{Batch, BatchSource};
use self::kubeconfig::resolve_kubeconfig_path;
use crate::cli::{Cli, PolicyKind};
use crate::kubernetes_objects::affinity::{AffinityPolicy, AffinityPolicyError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) namespace: String,
    pub(crate) kubeconfig: PathBuf,
    pub(crate) batch: BatchSource,
    pub(crate) policy: PolicySelection,
}

/// Affinity policy requested by the caller, before it is bound to a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PolicySelection {
    Colocate,
    Separate { isolate: Option<String> },
}

impl Config {
    pub(crate) fn new_from_cli(cli: &Cli, home: Option<OsString>) -> Config {
        let policy = match cli.policy {
            PolicyKind::Colocate => {
                if let Some(isolate) = &cli.isolate {
                    warn!(
                        "Ignoring --isolate '{}' because the colocate policy isolates nothing.",
                        isolate
                    );
                }
                PolicySelection::Colocate
            }
            PolicyKind::Separate => PolicySelection::Separate {
                isolate: cli.isolate.clone(),
            },
        };

        Config {
            namespace: cli.namespace.clone(),
            kubeconfig: resolve_kubeconfig_path(cli.kubeconfig.as_deref(), home),
            batch: cli
                .batch
                .clone()
                .map_or(BatchSource::Embedded, BatchSource::File),
            policy,
        }
    }
}

impl PolicySelection {
    /// `Separate` without an explicit job isolates the first job of the batch.
    pub(crate) fn resolve(&self, batch: &Batch) -> Result<AffinityPolicy, AffinityPolicyError> {
        match self {
            PolicySelection::Colocate => Ok(AffinityPolicy::colocate(batch)),
            PolicySelection::Separate { isolate } => {
                let isolated = match isolate {
                    Some(name) => name.as_str(),
                    None => batch.names().next().unwrap_or_default(),
                };
                AffinityPolicy::isolate(batch, isolated)
            }
        }
    }
}
