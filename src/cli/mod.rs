use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use std::path::PathBuf;

/// Submit a batch of Kubernetes Jobs with pod affinity preferences.
#[derive(Debug, Parser)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    pub(crate) subcommand: Option<SubCommands>,

    /// JSON or YAML batch file; the built-in batch is used when omitted
    #[clap(short, long, global = true)]
    pub(crate) batch: Option<PathBuf>,

    /// Defaults to $HOME/.kube/config
    #[clap(long, global = true)]
    pub(crate) kubeconfig: Option<PathBuf>,

    #[clap(short, long, default_value = "default", global = true)]
    pub(crate) namespace: String,

    #[clap(short, long, value_enum, default_value_t = PolicyKind::Colocate, global = true)]
    pub(crate) policy: PolicyKind,

    /// Job kept apart from the others by the `separate` policy (defaults to the first job)
    #[clap(long, global = true)]
    pub(crate) isolate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub(crate) enum SubCommands {
    /// Create every job of the batch (default)
    Submit {},

    /// Print the Job manifests as YAML without contacting the cluster
    Render {},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum PolicyKind {
    /// Prefer placing every job on the same node
    Colocate,

    /// Prefer keeping one job away from the rest
    Separate,
}
