use self::cli::{Cli, SubCommands};
use self::config::Config;
use self::config::batch::load_batch;
use self::kubernetes_objects::job_api::KubeConnector;
use self::routine::render::render_batch;
use self::routine::submit::SubmitRoutineContext;
use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_error::ExtractSpanTrace;
use tracing_error::SpanTrace;

pub mod cli;
pub mod config;
pub mod error;
pub mod kubernetes_objects;
pub(crate) mod routine;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load batch.\n{0}")]
    BatchLoadError(#[from] config::batch::BatchLoadError),

    #[error("Failed to select affinity policy.\n{0}")]
    AffinityPolicyError(#[from] kubernetes_objects::affinity::AffinityPolicyError),

    #[error("Batch submission stopped due to following error:\n{0}")]
    SubmitRoutineError(#[from] routine::submit::error::SubmitRoutineError),

    #[error("Failed to render job manifests.\n{0}")]
    RenderError(#[from] serde_yaml::Error),
}

impl ExtractSpanTrace for AppError {
    fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            AppError::SubmitRoutineError(e) => e.span_trace(),
            _ => None,
        }
    }
}

pub async fn app() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = Config::new_from_cli(&cli, std::env::var_os("HOME"));

    let batch = load_batch(&config.batch).await?;
    let policy = config.policy.resolve(&batch)?;

    info!("Batch Loaded.");

    match cli.subcommand.unwrap_or(SubCommands::Submit {}) {
        SubCommands::Submit {} => {
            let connector = KubeConnector::new(config.kubeconfig);
            let context = SubmitRoutineContext::new(config.namespace, batch, policy);
            context.run(&connector).await?;
        }
        SubCommands::Render {} => {
            print!("{}", render_batch(&batch, &policy, &config.namespace)?);
        }
    }

    Ok(())
}
