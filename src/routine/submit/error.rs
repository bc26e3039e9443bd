use thiserror::Error;
use tracing_error::{ExtractSpanTrace, SpanTrace};

use crate::error::SpannedErr;
use crate::kubernetes_objects::job_api::ConnectionError;

#[derive(Error, Debug)]
pub enum SubmitRoutineError {
    #[error("Cannot connect to the control plane: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Job '{0}' could not be created: {1}")]
    Submission(String, SpannedErr<kube::Error>),
}

impl ExtractSpanTrace for SubmitRoutineError {
    fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            SubmitRoutineError::Connection(e) => e.span_trace(),
            SubmitRoutineError::Submission(_, e) => e.span_trace(),
        }
    }
}
