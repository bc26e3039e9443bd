pub mod affinity;
pub mod job;
pub(crate) mod job_api;
pub mod quantity;

pub(crate) const FIELD_MANAGER: &str = "batch-submitter";

/// Label the Job controller puts on every pod it creates.
pub(crate) const JOB_NAME_LABEL: &str = "job-name";
pub(crate) const HOSTNAME_TOPOLOGY_KEY: &str = "kubernetes.io/hostname";
pub(crate) const AFFINITY_WEIGHT: i32 = 100;

pub(crate) const IMAGE_PULL_POLICY: &str = "IfNotPresent";
pub(crate) const RESTART_POLICY: &str = "Never";
pub(crate) const BACKOFF_LIMIT: i32 = 0;
