//! Workload manifests: Deployments, DaemonSets, Jobs and CronJobs

pub mod containers;
pub mod daemonsets;
pub mod deployments;
pub mod jobs;

pub use daemonsets::{render_daemonset_yaml, render_daemonsets_yaml};
pub use deployments::{
    render_deployment_yaml, render_deployments_yaml, render_workload_yaml, workload_documents,
    workload_manifest,
};
pub use jobs::{
    cron_job_manifest, job_manifest, job_resource_manifest, render_cron_jobs_yaml, render_job_yaml,
    render_jobs_yaml,
};
