//! Job and CronJob types

use crate::workload::ContainerSpec;
use crate::OrderedMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    #[default]
    Job,
    CronJob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RestartPolicy {
    #[default]
    Never,
    OnFailure,
}

impl RestartPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::OnFailure => "OnFailure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConcurrencyPolicy {
    #[default]
    Allow,
    Forbid,
    Replace,
}

impl ConcurrencyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Forbid => "Forbid",
            Self::Replace => "Replace",
        }
    }
}

/// Job, or CronJob when `job_type` says so
///
/// Zero counts are treated as unset when rendering, so `completions: 0`
/// cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    pub name: String,
    pub namespace: String,
    pub labels: OrderedMap,
    pub annotations: OrderedMap,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub containers: Vec<ContainerSpec>,
    pub restart_policy: RestartPolicy,
    pub completions: Option<i32>,
    pub parallelism: Option<i32>,
    pub backoff_limit: Option<i32>,
    pub active_deadline_seconds: Option<i64>,

    // CronJob only
    pub schedule: String,
    pub concurrency_policy: ConcurrencyPolicy,
    pub successful_jobs_history_limit: Option<i32>,
    pub failed_jobs_history_limit: Option<i32>,
    pub suspend: bool,
}

impl Default for Job {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: "default".to_string(),
            labels: OrderedMap::new(),
            annotations: OrderedMap::new(),
            job_type: JobType::Job,
            containers: Vec::new(),
            restart_policy: RestartPolicy::Never,
            completions: None,
            parallelism: None,
            backoff_limit: None,
            active_deadline_seconds: None,
            schedule: String::new(),
            concurrency_policy: ConcurrencyPolicy::Allow,
            successful_jobs_history_limit: None,
            failed_jobs_history_limit: None,
            suspend: false,
        }
    }
}

impl Job {
    pub fn is_cron(&self) -> bool {
        self.job_type == JobType::CronJob
    }
}
