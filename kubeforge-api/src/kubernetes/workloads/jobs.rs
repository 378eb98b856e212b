//! Job and CronJob manifests

use crate::kubernetes::labels::{merge_labels, namespace_or_default, object_meta, placeholder};
use crate::kubernetes::render_manifests;
use crate::kubernetes::workloads::containers::{container_manifest, EnvFromRefs};
use crate::yaml::{render, Mapping, YamlValue};
use kubeforge_common::{is_blank, Job, JobType, OrderedMap, ProjectSettings};

/// Zero counts are treated like unset ones
fn non_zero<T: Default + PartialEq>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}

/// `spec` of a Job, also embedded under a CronJob's `jobTemplate`
fn job_spec(job: &Job, labels: &OrderedMap) -> Mapping {
    let containers: YamlValue = job
        .containers
        .iter()
        .map(|c| container_manifest(c, EnvFromRefs::default()))
        .collect();

    Mapping::new()
        .insert_opt("completions", non_zero(job.completions))
        .insert_opt("parallelism", non_zero(job.parallelism))
        .insert_opt("backoffLimit", non_zero(job.backoff_limit))
        .insert_opt("activeDeadlineSeconds", non_zero(job.active_deadline_seconds))
        .insert(
            "template",
            Mapping::new()
                .insert_nonempty("metadata", Mapping::new().insert_nonempty("labels", labels))
                .insert(
                    "spec",
                    Mapping::new()
                        .insert("restartPolicy", job.restart_policy.as_str())
                        .insert("containers", containers),
                ),
        )
}

fn metadata(job: &Job, labels: &OrderedMap) -> Mapping {
    object_meta(
        &job.name,
        Some(namespace_or_default(&job.namespace)),
        labels,
        &job.annotations,
    )
}

/// Job manifest; `None` while the Job has no name
pub fn job_manifest(job: &Job, settings: Option<&ProjectSettings>) -> Option<Mapping> {
    if is_blank(&job.name) {
        return None;
    }
    let labels = merge_labels(settings, &job.labels, None);

    Some(
        Mapping::new()
            .insert("apiVersion", "batch/v1")
            .insert("kind", "Job")
            .insert("metadata", metadata(job, &labels))
            .insert("spec", job_spec(job, &labels)),
    )
}

/// CronJob manifest wrapping the Job spec under `jobTemplate.spec`
pub fn cron_job_manifest(job: &Job, settings: Option<&ProjectSettings>) -> Option<Mapping> {
    if is_blank(&job.name) {
        return None;
    }
    let labels = merge_labels(settings, &job.labels, None);

    let spec = Mapping::new()
        .insert("schedule", &job.schedule)
        .insert("concurrencyPolicy", job.concurrency_policy.as_str())
        .insert_if("suspend", job.suspend, true)
        .insert_opt("successfulJobsHistoryLimit", job.successful_jobs_history_limit)
        .insert_opt("failedJobsHistoryLimit", job.failed_jobs_history_limit)
        .insert(
            "jobTemplate",
            Mapping::new().insert("spec", job_spec(job, &labels)),
        );

    Some(
        Mapping::new()
            .insert("apiVersion", "batch/v1")
            .insert("kind", "CronJob")
            .insert("metadata", metadata(job, &labels))
            .insert("spec", spec),
    )
}

/// Job or CronJob depending on the record's type
pub fn job_resource_manifest(job: &Job, settings: Option<&ProjectSettings>) -> Option<Mapping> {
    match job.job_type {
        JobType::Job => job_manifest(job, settings),
        JobType::CronJob => cron_job_manifest(job, settings),
    }
}

pub fn render_job_yaml(job: &Job, settings: Option<&ProjectSettings>) -> String {
    match job_resource_manifest(job, settings) {
        Some(manifest) => render(&manifest.into(), 0),
        None if job.is_cron() => placeholder("CronJob"),
        None => placeholder("Job"),
    }
}

/// Plain Jobs of the list
pub fn render_jobs_yaml(jobs: &[Job], settings: Option<&ProjectSettings>) -> String {
    render_manifests(
        jobs.iter()
            .filter(|j| !j.is_cron())
            .filter_map(|j| job_manifest(j, settings)),
    )
}

/// CronJobs of the list
pub fn render_cron_jobs_yaml(jobs: &[Job], settings: Option<&ProjectSettings>) -> String {
    render_manifests(
        jobs.iter()
            .filter(|j| j.is_cron())
            .filter_map(|j| cron_job_manifest(j, settings)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubeforge_common::{ConcurrencyPolicy, ContainerSpec, RestartPolicy};

    fn migrate() -> Job {
        Job {
            name: "migrate".to_string(),
            containers: vec![ContainerSpec {
                name: "migrate".to_string(),
                image: "app:1.2".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_zero_counts_are_omitted() {
        let mut job = migrate();
        job.completions = Some(0);
        job.parallelism = Some(2);
        job.backoff_limit = None;
        job.active_deadline_seconds = Some(600);

        let text = render_job_yaml(&job, None);
        assert!(!text.contains("completions"));
        assert!(!text.contains("backoffLimit"));
        assert!(text.contains("spec:\n  parallelism: 2\n  activeDeadlineSeconds: 600\n  template:\n"));
        assert!(text.contains("      restartPolicy: Never\n"));
    }

    #[test]
    fn test_cron_job_wraps_job_spec() {
        let mut job = migrate();
        job.job_type = JobType::CronJob;
        job.schedule = "*/5 * * * *".to_string();
        job.concurrency_policy = ConcurrencyPolicy::Forbid;
        job.restart_policy = RestartPolicy::OnFailure;
        job.successful_jobs_history_limit = Some(0);
        job.backoff_limit = Some(3);

        let text = render_job_yaml(&job, None);
        assert!(text.contains("kind: CronJob\n"));
        assert!(text.contains("  schedule: \"*/5 * * * *\"\n  concurrencyPolicy: Forbid\n"));
        assert!(text.contains("  successfulJobsHistoryLimit: 0\n"));
        assert!(!text.contains("suspend"));
        assert!(text.contains("  jobTemplate:\n    spec:\n      backoffLimit: 3\n      template:\n"));
        assert!(text.contains("          restartPolicy: OnFailure\n"));
    }

    #[test]
    fn test_lists_split_by_type() {
        let mut cron = migrate();
        cron.name = "nightly".to_string();
        cron.job_type = JobType::CronJob;
        let jobs = vec![migrate(), cron];

        let plain = render_jobs_yaml(&jobs, None);
        assert!(plain.contains("name: migrate"));
        assert!(!plain.contains("nightly"));

        let crons = render_cron_jobs_yaml(&jobs, None);
        assert!(crons.contains("name: nightly"));
        assert!(!crons.contains("kind: Job\n"));
    }

    #[test]
    fn test_unnamed_cron_job_placeholder() {
        let job = Job {
            job_type: JobType::CronJob,
            ..Default::default()
        };
        assert!(render_job_yaml(&job, None).starts_with("# CronJob has no name yet."));
    }
}
