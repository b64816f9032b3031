// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the cleanup job.

use std::str::FromStr;
use std::time::Duration;

use sweeper_core::inventory::InventorySourceConfig;
use sweeper_core::{NotificationTemplate, ReconcilerConfig, RetentionPolicy};

/// Which cleanup the job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Delete EBS snapshots whose source volume is no longer attached.
    EbsSnapshots,
    /// Delete repository artifacts older than the retention period.
    Artifactory,
}

impl JobKind {
    /// Stable name used in logs and the `SWEEPER_JOB` variable.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EbsSnapshots => "ebs-snapshots",
            Self::Artifactory => "artifactory",
        }
    }
}

impl FromStr for JobKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ebs-snapshots" | "ebs_snapshots" | "ebs" => Ok(Self::EbsSnapshots),
            "artifactory" | "artifacts" => Ok(Self::Artifactory),
            _ => Err(ConfigError::InvalidValue {
                var: "SWEEPER_JOB",
                value: s.to_string(),
            }),
        }
    }
}

/// Where the pre-deletion summary goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierConfig {
    /// Slack incoming webhook.
    Slack {
        /// Webhook URL.
        webhook_url: String,
    },
    /// SNS topic.
    Sns {
        /// Topic ARN.
        topic_arn: String,
    },
    /// Log only.
    Log,
}

/// Artifactory connection settings.
#[derive(Debug, Clone)]
pub struct ArtifactorySettings {
    /// Base URL including the `/artifactory` context path.
    pub url: String,
    /// Repository key.
    pub repo: String,
    /// Basic-auth user.
    pub username: String,
    /// Basic-auth password or API key.
    pub password: Option<String>,
}

/// Job configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Cleanup to perform.
    pub job: JobKind,
    /// Notification channel.
    pub notifier: NotifierConfig,
    /// Artifactory settings (artifactory job only).
    pub artifactory: Option<ArtifactorySettings>,
    /// Maximum artifact age in days (artifactory job only).
    pub retention_days: u32,
    /// AWS region override; the default provider chain applies when unset.
    pub aws_region: Option<String>,
    /// Per-request timeout for HTTP collaborators.
    pub http_timeout: Duration,
    /// Inventory enumeration settings.
    pub inventory: InventorySourceConfig,
    /// Reconciler settings.
    pub reconciler: ReconcilerConfig,
}

impl JobConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SWEEPER_JOB` (required): "ebs-snapshots" or "artifactory"
    /// - `SWEEPER_SLACK_WEBHOOK_URL`: send notifications to Slack
    /// - `SWEEPER_SNS_TOPIC_ARN`: send notifications to SNS (when Slack is unset)
    /// - `SWEEPER_ARTIFACTORY_URL`, `SWEEPER_ARTIFACTORY_REPO`,
    ///   `SWEEPER_ARTIFACTORY_USERNAME` (required for artifactory)
    /// - `SWEEPER_ARTIFACTORY_PASSWORD`: password or API key
    /// - `SWEEPER_RETENTION_DAYS`: artifact retention (default: 30)
    /// - `SWEEPER_AWS_REGION`: AWS region override
    /// - `SWEEPER_HTTP_TIMEOUT_SECS`: HTTP request timeout (default: 5)
    /// - `SWEEPER_DETAIL_CONCURRENCY`: concurrent detail lookups (default: 8)
    /// - `SWEEPER_MAX_PAGES`: page limit per listing (default: 10000)
    ///
    /// The last three must be greater than zero.
    ///
    /// Reconciler variables are documented on [`ReconcilerConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let job: JobKind = std::env::var("SWEEPER_JOB")
            .map_err(|_| ConfigError::MissingEnvVar("SWEEPER_JOB"))?
            .parse()?;

        let notifier = if let Some(webhook_url) = non_empty_var("SWEEPER_SLACK_WEBHOOK_URL") {
            NotifierConfig::Slack { webhook_url }
        } else if let Some(topic_arn) = non_empty_var("SWEEPER_SNS_TOPIC_ARN") {
            NotifierConfig::Sns { topic_arn }
        } else {
            NotifierConfig::Log
        };

        let artifactory = match job {
            JobKind::Artifactory => Some(ArtifactorySettings {
                url: required_var("SWEEPER_ARTIFACTORY_URL")?,
                repo: required_var("SWEEPER_ARTIFACTORY_REPO")?,
                username: required_var("SWEEPER_ARTIFACTORY_USERNAME")?,
                password: non_empty_var("SWEEPER_ARTIFACTORY_PASSWORD"),
            }),
            JobKind::EbsSnapshots => None,
        };

        let retention_days = parsed_var("SWEEPER_RETENTION_DAYS", 30)?;
        let http_timeout = Duration::from_secs(positive_var("SWEEPER_HTTP_TIMEOUT_SECS", 5)?);

        let inventory = InventorySourceConfig {
            max_pages: positive_var("SWEEPER_MAX_PAGES", 10_000)?,
            detail_concurrency: positive_var("SWEEPER_DETAIL_CONCURRENCY", 8)?,
        };

        let reconciler =
            ReconcilerConfig::from_env()?.with_template(template_for(job, retention_days));

        Ok(Self {
            job,
            notifier,
            artifactory,
            retention_days,
            aws_region: non_empty_var("SWEEPER_AWS_REGION"),
            http_timeout,
            inventory,
            reconciler,
        })
    }

    /// Retention policy implied by the job.
    pub fn policy(&self) -> RetentionPolicy {
        match self.job {
            JobKind::EbsSnapshots => RetentionPolicy::Reference,
            JobKind::Artifactory => RetentionPolicy::age_days(self.retention_days),
        }
    }

    /// Whether any collaborator talks to AWS.
    pub fn needs_aws(&self) -> bool {
        self.job == JobKind::EbsSnapshots || matches!(self.notifier, NotifierConfig::Sns { .. })
    }
}

/// Summary wording for each job.
pub fn template_for(job: JobKind, retention_days: u32) -> NotificationTemplate {
    match job {
        JobKind::EbsSnapshots => NotificationTemplate {
            subject: "EBS Snapshot Cleanup Notification".to_string(),
            preamble: "The following unused EBS snapshots will be deleted:".to_string(),
        },
        JobKind::Artifactory => NotificationTemplate {
            subject: "Artifact Retention Cleanup Notification".to_string(),
            preamble: format!(
                "The following artifacts older than {retention_days} days will be deleted:"
            ),
        },
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    non_empty_var(name).ok_or(ConfigError::MissingEnvVar(name))
}

fn parsed_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var: name, value }),
    }
}

fn positive_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default + ToString,
{
    let value = parsed_var(name, default)?;
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            var: name,
            value: value.to_string(),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
    /// An environment variable has an unusable value.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
    /// A reconciler setting is unusable.
    #[error(transparent)]
    Reconciler(#[from] sweeper_core::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use sweeper_core::NotificationPolicy;

    const VARS: &[&str] = &[
        "SWEEPER_JOB",
        "SWEEPER_SLACK_WEBHOOK_URL",
        "SWEEPER_SNS_TOPIC_ARN",
        "SWEEPER_ARTIFACTORY_URL",
        "SWEEPER_ARTIFACTORY_REPO",
        "SWEEPER_ARTIFACTORY_USERNAME",
        "SWEEPER_ARTIFACTORY_PASSWORD",
        "SWEEPER_RETENTION_DAYS",
        "SWEEPER_AWS_REGION",
        "SWEEPER_HTTP_TIMEOUT_SECS",
        "SWEEPER_DETAIL_CONCURRENCY",
        "SWEEPER_MAX_PAGES",
        "SWEEPER_MAX_CONCURRENCY",
        "SWEEPER_NOTIFICATION_POLICY",
        "SWEEPER_NOTIFY_ON_ABORT",
    ];

    fn reset_env(vars: &[(&str, &str)]) {
        // SAFETY: Tests are marked #[serial] to run sequentially, avoiding env var races
        unsafe {
            for name in VARS {
                env::remove_var(name);
            }
            for (name, value) in vars {
                env::set_var(name, value);
            }
        }
    }

    #[test]
    #[serial]
    fn test_ebs_job_defaults() {
        reset_env(&[("SWEEPER_JOB", "ebs-snapshots")]);

        let config = JobConfig::from_env().unwrap();

        assert_eq!(config.job, JobKind::EbsSnapshots);
        assert_eq!(config.notifier, NotifierConfig::Log);
        assert!(config.artifactory.is_none());
        assert_eq!(config.policy(), RetentionPolicy::Reference);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.inventory.detail_concurrency, 8);
        assert_eq!(config.reconciler.max_concurrency, 1);
        assert_eq!(
            config.reconciler.template.subject,
            "EBS Snapshot Cleanup Notification"
        );
        assert!(config.needs_aws());
    }

    #[test]
    #[serial]
    fn test_artifactory_job() {
        reset_env(&[
            ("SWEEPER_JOB", "artifactory"),
            ("SWEEPER_ARTIFACTORY_URL", "https://artifactory.example.com/artifactory"),
            ("SWEEPER_ARTIFACTORY_REPO", "libs-release-local"),
            ("SWEEPER_ARTIFACTORY_USERNAME", "admin"),
            ("SWEEPER_RETENTION_DAYS", "14"),
            ("SWEEPER_SLACK_WEBHOOK_URL", "https://hooks.slack.com/services/T0/B0/X"),
            ("SWEEPER_SNS_TOPIC_ARN", "arn:aws:sns:us-east-1:123456789012:cleanup"),
            ("SWEEPER_MAX_CONCURRENCY", "4"),
        ]);

        let config = JobConfig::from_env().unwrap();

        assert_eq!(config.job, JobKind::Artifactory);
        assert!(matches!(config.notifier, NotifierConfig::Slack { .. }));
        let artifactory = config.artifactory.as_ref().unwrap();
        assert_eq!(artifactory.repo, "libs-release-local");
        assert!(artifactory.password.is_none());
        assert_eq!(config.policy(), RetentionPolicy::age_days(14));
        assert_eq!(config.reconciler.max_concurrency, 4);
        assert!(config.reconciler.template.preamble.contains("14 days"));
        assert!(!config.needs_aws());
    }

    #[test]
    #[serial]
    fn test_sns_notifier_selected_without_slack() {
        reset_env(&[
            ("SWEEPER_JOB", "ebs"),
            ("SWEEPER_SNS_TOPIC_ARN", "arn:aws:sns:us-east-1:123456789012:cleanup"),
        ]);

        let config = JobConfig::from_env().unwrap();

        assert_eq!(
            config.notifier,
            NotifierConfig::Sns {
                topic_arn: "arn:aws:sns:us-east-1:123456789012:cleanup".to_string()
            }
        );
    }

    #[test]
    #[serial]
    fn test_missing_job() {
        reset_env(&[]);
        let err = JobConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("SWEEPER_JOB")));
    }

    #[test]
    #[serial]
    fn test_unknown_job() {
        reset_env(&[("SWEEPER_JOB", "rds-snapshots")]);
        let err = JobConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: "SWEEPER_JOB", .. }));
    }

    #[test]
    #[serial]
    fn test_artifactory_requires_connection_settings() {
        reset_env(&[
            ("SWEEPER_JOB", "artifactory"),
            ("SWEEPER_ARTIFACTORY_URL", "https://artifactory.example.com/artifactory"),
        ]);
        let err = JobConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnvVar("SWEEPER_ARTIFACTORY_REPO")
        ));
    }

    #[test]
    #[serial]
    fn test_reconciler_settings_from_env() {
        reset_env(&[
            ("SWEEPER_JOB", "ebs-snapshots"),
            ("SWEEPER_NOTIFICATION_POLICY", "fail-closed"),
            ("SWEEPER_NOTIFY_ON_ABORT", "TRUE"),
            ("SWEEPER_MAX_CONCURRENCY", "4"),
        ]);

        let config = JobConfig::from_env().unwrap();

        assert_eq!(
            config.reconciler.notification_policy,
            NotificationPolicy::FailClosed
        );
        assert!(config.reconciler.notify_on_abort);
        assert_eq!(config.reconciler.max_concurrency, 4);
    }

    #[test]
    #[serial]
    fn test_reconciler_defaults_when_unset() {
        reset_env(&[("SWEEPER_JOB", "ebs-snapshots")]);

        let config = JobConfig::from_env().unwrap();

        assert_eq!(
            config.reconciler.notification_policy,
            NotificationPolicy::FailOpen
        );
        assert!(!config.reconciler.notify_on_abort);
    }

    #[test]
    #[serial]
    fn test_misspelled_notification_policy_is_rejected() {
        reset_env(&[
            ("SWEEPER_JOB", "ebs-snapshots"),
            ("SWEEPER_NOTIFICATION_POLICY", "failclosed"),
        ]);

        let err = JobConfig::from_env().unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Reconciler(sweeper_core::ConfigError {
                var: "SWEEPER_NOTIFICATION_POLICY",
                ..
            })
        ));
    }

    #[test]
    #[serial]
    fn test_bad_reconciler_values_are_rejected() {
        for (var, value) in [
            ("SWEEPER_MAX_CONCURRENCY", "abc"),
            ("SWEEPER_MAX_CONCURRENCY", "0"),
            ("SWEEPER_NOTIFY_ON_ABORT", "maybe"),
        ] {
            reset_env(&[("SWEEPER_JOB", "ebs-snapshots"), (var, value)]);

            match JobConfig::from_env() {
                Err(ConfigError::Reconciler(err)) => {
                    assert_eq!(err.var, var);
                    assert_eq!(err.value, value);
                }
                other => panic!("expected {var}={value} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_zero_limits_are_rejected() {
        for var in [
            "SWEEPER_HTTP_TIMEOUT_SECS",
            "SWEEPER_MAX_PAGES",
            "SWEEPER_DETAIL_CONCURRENCY",
        ] {
            reset_env(&[("SWEEPER_JOB", "ebs-snapshots"), (var, "0")]);

            match JobConfig::from_env() {
                Err(ConfigError::InvalidValue { var: rejected, value }) => {
                    assert_eq!(rejected, var);
                    assert_eq!(value, "0");
                }
                other => panic!("expected {var}=0 to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_invalid_number() {
        reset_env(&[
            ("SWEEPER_JOB", "ebs-snapshots"),
            ("SWEEPER_HTTP_TIMEOUT_SECS", "soon"),
        ]);
        let err = JobConfig::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var: "SWEEPER_HTTP_TIMEOUT_SECS", .. }
        ));
    }
}
