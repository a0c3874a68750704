//! Sequential change executor.
//!
//! Describes and applies a list of changes in order, collecting a result per
//! change. Execution stops at the first failure unless `continue_on_error`
//! is set; the remaining changes are reported as skipped.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::change::Change;
use crate::client::Cluster;

/// Executor applying changes to one gateway.
pub struct ChangeExecutor<'a> {
    /// Gateway the changes are applied to.
    cluster: &'a dyn Cluster,
    /// Whether to continue after a failed change.
    continue_on_error: bool,
    /// Whether to only describe changes.
    dry_run: bool,
}

/// Status of a single change after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The change was applied.
    Applied,
    /// The change was described only (dry run).
    Planned,
    /// Describing or applying the change failed.
    Failed,
    /// The change was not attempted because an earlier one failed.
    Skipped,
}

/// Result of executing a single change.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyOutcome {
    /// Position of the change in the input.
    pub index: usize,
    /// One-line summary of the change.
    pub summary: String,
    /// Full description, including the diff for updates.
    pub description: Option<String>,
    /// What happened to the change.
    pub status: OutcomeStatus,
    /// Error message (if failed).
    pub error: Option<String>,
}

/// Result of executing a list of changes.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Individual change results, in input order.
    pub outcomes: Vec<ApplyOutcome>,
    /// Number of applied (or planned) changes.
    pub successful: usize,
    /// Number of failed changes.
    pub failed: usize,
    /// Number of skipped changes.
    pub skipped: usize,
    /// Whether every change succeeded.
    pub success: bool,
    /// When execution started.
    pub started_at: DateTime<Utc>,
    /// When execution finished.
    pub finished_at: DateTime<Utc>,
}

impl<'a> ChangeExecutor<'a> {
    /// Creates a new executor.
    #[must_use]
    pub const fn new(cluster: &'a dyn Cluster) -> Self {
        Self {
            cluster,
            continue_on_error: false,
            dry_run: false,
        }
    }

    /// Sets whether to continue on errors.
    #[must_use]
    pub const fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Sets whether to describe changes without applying them.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Executes the changes in order.
    pub async fn execute(&self, changes: &[Change]) -> ExecutionResult {
        info!("Executing {} changes", changes.len());
        let started_at = Utc::now();

        let mut outcomes = Vec::with_capacity(changes.len());
        let mut halted = false;

        for (index, change) in changes.iter().enumerate() {
            if halted {
                warn!("Skipping {change} after earlier failure");
                outcomes.push(ApplyOutcome::new(index, change, OutcomeStatus::Skipped));
                continue;
            }

            let outcome = self.execute_change(index, change).await;
            if outcome.status == OutcomeStatus::Failed && !self.continue_on_error {
                halted = true;
            }
            outcomes.push(outcome);
        }

        ExecutionResult::from_outcomes(outcomes, started_at)
    }

    /// Describes and applies a single change.
    async fn execute_change(&self, index: usize, change: &Change) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::new(index, change, OutcomeStatus::Failed);

        let description = match change.describe() {
            Ok(description) => description,
            Err(e) => {
                error!("Failed to describe {change}: {}", e.report());
                outcome.error = Some(e.report());
                return outcome;
            }
        };
        info!("{}", description.trim_end());
        outcome.description = Some(description);

        if self.dry_run {
            outcome.status = OutcomeStatus::Planned;
            return outcome;
        }

        match change.apply(self.cluster).await {
            Ok(()) => {
                info!("Applied {change}");
                outcome.status = OutcomeStatus::Applied;
            }
            Err(e) => {
                error!("Failed to apply {change}: {}", e.report());
                outcome.error = Some(e.report());
            }
        }

        outcome
    }
}

impl ApplyOutcome {
    fn new(index: usize, change: &Change, status: OutcomeStatus) -> Self {
        Self {
            index,
            summary: change.to_string(),
            description: None,
            status,
            error: None,
        }
    }
}

impl ExecutionResult {
    fn from_outcomes(outcomes: Vec<ApplyOutcome>, started_at: DateTime<Utc>) -> Self {
        let count = |status| outcomes.iter().filter(|o| o.status == status).count();
        let successful = count(OutcomeStatus::Applied) + count(OutcomeStatus::Planned);
        let failed = count(OutcomeStatus::Failed);
        let skipped = count(OutcomeStatus::Skipped);

        Self {
            successful,
            failed,
            skipped,
            success: failed == 0 && skipped == 0,
            outcomes,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Returns the number of changes that were considered.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.outcomes.len()
    }
}

impl std::fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Executed {} changes: {} successful, {} failed, {} skipped",
            self.total(),
            self.successful,
            self.failed,
            self.skipped
        )
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Applied => "applied",
            Self::Planned => "planned",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apisix::{Route, Service};
    use crate::changeset::ChangeSetParser;
    use crate::client::mock::MockCluster;
    use crate::error::ClusterError;

    fn changes() -> Vec<Change> {
        vec![
            Change::create(Service::new("svc-a")),
            Change::create(Route::new("r1").with_service_id("svc-a")),
            Change::delete(Route::new("r-old")),
        ]
    }

    #[tokio::test]
    async fn test_execute_all_successful() {
        let mut cluster = MockCluster::new();
        cluster
            .services
            .expect_create()
            .times(1)
            .returning(|v| Ok(v.clone()));
        cluster
            .routes
            .expect_create()
            .times(1)
            .returning(|v| Ok(v.clone()));
        cluster.routes.expect_delete().times(1).returning(|_| Ok(()));

        let result = ChangeExecutor::new(&cluster).execute(&changes()).await;

        assert!(result.success);
        assert_eq!(result.successful, 3);
        assert!(result.finished_at >= result.started_at);
        assert_eq!(result.to_string(), "Executed 3 changes: 3 successful, 0 failed, 0 skipped");
        assert_eq!(
            result.outcomes[0].description.as_deref(),
            Some("creating service: \"svc-a\"")
        );
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let mut cluster = MockCluster::new();
        cluster
            .services
            .expect_create()
            .times(1)
            .returning(|_| Err(ClusterError::network("connection refused")));

        let result = ChangeExecutor::new(&cluster).execute(&changes()).await;

        assert!(!result.success);
        assert_eq!(result.failed, 1);
        assert_eq!(result.skipped, 2);
        assert_eq!(
            result.outcomes[0].error.as_deref(),
            Some("failed to apply service: network error communicating with gateway: connection refused")
        );
        assert_eq!(result.outcomes[2].status, OutcomeStatus::Skipped);
    }

    #[tokio::test]
    async fn test_continue_on_error() {
        let mut cluster = MockCluster::new();
        cluster
            .services
            .expect_create()
            .times(1)
            .returning(|_| Err(ClusterError::Unauthorized));
        cluster
            .routes
            .expect_create()
            .times(1)
            .returning(|v| Ok(v.clone()));
        cluster.routes.expect_delete().times(1).returning(|_| Ok(()));

        let result = ChangeExecutor::new(&cluster)
            .with_continue_on_error(true)
            .execute(&changes())
            .await;

        assert_eq!(result.successful, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.skipped, 0);
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_calls() {
        let cluster = MockCluster::new();

        let result = ChangeExecutor::new(&cluster)
            .with_dry_run(true)
            .execute(&changes())
            .await;

        assert!(result.success);
        assert!(result
            .outcomes
            .iter()
            .all(|o| o.status == OutcomeStatus::Planned));
    }

    #[tokio::test]
    async fn test_unknown_resource_type_is_a_no_op() {
        let yaml = r"
changes:
  - resource_type: plugin_config
    option: create
    value:
      name: pc1
";
        let set = ChangeSetParser::new()
            .parse_yaml(yaml, None)
            .expect("change set should parse");
        let cluster = MockCluster::new();

        let result = ChangeExecutor::new(&cluster).execute(&set.changes).await;

        assert!(result.success);
        assert_eq!(result.total(), 0);
        assert_eq!(set.skipped.len(), 1);
    }
}
