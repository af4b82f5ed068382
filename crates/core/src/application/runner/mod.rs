// Sequence Runner - fail-fast execution of a command sequence

pub mod config;
pub mod constants;
mod diagnostic;

pub use config::{RunnerConfig, ShellSpec};
pub use diagnostic::{exit_code_for, Diagnostic};

use crate::domain::{
    Command, CommandSequence, RunReport, RunState, StepOutcome, Termination,
};
use crate::error::Result;
use crate::port::{CommandExecutor, ExecutionContext, ExecutionError, IdProvider, TimeProvider};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

/// Runs commands one at a time, stopping at the first one that does not succeed
pub struct SequenceRunner {
    executor: Arc<dyn CommandExecutor>,
    time_provider: Arc<dyn TimeProvider>,
    id_provider: Arc<dyn IdProvider>,
    ctx: ExecutionContext,
}

impl SequenceRunner {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        time_provider: Arc<dyn TimeProvider>,
        id_provider: Arc<dyn IdProvider>,
        ctx: ExecutionContext,
    ) -> Self {
        Self {
            executor,
            time_provider,
            id_provider,
            ctx,
        }
    }

    /// Execute `sequence` in order
    ///
    /// Each run is independent: a fresh run id and state machine per call.
    ///
    /// # Errors
    /// - AppError::Execution if waiting on a started process fails
    /// - AppError::Domain on an illegal state transition (a bug)
    pub async fn run(&self, sequence: &CommandSequence) -> Result<RunReport> {
        let run_id = self.id_provider.generate_id();
        let span = info_span!("run", run_id = %run_id);
        self.run_inner(run_id, sequence).instrument(span).await
    }

    async fn run_inner(&self, run_id: String, sequence: &CommandSequence) -> Result<RunReport> {
        let total = sequence.len();
        let started_at = self.time_provider.now_millis();
        let mut state = RunState::Idle.start(total)?;
        let mut steps = Vec::with_capacity(total);

        info!(
            commands = total,
            working_dir = %self.ctx.working_dir.display(),
            "Starting command sequence"
        );

        for (index, command) in sequence.iter().enumerate() {
            let outcome = self.run_step(index, command).await?;
            let succeeded = outcome.is_success();
            steps.push(outcome);

            if succeeded {
                state = state.succeed(total)?;
                continue;
            }

            state = state.fail()?;
            info!(
                index,
                command = %command,
                skipped = total - index - 1,
                "Command failed, stopping sequence"
            );
            break;
        }

        let finished_at = self.time_provider.now_millis();
        info!(state = %state, executed = steps.len(), "Command sequence finished");

        Ok(RunReport {
            run_id,
            state,
            steps,
            total,
            started_at,
            finished_at,
        })
    }

    async fn run_step(&self, index: usize, command: &Command) -> Result<StepOutcome> {
        info!(index, command = %command, "Running command");

        let outcome = match self.executor.execute(command, &self.ctx).await {
            Ok(result) => StepOutcome {
                index,
                command: command.clone(),
                status: result.status,
                termination: result.termination,
                duration_ms: result.duration_ms,
                stdout: result.stdout,
                stderr: result.stderr,
            },
            Err(ExecutionError::SpawnFailed(reason)) => {
                let termination = Termination::NotStarted {
                    reason: reason.clone(),
                };
                StepOutcome {
                    index,
                    command: command.clone(),
                    status: termination.status(),
                    termination,
                    duration_ms: 0,
                    stdout: String::new(),
                    stderr: reason,
                }
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            index,
            command = %command,
            status = ?outcome.status,
            exit_code = ?outcome.termination.exit_code(),
            duration_ms = outcome.duration_ms,
            "Command finished"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExecutionStatus;
    use crate::port::command_executor::mocks::{MockBehavior, MockCommandExecutor};
    use crate::port::id_provider::SequentialIdProvider;
    use crate::port::time_provider::SteppingTimeProvider;
    use crate::AppError;

    fn runner(executor: MockCommandExecutor) -> SequenceRunner {
        SequenceRunner::new(
            Arc::new(executor),
            Arc::new(SteppingTimeProvider::new(1000, 5)),
            Arc::new(SequentialIdProvider::default()),
            ExecutionContext::default(),
        )
    }

    fn seq(lines: &[&str]) -> CommandSequence {
        CommandSequence::new(
            lines
                .iter()
                .map(|l| Command::argv(*l, Vec::<String>::new()).unwrap())
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_all_succeed_runs_everything_in_order() {
        let executor = MockCommandExecutor::new();
        let report = runner(executor.clone())
            .run(&seq(&["a", "b", "c"]))
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.state, RunState::Completed);
        assert_eq!(executor.calls(), vec!["a", "b", "c"]);
        assert_eq!(report.skipped(), 0);
        assert!(report.failure().is_none());
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let executor =
            MockCommandExecutor::new().with("false", MockBehavior::Exit(1, String::new()));
        let report = runner(executor.clone())
            .run(&seq(&["true", "false", "true"]))
            .await
            .unwrap();

        assert_eq!(report.state, RunState::Failed { index: 1 });
        assert_eq!(executor.calls(), vec!["true", "false"]);
        assert_eq!(report.skipped(), 1);

        let failure = report.failure().unwrap();
        assert_eq!(failure.command.to_string(), "false");
        assert_eq!(failure.termination.exit_code(), Some(1));
    }

    #[tokio::test]
    async fn test_kth_failure_executes_exactly_k_commands() {
        let names = ["s1", "s2", "s3", "s4", "s5"];
        for k in 0..names.len() {
            let executor = MockCommandExecutor::new()
                .with(names[k], MockBehavior::Exit(3, "bad".to_string()));
            let report = runner(executor.clone()).run(&seq(&names)).await.unwrap();

            assert_eq!(executor.call_count(), k + 1);
            assert_eq!(executor.calls(), names[..=k].to_vec());
            assert_eq!(report.state, RunState::Failed { index: k });
            assert_eq!(report.skipped(), names.len() - k - 1);
        }
    }

    #[tokio::test]
    async fn test_spawn_failure_is_a_step_failure() {
        let executor = MockCommandExecutor::new()
            .with("missing", MockBehavior::SpawnFail("No such file".to_string()));
        let report = runner(executor.clone())
            .run(&seq(&["missing", "after"]))
            .await
            .unwrap();

        assert_eq!(executor.calls(), vec!["missing"]);
        let failure = report.failure().unwrap();
        assert_eq!(failure.status, ExecutionStatus::NotStarted);
        assert_eq!(failure.combined_output(), "No such file");
    }

    #[tokio::test]
    async fn test_signal_is_a_step_failure() {
        let executor = MockCommandExecutor::new().with("crash", MockBehavior::Signal(11));
        let report = runner(executor).run(&seq(&["crash", "x"])).await.unwrap();

        assert_eq!(report.state, RunState::Failed { index: 0 });
        assert_eq!(report.failure().unwrap().status, ExecutionStatus::Killed);
    }

    #[tokio::test]
    async fn test_empty_sequence_completes() {
        let executor = MockCommandExecutor::new();
        let report = runner(executor.clone())
            .run(&CommandSequence::new(Vec::new()))
            .await
            .unwrap();

        assert!(report.is_success());
        assert!(report.executed().is_empty());
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_independent() {
        let executor = MockCommandExecutor::new();
        let runner = runner(executor.clone());
        let sequence = seq(&["a", "b"]);

        let first = runner.run(&sequence).await.unwrap();
        let second = runner.run(&sequence).await.unwrap();

        assert!(first.is_success() && second.is_success());
        assert_ne!(first.run_id, second.run_id);
        assert_eq!(second.steps.len(), 2);
        assert_eq!(executor.calls(), vec!["a", "b", "a", "b"]);
    }

    #[tokio::test]
    async fn test_io_error_propagates() {
        struct BrokenExecutor;

        #[async_trait::async_trait]
        impl CommandExecutor for BrokenExecutor {
            async fn execute(
                &self,
                _command: &Command,
                _ctx: &ExecutionContext,
            ) -> std::result::Result<crate::port::ExecutionResult, ExecutionError> {
                Err(ExecutionError::IoError("pipe closed".to_string()))
            }
        }

        let runner = SequenceRunner::new(
            Arc::new(BrokenExecutor),
            Arc::new(SteppingTimeProvider::new(0, 1)),
            Arc::new(SequentialIdProvider::default()),
            ExecutionContext::default(),
        );
        let result = runner.run(&seq(&["a"])).await;
        assert!(matches!(result, Err(AppError::Execution(_))));
    }
}
