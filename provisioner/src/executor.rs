//! Retryable execution of external actions
//!
//! Fixed-delay, bounded retries for transient infrastructure failures such as
//! slow package mirrors or a busy admin node. A run starts `Pending`, moves to
//! `Running`, and ends either `Succeeded` or `Failed`, passing through
//! `RetryWait` between failed attempts while attempts remain.

use shared::{step_debug, step_error, step_info, step_warn, RetryPolicy};
use std::fmt;

use crate::core::command::{CommandOutput, CommandSpec};
use crate::error::{ProvisionError, ProvisionResult};
use crate::traits::{CommandRunner, Sleeper};

/// Position of a retried action in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Pending,
    Running { attempt: u32 },
    RetryWait { attempt: u32 },
    Succeeded { attempts: u32 },
    Failed { attempts: u32 },
}

impl RetryState {
    /// State after one transition
    ///
    /// `succeeded` is only consulted when leaving `Running`.
    pub fn next(self, succeeded: bool, policy: &RetryPolicy) -> RetryState {
        match self {
            RetryState::Pending => RetryState::Running { attempt: 1 },
            RetryState::Running { attempt } if succeeded => RetryState::Succeeded { attempts: attempt },
            RetryState::Running { attempt } if attempt < policy.max_attempts() => RetryState::RetryWait { attempt },
            RetryState::Running { attempt } => RetryState::Failed { attempts: attempt },
            RetryState::RetryWait { attempt } => RetryState::Running { attempt: attempt + 1 },
            terminal => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Succeeded { .. } | RetryState::Failed { .. })
    }
}

/// Every attempt failed; carries the most recent failure
#[derive(Debug)]
pub struct RetryError<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed after {} attempt(s): {}", self.attempts, self.last_error)
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryError<E> {}

/// Run `action` under `policy`, sleeping `policy.delay()` between failures.
///
/// The action receives the 1-based attempt number.
pub fn execute_with_retry<T, E, F, S>(
    sleeper: &S,
    description: &str,
    policy: RetryPolicy,
    mut action: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Result<T, E>,
    E: fmt::Display,
    S: Sleeper + ?Sized,
{
    let mut state = RetryState::Pending;

    loop {
        state = match state {
            RetryState::Pending => state.next(false, &policy),
            RetryState::Running { attempt } => {
                step_debug!("▶️ {}: attempt {}/{}", description, attempt, policy.max_attempts());
                let error = match action(attempt) {
                    Ok(value) => {
                        step_debug!("✅ {} succeeded on attempt {}", description, attempt);
                        return Ok(value);
                    }
                    Err(e) => e,
                };
                step_warn!("⚠️ {} failed on attempt {}/{}: {}", description, attempt, policy.max_attempts(), error);

                match state.next(false, &policy) {
                    RetryState::Failed { attempts } => {
                        step_error!("❌ {} gave up after {} attempt(s)", description, attempts);
                        return Err(RetryError { attempts, last_error: error });
                    }
                    waiting => waiting,
                }
            }
            RetryState::RetryWait { attempt } => {
                step_info!(
                    "⏳ Retrying {} in {}s ({} attempt(s) left)",
                    description,
                    policy.delay_seconds(),
                    policy.max_attempts() - attempt
                );
                sleeper.sleep(policy.delay());
                state.next(false, &policy)
            }
            RetryState::Succeeded { .. } | RetryState::Failed { .. } => {
                unreachable!("terminal retry state {:?} left inside the loop", state)
            }
        };
    }
}

/// Command runner paired with the delay used between retries
pub struct RetryExecutor<R, S> {
    runner: R,
    sleeper: S,
}

impl<R: CommandRunner, S: Sleeper> RetryExecutor<R, S> {
    pub fn new(runner: R, sleeper: S) -> Self {
        Self { runner, sleeper }
    }

    /// See [`execute_with_retry`]
    pub fn execute_with_retry<T, E, F>(&self, description: &str, policy: RetryPolicy, action: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Result<T, E>,
        E: fmt::Display,
    {
        execute_with_retry(&self.sleeper, description, policy, action)
    }

    /// Run a command, treating a non-zero exit or a spawn failure as a failed attempt
    pub fn run_command(&self, spec: &CommandSpec, policy: RetryPolicy) -> ProvisionResult<CommandOutput> {
        step_debug!("🔧 {}", spec);
        self.execute_with_retry(&spec.description, policy, |_| match self.runner.run(spec) {
            Ok(output) if output.is_success() => Ok(output),
            Ok(output) => Err(output.failure_detail()),
            Err(e) => Err(e.to_string()),
        })
        .map_err(|e| ProvisionError::CommandFailed {
            description: spec.description.clone(),
            attempts: e.attempts,
            detail: e.last_error,
        })
    }

    /// Run a command once
    pub fn run_once(&self, spec: &CommandSpec) -> ProvisionResult<CommandOutput> {
        self.run_command(spec, RetryPolicy::once())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockCommandRunner, MockSleeper};
    use std::cell::Cell;
    use std::time::Duration;

    fn policy(max_attempts: u32, delay_seconds: u64) -> RetryPolicy {
        RetryPolicy::new(max_attempts, delay_seconds).unwrap()
    }

    #[test]
    fn test_state_transitions() {
        let p = policy(2, 1);
        let running = RetryState::Pending.next(false, &p);
        assert_eq!(running, RetryState::Running { attempt: 1 });
        assert_eq!(running.next(true, &p), RetryState::Succeeded { attempts: 1 });

        let waiting = running.next(false, &p);
        assert_eq!(waiting, RetryState::RetryWait { attempt: 1 });
        let second = waiting.next(false, &p);
        assert_eq!(second, RetryState::Running { attempt: 2 });
        let failed = second.next(false, &p);
        assert_eq!(failed, RetryState::Failed { attempts: 2 });
        assert!(failed.is_terminal());
        assert_eq!(failed.next(true, &p), failed);
    }

    #[test]
    fn test_succeeds_on_third_attempt_with_two_delays() {
        let mut sleeper = MockSleeper::new();
        sleeper
            .expect_sleep()
            .withf(|d| *d == Duration::from_secs(7))
            .times(2)
            .return_const(());

        let calls = Cell::new(0);
        let result: Result<&str, RetryError<String>> = execute_with_retry(&sleeper, "flaky", policy(3, 7), |attempt| {
            calls.set(calls.get() + 1);
            if attempt < 3 {
                Err(format!("attempt {attempt} failed"))
            } else {
                Ok("done")
            }
        });

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_always_failing_stops_at_max_attempts() {
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().times(4).return_const(());

        let calls = Cell::new(0);
        let result: Result<(), RetryError<String>> = execute_with_retry(&sleeper, "doomed", policy(5, 15), |attempt| {
            calls.set(calls.get() + 1);
            Err(format!("boom {attempt}"))
        });

        let err = result.unwrap_err();
        assert_eq!(calls.get(), 5);
        assert_eq!(err.attempts, 5);
        assert_eq!(err.last_error, "boom 5");
        assert_eq!(err.to_string(), "failed after 5 attempt(s): boom 5");
    }

    #[test]
    fn test_action_sees_each_attempt_number_once() {
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().times(3).return_const(());

        let seen = std::cell::RefCell::new(Vec::new());
        let result: Result<(), RetryError<String>> = execute_with_retry(&sleeper, "counted", policy(4, 1), |attempt| {
            seen.borrow_mut().push(attempt);
            Err("nope".to_string())
        });

        assert_eq!(result.unwrap_err().attempts, 4);
        assert_eq!(*seen.borrow(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_first_success_never_sleeps() {
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().never();

        let calls = Cell::new(0);
        let result: Result<u32, RetryError<String>> = execute_with_retry(&sleeper, "quick", policy(5, 15), |attempt| {
            calls.set(calls.get() + 1);
            Ok(attempt)
        });
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_run_command_maps_exhaustion_to_command_failed() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(3)
            .returning(|_| Ok(CommandOutput::failure(Some(100), "E: Could not get lock")));
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().times(2).return_const(());

        let executor = RetryExecutor::new(runner, sleeper);
        let spec = crate::core::command::apt_install("ffmpeg");
        let err = executor.run_command(&spec, policy(3, 10)).unwrap_err();

        match err {
            ProvisionError::CommandFailed { description, attempts, detail } => {
                assert_eq!(description, "install ffmpeg");
                assert_eq!(attempts, 3);
                assert_eq!(detail, "exit status 100: E: Could not get lock");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_run_command_retries_spawn_failures() {
        let mut runner = MockCommandRunner::new();
        let calls = std::sync::atomic::AtomicU32::new(0);
        runner.expect_run().times(2).returning(move |spec| {
            if calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                Err(ProvisionError::SpawnFailed {
                    program: spec.program.clone(),
                    message: "not found".to_string(),
                })
            } else {
                Ok(CommandOutput::success("ok"))
            }
        });
        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().times(1).return_const(());

        let executor = RetryExecutor::new(runner, sleeper);
        let output = executor.run_command(&CommandSpec::new("probe", "true"), policy(2, 0)).unwrap();
        assert_eq!(output.stdout, "ok");
    }
}
