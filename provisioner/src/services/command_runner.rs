//! Real command runner implementations
//!
//! Commands are spawned directly, never through a shell. Output pipes are
//! drained on helper threads so a chatty command cannot stall on a full pipe
//! while we wait on its timeout.
//!
//! Each command leads its own process group. A timeout kills the whole group,
//! so helpers it forked (`dpkg` under `apt-get`) go down with it.

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::io::Read;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::command::{CommandOutput, CommandSpec};
use crate::error::{ProvisionError, ProvisionResult};
use crate::traits::CommandRunner;
use shared::{step_debug, step_info, step_warn};

/// How often a timed command is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long output is still collected after a timed-out command is killed
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Runs commands on the local machine
#[derive(Debug, Clone, Default)]
pub struct RealCommandRunner;

impl RealCommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn build(spec: &CommandSpec) -> Command {
        let mut command = match &spec.user {
            Some(user) => {
                let mut command = Command::new("runuser");
                command.args(["-u", user.as_str(), "--", spec.program.as_str()]);
                command
            }
            None => Command::new(&spec.program),
        };
        command.args(&spec.args);
        command.envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(cwd) = &spec.cwd {
            command.current_dir(cwd);
        }
        command.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        command.process_group(0);
        command
    }

    fn drain<R: Read + Send + 'static>(reader: Option<R>) -> JoinHandle<String> {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            if let Some(mut reader) = reader {
                let _ = reader.read_to_end(&mut buffer);
            }
            String::from_utf8_lossy(&buffer).into_owned()
        })
    }

    /// Wait for exit, killing the child once `timeout` elapses
    fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                Self::kill_group(child)?;
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// SIGKILL the child's process group, then reap the child
    fn kill_group(child: &mut Child) -> std::io::Result<()> {
        let group = Pid::from_raw(child.id() as i32);
        if let Err(errno) = killpg(group, Signal::SIGKILL) {
            step_warn!("⚠️ Could not kill process group {}: {}", group, errno);
            child.kill()?;
        }
        child.wait()?;
        Ok(())
    }

    /// Output read so far, giving up at `deadline` if the pipe is still open
    fn collect(handle: JoinHandle<String>, deadline: Option<Instant>) -> String {
        if let Some(deadline) = deadline {
            while !handle.is_finished() {
                if Instant::now() >= deadline {
                    return String::new();
                }
                thread::sleep(Duration::from_millis(10));
            }
        }
        handle.join().unwrap_or_default()
    }
}

impl CommandRunner for RealCommandRunner {
    fn run(&self, spec: &CommandSpec) -> ProvisionResult<CommandOutput> {
        let mut child = Self::build(spec).spawn().map_err(|e| ProvisionError::SpawnFailed {
            program: spec.program.clone(),
            message: e.to_string(),
        })?;

        let stdout = Self::drain(child.stdout.take());
        let stderr = Self::drain(child.stderr.take());

        let status = match spec.timeout {
            Some(timeout) => Self::wait_with_timeout(&mut child, timeout)?,
            None => Some(child.wait()?),
        };

        // Something outside the killed group may still hold the pipes open
        let drain_deadline = status.is_none().then(|| Instant::now() + DRAIN_GRACE);
        let stdout = Self::collect(stdout, drain_deadline);
        let mut stderr = Self::collect(stderr, drain_deadline);

        let code = match status {
            Some(status) => status.code(),
            None => {
                let timeout = spec.timeout.unwrap_or_default();
                stderr.push_str(&format!("timed out after {}s", timeout.as_secs()));
                None
            }
        };

        step_debug!("🔚 {} exited with {:?}", spec.description, code);
        Ok(CommandOutput {
            status: code,
            stdout,
            stderr,
        })
    }
}

/// Logs commands instead of running them and reports success
#[derive(Debug, Clone, Default)]
pub struct DryRunCommandRunner;

impl CommandRunner for DryRunCommandRunner {
    fn run(&self, spec: &CommandSpec) -> ProvisionResult<CommandOutput> {
        step_info!("🧪 [dry-run] {}: {}", spec.description, spec);
        Ok(CommandOutput::success(""))
    }
}
