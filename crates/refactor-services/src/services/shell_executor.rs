//! Single-flight execution of external commands
//!
//! The refactoring tool builds into a shared cargo target directory, so at
//! most one invocation may run at a time. A second request while one is in
//! flight fails immediately instead of queueing.

use async_trait::async_trait;
use lsp_types::MessageType;
use refactor_config::ExecutionConfig;
use refactor_foundation::model::ShellOutput;
use refactor_foundation::{CommandRunner, NotificationSink, ServerError, ServerResult};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Runs command lines through a shell, one at a time
pub struct ShellExecutor {
    shell: String,
    timeout: Option<Duration>,
    in_flight: Mutex<()>,
    log: Arc<dyn NotificationSink>,
}

impl ShellExecutor {
    pub fn new(
        shell: impl Into<String>,
        timeout: Option<Duration>,
        log: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            shell: shell.into(),
            timeout,
            in_flight: Mutex::new(()),
            log,
        }
    }

    pub fn from_config(config: &ExecutionConfig, log: Arc<dyn NotificationSink>) -> Self {
        Self::new(
            config.shell.clone(),
            config.timeout_seconds.map(Duration::from_secs),
            log,
        )
    }

    /// Whether a command is currently running
    pub fn is_executing(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    async fn run(&self, command: &str, working_dir: &Path) -> ServerResult<ShellOutput> {
        let start = Instant::now();

        let mut command_line = Command::new(&self.shell);
        command_line
            .arg("-c")
            .arg(command)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout also reaches the tool under `sh -c`
        #[cfg(unix)]
        command_line.process_group(0);

        let spawn_error = |e: std::io::Error| ServerError::Spawn {
            command: command.to_string(),
            message: e.to_string(),
        };
        let child = command_line.spawn().map_err(spawn_error)?;
        let pid = child.id();
        let running = child.wait_with_output();

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, running).await {
                Ok(output) => output,
                Err(_) => {
                    kill_process_group(pid);
                    return Err(ServerError::Timeout {
                        command: command.to_string(),
                        seconds: limit.as_secs(),
                    });
                }
            },
            None => running.await,
        }
        .map_err(spawn_error)?;

        let result = ShellOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        debug!(
            exit_code = result.exit_code,
            duration_ms = start.elapsed().as_millis() as u64,
            stdout_len = result.stdout.len(),
            stderr_len = result.stderr.len(),
            "Command completed"
        );

        Ok(result)
    }
}

/// Kill every process in the group led by `pid`
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else { return };
    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        debug!(pid, error = %e, "Process group already gone");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

#[async_trait]
impl CommandRunner for ShellExecutor {
    async fn execute(&self, command: &str, working_dir: &Path) -> ServerResult<ShellOutput> {
        // Released on every exit path when the guard drops
        let _guard = self.in_flight.try_lock().map_err(|_| {
            warn!(command = %command, "Rejecting command, another one is executing");
            ServerError::ShellAlreadyExecuting
        })?;

        debug!(
            command = %command,
            working_dir = %working_dir.display(),
            "Executing command"
        );
        self.log
            .log_message(MessageType::LOG, format!("Executing: {}", command))
            .await;

        let result = self.run(command, working_dir).await;

        match &result {
            Ok(output) => {
                self.log
                    .log_message(
                        MessageType::LOG,
                        format!(
                            "exit code: {}\nstdout: {}\nstderr: {}",
                            output.exit_code, output.stdout, output.stderr
                        ),
                    )
                    .await;
            }
            Err(e) => {
                refactor_foundation::log_error!(e, "Command did not complete", command = command);
                self.log
                    .log_message(MessageType::ERROR, e.to_string())
                    .await;
            }
        }

        result
    }
}
