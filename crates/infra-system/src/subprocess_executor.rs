// Subprocess executor implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command as ProcessCommand;
use tracing::{debug, info};

use seqrun_core::application::ShellSpec;
use seqrun_core::domain::{Command, Termination};
use seqrun_core::port::{
    CommandExecutor, ExecutionContext, ExecutionError, ExecutionResult, TimeProvider,
};

type Sink = Box<dyn AsyncWrite + Unpin + Send>;

const TEE_BUFFER_SIZE: usize = 8 * 1024;

/// Where child output is streamed while it is being captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEcho {
    /// Capture only
    #[default]
    Silent,
    /// Child stdout to our stdout, child stderr to our stderr
    Terminal,
    /// Both child streams to our stderr (keeps our stdout machine-readable)
    Stderr,
}

/// Subprocess executor
/// Spawns one child process per command, captures stdout/stderr, inherits the environment
pub struct SubprocessExecutor {
    time_provider: Arc<dyn TimeProvider>,
    shell: ShellSpec,
    echo: OutputEcho,
}

impl SubprocessExecutor {
    /// Create a new subprocess executor
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    /// * `shell` - Shell used for `Command::Shell` lines
    ///
    /// # Example
    /// ```ignore
    /// let executor = SubprocessExecutor::new(Arc::new(SystemTimeProvider), ShellSpec::default());
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>, shell: ShellSpec) -> Self {
        Self {
            time_provider,
            shell,
            echo: OutputEcho::Silent,
        }
    }

    /// Stream child output live while still capturing it
    pub fn with_echo(mut self, echo: OutputEcho) -> Self {
        self.echo = echo;
        self
    }

    fn sinks(&self) -> (Option<Sink>, Option<Sink>) {
        match self.echo {
            OutputEcho::Silent => (None, None),
            OutputEcho::Terminal => (
                Some(Box::new(tokio::io::stdout())),
                Some(Box::new(tokio::io::stderr())),
            ),
            OutputEcho::Stderr => (
                Some(Box::new(tokio::io::stderr())),
                Some(Box::new(tokio::io::stderr())),
            ),
        }
    }

    /// Build the OS process for `command`
    fn build_process(&self, command: &Command, ctx: &ExecutionContext) -> ProcessCommand {
        let mut process = match command {
            Command::Argv { program, args } => {
                let mut p = ProcessCommand::new(program);
                p.args(args);
                p
            }
            Command::Shell { line } => {
                let mut p = ProcessCommand::new(&self.shell.program);
                p.arg(&self.shell.flag).arg(line);
                p
            }
        };

        process
            .current_dir(&ctx.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        process
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(
        &self,
        command: &Command,
        ctx: &ExecutionContext,
    ) -> Result<std::process::Output, ExecutionError> {
        let mut child = self
            .build_process(command, ctx)
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", command.program(), e)))?;

        debug!(pid = ?child.id(), echo = ?self.echo, "Child process spawned");

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecutionError::IoError("Failed to capture stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExecutionError::IoError("Failed to capture stderr".to_string()))?;
        let (out_sink, err_sink) = self.sinks();

        // Both pipes are drained concurrently so neither can fill up and block the child
        let (stdout, stderr, status) =
            tokio::try_join!(tee(stdout, out_sink), tee(stderr, err_sink), child.wait())
                .map_err(|e| ExecutionError::IoError(e.to_string()))?;

        Ok(std::process::Output {
            status,
            stdout,
            stderr,
        })
    }

    /// Build execution result from process output
    fn build_result(&self, output: std::process::Output, duration_ms: i64) -> ExecutionResult {
        ExecutionResult::from_termination(
            termination_of(output.status),
            duration_ms,
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
        )
    }
}

/// Copy `reader` to `sink` as it arrives, returning everything read
async fn tee<R, W>(mut reader: R, mut sink: Option<W>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut captured = Vec::new();
    let mut buf = [0u8; TEE_BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        captured.extend_from_slice(&buf[..n]);
        if let Some(sink) = sink.as_mut() {
            sink.write_all(&buf[..n]).await?;
            sink.flush().await?;
        }
    }

    Ok(captured)
}

/// Map an OS exit status to a `Termination`
fn termination_of(status: ExitStatus) -> Termination {
    if let Some(code) = status.code() {
        return Termination::Exited { code };
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            let name = nix::sys::signal::Signal::try_from(signal)
                .ok()
                .map(|s| s.as_str().to_string());
            return Termination::Signaled { signal, name };
        }
    }

    Termination::NotStarted {
        reason: format!("no exit status: {}", status),
    }
}

#[async_trait]
impl CommandExecutor for SubprocessExecutor {
    async fn execute(
        &self,
        command: &Command,
        ctx: &ExecutionContext,
    ) -> Result<ExecutionResult, ExecutionError> {
        let start_time = self.time_provider.now_millis();

        info!(
            command = %command,
            working_dir = %ctx.working_dir.display(),
            "Starting subprocess execution"
        );

        let output = self.spawn_and_wait(command, ctx).await?;

        let duration_ms = self.time_provider.now_millis() - start_time;
        let result = self.build_result(output, duration_ms);

        info!(
            command = %command,
            duration_ms = %duration_ms,
            exit_code = ?result.exit_code(),
            status = ?result.status,
            "Subprocess execution completed"
        );

        Ok(result)
    }
}
