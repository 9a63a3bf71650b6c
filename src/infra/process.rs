//! External process invocation.
//!
//! Every workflow step that touches an outside tool goes through
//! [`CommandRunner`], so services can be exercised against a recording fake.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A single child process invocation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    /// Extra variables for the child only; the parent environment is untouched.
    pub envs: Vec<(String, String)>,
    pub stdin: Option<String>,
    /// Keep stdout out of the `info` log (machine-read output).
    pub quiet: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Last value set for an environment key.
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Program and arguments, suitable for logs.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let envs: Vec<(&str, &str)> = self
            .envs
            .iter()
            .map(|(k, v)| {
                if k.to_ascii_uppercase().contains("PASSWORD") {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();

        f.debug_struct("CommandSpec")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("current_dir", &self.current_dir)
            .field("envs", &envs)
            .field("stdin", &self.stdin.as_ref().map(|s| format!("[{} bytes]", s.len())))
            .field("quiet", &self.quiet)
            .finish()
    }
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the child was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs external programs to completion.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command and capture its output, whatever the exit status.
    ///
    /// Output lines are logged as they arrive.
    ///
    /// Returns [`AppError::ToolNotFound`] when the program cannot be started.
    async fn output(&self, spec: &CommandSpec) -> AppResult<CommandOutput>;

    /// Whether the program can be started at all.
    async fn is_available(&self, program: &str) -> bool;
}

/// Run a command and turn a non-zero exit into [`AppError::CommandFailed`].
pub async fn run_checked<R>(runner: &R, spec: &CommandSpec) -> AppResult<CommandOutput>
where
    R: CommandRunner + ?Sized,
{
    tracing::debug!(command = %spec, "Running");
    let output = runner.output(spec).await?;

    if !output.success() {
        return Err(AppError::command_failed(
            spec.program.clone(),
            output.code,
            output.stderr,
        ));
    }

    Ok(output)
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn output(&self, spec: &CommandSpec) -> AppResult<CommandOutput> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true);

        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|e| spawn_error(&spec.program, e))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // The pipe is dropped at the end of the block so the child sees EOF.
        let feed = async move {
            if let (Some(input), Some(mut pipe)) = (spec.stdin.as_deref(), stdin) {
                match pipe.write_all(input.as_bytes()).await {
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };
        let stdout_level = if spec.quiet { Echo::Debug } else { Echo::Info };

        let (fed, stdout, stderr, status) = tokio::join!(
            feed,
            drain(stdout, &spec.program, stdout_level),
            drain(stderr, &spec.program, Echo::Debug),
            child.wait(),
        );
        fed?;

        Ok(CommandOutput {
            code: status?.code(),
            stdout: stdout?,
            stderr: stderr?,
        })
    }

    async fn is_available(&self, program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy)]
enum Echo {
    Info,
    Debug,
}

/// Read a child pipe to the end, logging each line as it arrives.
async fn drain<R>(pipe: Option<R>, program: &str, echo: Echo) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(String::new());
    };

    let mut reader = BufReader::new(pipe);
    let mut captured = String::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&line);
        let trimmed = text.trim_end();
        if !trimmed.is_empty() {
            match echo {
                Echo::Info => tracing::info!(command = program, "{}", trimmed),
                Echo::Debug => tracing::debug!(command = program, "{}", trimmed),
            }
        }
        captured.push_str(&text);
    }

    Ok(captured)
}

fn spawn_error(program: &str, err: std::io::Error) -> AppError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => {
            AppError::ToolNotFound(program.to_string())
        }
        _ => AppError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn test_env_value_returns_last_write() {
        let spec = CommandSpec::new("python")
            .env("DB_NAME", "first")
            .env("DB_NAME", "second");
        assert_eq!(spec.env_value("DB_NAME"), Some("second"));
        assert_eq!(spec.env_value("DB_HOST"), None);
    }

    #[test]
    fn test_display_shows_program_and_args() {
        let spec = CommandSpec::new("python").args(["manage.py", "migrate"]);
        assert_eq!(spec.to_string(), "python manage.py migrate");
    }

    #[test]
    fn test_debug_redacts_passwords_and_stdin() {
        let spec = CommandSpec::new("psql")
            .env("PGPASSWORD", "secret")
            .env("DB_HOST", "localhost")
            .stdin("CREATE ROLE x PASSWORD 'secret'");
        let debug = format!("{:?}", spec);

        assert!(!debug.contains("secret"));
        assert!(debug.contains("localhost"));
    }

    #[tokio::test]
    async fn test_run_checked_maps_failure() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .returning(|_| Ok(CommandOutput::failed(3, "boom")));

        let err = run_checked(&runner, &CommandSpec::new("python"))
            .await
            .unwrap_err();

        match err {
            AppError::CommandFailed { program, stderr, .. } => {
                assert_eq!(program, "python");
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_checked_passes_success_through() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_output()
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("done\n")));

        let output = run_checked(&runner, &CommandSpec::new("python"))
            .await
            .unwrap();
        assert_eq!(output.stdout, "done\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    #[traced_test]
    async fn test_system_runner_logs_stdout_lines_at_info() {
        let spec = CommandSpec::new("sh").args(["-c", "echo step-one; echo step-two"]);

        let output = SystemRunner::new().output(&spec).await.unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "step-one\nstep-two\n");
        assert!(logs_contain("step-one"));
        logs_assert(|lines: &[&str]| {
            if lines
                .iter()
                .any(|line| line.contains(" INFO ") && line.contains("step-two"))
            {
                Ok(())
            } else {
                Err("stdout line was not logged at info".to_string())
            }
        });
    }

    #[cfg(unix)]
    #[tokio::test]
    #[traced_test]
    async fn test_quiet_stdout_stays_below_info() {
        let spec = CommandSpec::new("sh")
            .args(["-c", "echo catalog-row"])
            .quiet();

        let output = SystemRunner::new().output(&spec).await.unwrap();

        assert_eq!(output.stdout, "catalog-row\n");
        logs_assert(|lines: &[&str]| {
            if lines
                .iter()
                .any(|line| line.contains(" INFO ") && line.contains("catalog-row"))
            {
                Err("quiet stdout was logged at info".to_string())
            } else {
                Ok(())
            }
        });
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_feeds_stdin_and_captures_stderr() {
        let echoed = SystemRunner::new()
            .output(&CommandSpec::new("cat").stdin("SELECT 1;\n"))
            .await
            .unwrap();
        assert_eq!(echoed.stdout, "SELECT 1;\n");

        let failed = SystemRunner::new()
            .output(&CommandSpec::new("sh").args(["-c", "echo oops 1>&2; exit 3"]))
            .await
            .unwrap();
        assert_eq!(failed.code, Some(3));
        assert_eq!(failed.stderr, "oops\n");
    }

    #[tokio::test]
    async fn test_system_runner_reports_missing_tool() {
        let runner = SystemRunner::new();
        let spec = CommandSpec::new("crm-ops-definitely-missing-tool");

        assert!(!runner.is_available(&spec.program).await);
        assert!(matches!(
            runner.output(&spec).await,
            Err(AppError::ToolNotFound(_))
        ));
    }
}
