//! Running the external parser.
//!
//! The parser under test is a black box: it is handed one query on stdin
//! and its exit status is the only thing observed. A zero status means the
//! query parsed; anything else (rejection, crash, death by signal) counts
//! as a failure. Each query gets a fresh process so a crash on one query
//! cannot leak into the next.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Flag that puts the parser into parse-check mode.
pub const PARSE_FLAG: &str = "--parse";

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Something that can tell whether a query parses.
pub trait Oracle {
    /// Returns `Ok(true)` if the query parses. `Err` is reserved for
    /// failures of the harness itself, never for parse failures.
    fn parses(&mut self, query: &str) -> Result<bool, OracleError>;
}

impl<F> Oracle for F
where
    F: FnMut(&str) -> bool,
{
    fn parses(&mut self, query: &str) -> Result<bool, OracleError> {
        Ok(self(query))
    }
}

/// Errors from driving the oracle process
#[derive(Debug)]
pub enum OracleError {
    /// The process could not be started
    Spawn { program: PathBuf, source: io::Error },
    /// Waiting for the process failed
    Wait(io::Error),
    /// A timed-out process could not be killed
    Kill(io::Error),
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::Spawn { program, source } => {
                write!(f, "Failed to start oracle {}: {}", program.display(), source)
            }
            OracleError::Wait(e) => write!(f, "Failed waiting for oracle: {}", e),
            OracleError::Kill(e) => write!(f, "Failed to kill timed-out oracle: {}", e),
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OracleError::Spawn { source, .. } => Some(source),
            OracleError::Wait(e) | OracleError::Kill(e) => Some(e),
        }
    }
}

/// Oracle backed by one child process per query.
#[derive(Debug, Clone)]
pub struct ProcessOracle {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessOracle {
    /// Invoke `program --parse`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ProcessOracle {
            program: program.into(),
            args: vec![PARSE_FLAG.to_string()],
            timeout: None,
        }
    }

    /// Replace the argument list.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kill the process and count the query as failed after `timeout`.
    /// Without a timeout a hung parser blocks forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn spawn(&self) -> Result<ChildGuard, OracleError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| OracleError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        Ok(ChildGuard { child, reaped: false })
    }
}

impl Oracle for ProcessOracle {
    fn parses(&mut self, query: &str) -> Result<bool, OracleError> {
        let mut guard = self.spawn()?;
        guard.feed(query);

        let status = match self.timeout {
            None => guard.wait()?,
            Some(limit) => match guard.wait_timeout(limit)? {
                Some(status) => status,
                None => {
                    tracing::warn!(
                        program = %self.program.display(),
                        timeout_ms = limit.as_millis() as u64,
                        "oracle timed out, counting query as failed"
                    );
                    guard.kill()?;
                    return Ok(false);
                }
            },
        };

        Ok(status.success())
    }
}

/// Owns a spawned oracle until it has been reaped.
///
/// Dropping an unreaped guard kills and waits on the child, so no early
/// return or panic leaves a stray process behind.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    /// Write the query and close stdin.
    fn feed(&mut self, query: &str) {
        if let Some(mut stdin) = self.child.stdin.take() {
            // A parser that exits without draining stdin gives EPIPE; its
            // exit status still decides the verdict.
            if let Err(e) = stdin.write_all(query.as_bytes()) {
                tracing::debug!(error = %e, "oracle closed stdin early");
            }
        }
    }

    fn wait(&mut self) -> Result<ExitStatus, OracleError> {
        let status = self.child.wait().map_err(OracleError::Wait)?;
        self.reaped = true;
        Ok(status)
    }

    fn wait_timeout(&mut self, limit: Duration) -> Result<Option<ExitStatus>, OracleError> {
        let deadline = Instant::now() + limit;
        loop {
            if let Some(status) = self.child.try_wait().map_err(OracleError::Wait)? {
                self.reaped = true;
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn kill(&mut self) -> Result<(), OracleError> {
        // The child may exit between the last poll and the kill.
        if let Err(e) = self.child.kill() {
            if e.kind() != io::ErrorKind::InvalidInput {
                return Err(OracleError::Kill(e));
            }
        }
        self.wait().map(|_| ())
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
