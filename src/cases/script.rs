//! Script execution for the [`ExecutableScript`](super::CaseKind) case.
//!
//! Deliberately narrow: this is not CGI. The interpreter runs the target
//! file with no arguments, no request body on stdin, and no environment
//! forwarding. Standard output becomes the response body; a non-zero exit
//! code or a timeout becomes a [`ServeError::Execution`].

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::warn;

use super::{Body, Outcome, ServeError};

/// Extensions identifying a file as a runnable script.
const SCRIPT_EXTENSIONS: &[&str] = &["py"];

/// Interpreter used to run scripts.
const INTERPRETER: &str = "python3";

/// Wall-clock limit on a script run; the child is killed on expiry.
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Captured stdout is truncated at this many bytes.
const MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// How much stderr to keep for the error message.
const STDERR_CAP: usize = 4096;

/// Returns `true` if the path's extension marks it as a runnable script.
pub fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

/// Runs the target file with the default interpreter and limits.
pub async fn run(path: &Path) -> Outcome {
    run_with(INTERPRETER, path, SCRIPT_TIMEOUT, MAX_OUTPUT_BYTES).await
}

/// Runs `interpreter <path>`, capturing stdout as an HTML body.
///
/// Stdout is read up to `max_output` bytes and truncated beyond that.
/// Exceeding `timeout` kills the child and fails with
/// [`ServeError::Execution`], as does a spawn failure or non-zero exit.
pub async fn run_with(
    interpreter: &str,
    path: &Path,
    timeout: Duration,
    max_output: usize,
) -> Outcome {
    let mut child = Command::new(interpreter)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ServeError::Execution {
            detail: format!("failed to spawn '{interpreter}': {e}"),
        })?;

    let mut stdout_pipe = child.stdout.take().ok_or_else(|| ServeError::Internal {
        detail: "child stdout was not captured".to_owned(),
    })?;
    let mut stderr_pipe = child.stderr.take().ok_or_else(|| ServeError::Internal {
        detail: "child stderr was not captured".to_owned(),
    })?;

    let capture = async {
        // Read both pipes concurrently so a chatty stderr cannot stall the
        // child while we wait on stdout.
        let (stdout, stderr) = tokio::join!(
            read_capped(&mut stdout_pipe, max_output),
            read_capped(&mut stderr_pipe, STDERR_CAP),
        );
        let status = child.wait().await?;
        std::io::Result::Ok((stdout?, stderr?, status))
    };

    let captured = tokio::time::timeout(timeout, capture).await;
    let (stdout, stderr, status) = match captured {
        Ok(Ok(captured)) => captured,
        Ok(Err(e)) => {
            return Err(ServeError::Execution {
                detail: format!("failed to capture script output: {e}"),
            });
        }
        Err(_) => {
            let _ = child.kill().await;
            warn!(path = %path.display(), "script timed out — killed");
            return Err(ServeError::Execution {
                detail: format!("script timed out after {}s", timeout.as_secs()),
            });
        }
    };

    if !status.success() {
        let detail = String::from_utf8_lossy(&stderr).trim().to_owned();
        return Err(ServeError::Execution {
            detail: if detail.is_empty() {
                format!("script exited with {status}")
            } else {
                detail
            },
        });
    }

    Ok(Body::new(stdout, "text/html"))
}

/// Reads at most `cap` bytes from the pipe, then drains the rest so the
/// child never blocks on a full pipe.
async fn read_capped<R>(pipe: &mut R, cap: usize) -> std::io::Result<Vec<u8>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    (&mut *pipe).take(cap as u64).read_to_end(&mut buf).await?;

    let mut sink = [0u8; 8192];
    loop {
        match pipe.read(&mut sink).await? {
            0 => break,
            _ => continue,
        }
    }
    Ok(buf)
}
