//! External tool invocation.

use duct::cmd;
use eyre::{Result, WrapErr, bail};
use std::ffi::OsString;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lines of stderr kept in error reports.
const STDERR_TAIL: usize = 8;

/// Run `program` to completion, killing it once `timeout` elapses.
///
/// Stdout is discarded. Stderr is captured and its tail attached to the
/// error when the tool fails.
pub fn run_with_timeout(program: &str, args: &[OsString], timeout: Duration) -> Result<()> {
    tracing::debug!(program, ?args, "running external tool");

    let handle = cmd(program, args)
        .stdout_null()
        .stderr_capture()
        .unchecked()
        .start()
        .wrap_err_with(|| format!("failed to start {program}, is it installed?"))?;

    let started = Instant::now();

    loop {
        if let Some(output) = handle
            .try_wait()
            .wrap_err_with(|| format!("failed to wait for {program}"))?
        {
            if output.status.success() {
                tracing::debug!(program, elapsed = ?started.elapsed(), "external tool finished");
                return Ok(());
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{program} exited with {}:\n{}",
                output.status,
                stderr_tail(&stderr, STDERR_TAIL)
            );
        }

        if started.elapsed() >= timeout {
            handle
                .kill()
                .wrap_err_with(|| format!("failed to kill {program}"))?;
            bail!("{program} timed out after {}s", timeout.as_secs());
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Run `program` and return its trimmed stdout.
pub fn read_stdout(program: &str, args: &[OsString]) -> Result<String> {
    tracing::debug!(program, ?args, "reading external tool output");

    let output = cmd(program, args)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .run()
        .wrap_err_with(|| format!("failed to start {program}, is it installed?"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "{program} exited with {}:\n{}",
            output.status,
            stderr_tail(&stderr, STDERR_TAIL)
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn stderr_tail(stderr: &str, lines: usize) -> String {
    let all: Vec<&str> = stderr.trim_end().lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
