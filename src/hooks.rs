//! Post-create hook execution.
//! Runs a profile's optional post-create script with the project directory
//! as working directory, injected environment variables and a hard
//! wall-clock bound. Every outcome except a timeout degrades to an
//! [`ExecutionResult`]; a timeout kills the child and surfaces as the fatal
//! `Error::HookTimeout`.

use crate::constants::{ENV_PROFILE, ENV_PROJECT_NAME, ENV_PROJECT_PATH};
use crate::error::{Error, Result};
use crate::fsops::make_executable;
use log::{info, warn};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Outcome of one hook invocation. A non-zero exit is a soft failure; the
/// scaffold call still succeeds and reports it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    fn soft_failure(exit_code: i32, error: impl Into<String>) -> Self {
        ExecutionResult {
            success: false,
            exit_code,
            stdout: None,
            stderr: None,
            error: Some(error.into()),
        }
    }
}

fn drain(stream: Option<impl Read + Send + 'static>) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_string(&mut buf);
        }
        buf
    })
}

/// Waits for the child within `timeout`, polling so the deadline is a true
/// preemptive cancellation: on expiry the child is killed and reaped before
/// the error is returned.
fn wait_bounded(child: &mut Child, timeout: Duration) -> Result<Option<i32>> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status.code().unwrap_or(-1))),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::IoError(e));
            }
        }
    }
}

/// Executes a profile's post-create hook.
///
/// # Behavior
/// * Script missing on disk: soft result with exit code -1, never an error
/// * Script present: made executable, spawned with cwd = project root and
///   the inherited environment plus the three injected variables
/// * Normal exit (any code): soft result with trimmed stdout/stderr
/// * Timeout: child terminated and reaped, `Error::HookTimeout` returned
pub fn run_post_create_hook(
    profile_root: &Path,
    hook_script: &str,
    project_root: &Path,
    project_name: &str,
    profile_name: &str,
    timeout: Duration,
) -> Result<ExecutionResult> {
    info!("Executing post-create hook...");

    let hook_path = profile_root.join(hook_script);
    if !hook_path.is_file() {
        warn!("Post-create hook not found: {}", hook_path.display());
        return Ok(ExecutionResult::soft_failure(-1, "hook script not found"));
    }

    if let Err(e) = make_executable(&hook_path) {
        warn!("Cannot make hook executable: {}", e);
        return Ok(ExecutionResult::soft_failure(1, e.to_string()));
    }

    // The child chdirs to the project root before exec, so a hook path
    // relative to our own cwd must be absolutized first.
    let hook_path = match std::path::absolute(&hook_path) {
        Ok(path) => path,
        Err(e) => {
            warn!("Cannot resolve hook path: {}", e);
            return Ok(ExecutionResult::soft_failure(1, e.to_string()));
        }
    };

    let mut child = match Command::new(&hook_path)
        .current_dir(project_root)
        .env(ENV_PROJECT_PATH, project_root.as_os_str())
        .env(ENV_PROJECT_NAME, project_name)
        .env(ENV_PROFILE, profile_name)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            warn!("Post-create hook failed to start: {}", e);
            return Ok(ExecutionResult::soft_failure(1, e.to_string()));
        }
    };

    let stdout_handle = drain(child.stdout.take());
    let stderr_handle = drain(child.stderr.take());

    let exit_code = match wait_bounded(&mut child, timeout)? {
        Some(code) => code,
        None => {
            // Reader threads see EOF once the killed child's pipes close.
            let _ = stdout_handle.join();
            let _ = stderr_handle.join();
            return Err(Error::HookTimeout {
                hook: hook_path.display().to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    if exit_code == 0 {
        info!("Post-create hook completed successfully");
    } else {
        warn!("Post-create hook exited with code {}", exit_code);
    }

    Ok(ExecutionResult {
        success: exit_code == 0,
        exit_code,
        stdout: Some(stdout.trim().to_string()),
        stderr: Some(stderr.trim().to_string()),
        error: None,
    })
}
