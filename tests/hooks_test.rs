#![cfg(unix)]

use shellforge::error::Error;
use shellforge::hooks::run_post_create_hook;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(10);

fn write_hook(profile_dir: &std::path::Path, name: &str, script: &str) {
    fs::write(profile_dir.join(name), script).unwrap();
}

#[test]
fn test_missing_hook_is_a_soft_result() {
    let profile_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();

    let result = run_post_create_hook(
        profile_dir.path(),
        "post-create.sh",
        project_dir.path(),
        "demo",
        "typescript-node",
        TIMEOUT,
    )
    .unwrap();

    assert!(!result.success);
    assert_eq!(result.exit_code, -1);
    assert_eq!(result.error.as_deref(), Some("hook script not found"));
}

#[test]
fn test_successful_hook_captures_trimmed_output() {
    let profile_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    write_hook(
        profile_dir.path(),
        "post-create.sh",
        "#!/bin/sh\necho \"hello from hook\"\necho \"warn\" >&2\n",
    );

    let result = run_post_create_hook(
        profile_dir.path(),
        "post-create.sh",
        project_dir.path(),
        "demo",
        "typescript-node",
        TIMEOUT,
    )
    .unwrap();

    assert!(result.success);
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout.as_deref(), Some("hello from hook"));
    assert_eq!(result.stderr.as_deref(), Some("warn"));
    assert!(result.error.is_none());
}

#[test]
fn test_nonzero_exit_is_a_soft_failure() {
    let profile_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    write_hook(profile_dir.path(), "post-create.sh", "#!/bin/sh\nexit 3\n");

    let result = run_post_create_hook(
        profile_dir.path(),
        "post-create.sh",
        project_dir.path(),
        "demo",
        "typescript-node",
        TIMEOUT,
    )
    .unwrap();

    assert!(!result.success);
    assert_eq!(result.exit_code, 3);
}

#[test]
fn test_hook_runs_in_project_dir_with_injected_env() {
    let profile_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    write_hook(
        profile_dir.path(),
        "post-create.sh",
        "#!/bin/sh\nprintf '%s|%s|%s' \"$SHELLFORGE_PROJECT_PATH\" \"$SHELLFORGE_PROJECT_NAME\" \"$SHELLFORGE_PROFILE\" > marker.txt\n",
    );

    let result = run_post_create_hook(
        profile_dir.path(),
        "post-create.sh",
        project_dir.path(),
        "demo",
        "typescript-node",
        TIMEOUT,
    )
    .unwrap();
    assert!(result.success);

    // marker.txt lands in the project dir because that is the hook's cwd
    let marker = fs::read_to_string(project_dir.path().join("marker.txt")).unwrap();
    let expected = format!("{}|demo|typescript-node", project_dir.path().display());
    assert_eq!(marker, expected);
}

#[test]
fn test_hook_with_relative_profile_root_runs() {
    // Profile roots are often relative (the CLI defaults to ./templates);
    // the hook must still resolve even though the child chdirs first.
    let project_dir = TempDir::new().unwrap();
    let profile_dir = std::path::PathBuf::from(format!("target/hook-rel-{}", std::process::id()));
    fs::create_dir_all(&profile_dir).unwrap();
    write_hook(&profile_dir, "post-create.sh", "#!/bin/sh\necho ok > hook-ran.txt\n");

    let result = run_post_create_hook(
        &profile_dir,
        "post-create.sh",
        project_dir.path(),
        "demo",
        "typescript-node",
        TIMEOUT,
    )
    .unwrap();
    let _ = fs::remove_dir_all(&profile_dir);

    assert!(result.success, "hook failed: {:?}", result);
    assert_eq!(result.exit_code, 0);
    assert!(project_dir.path().join("hook-ran.txt").exists());
}

#[test]
fn test_hook_exceeding_bound_is_fatal_timeout() {
    let profile_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    write_hook(profile_dir.path(), "post-create.sh", "#!/bin/sh\nsleep 30\n");

    let result = run_post_create_hook(
        profile_dir.path(),
        "post-create.sh",
        project_dir.path(),
        "demo",
        "typescript-node",
        Duration::from_millis(400),
    );

    assert!(matches!(result, Err(Error::HookTimeout { .. })));
}

#[test]
fn test_hook_finishing_inside_bound_is_normal() {
    let profile_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    // Sleeps for a moment but stays well inside the bound
    write_hook(profile_dir.path(), "post-create.sh", "#!/bin/sh\nsleep 1\nexit 2\n");

    let result = run_post_create_hook(
        profile_dir.path(),
        "post-create.sh",
        project_dir.path(),
        "demo",
        "typescript-node",
        TIMEOUT,
    )
    .unwrap();

    assert!(!result.success);
    assert_eq!(result.exit_code, 2);
}
