//! Common constants used throughout the shellforge application.

use std::time::Duration;

/// Supported profile descriptor file names, tried in order
pub const PROFILE_FILES: [&str; 3] = ["profile.json", "profile.yml", "profile.yaml"];

/// Supported project-level configuration file names, tried in order
pub const PROJECT_CONFIG_FILES: [&str; 3] =
    ["shellforge.json", "shellforge.yml", "shellforge.yaml"];

/// Supported user-level configuration file names, tried in order
pub const USER_CONFIG_FILES: [&str; 3] = ["config.json", "config.yml", "config.yaml"];

/// Directory under the user's config home holding the user configuration
pub const CONFIG_DIR_NAME: &str = "shellforge";

/// Suffix marking a file as a renderable template; stripped from destinations
pub const TEMPLATE_SUFFIX: &str = ".j2";

/// Template tree key that every profile must provide a leaf under
pub const FLAKE_KEY: &str = "flake";

/// Wall-clock bound for post-create hook execution
pub const HOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variables injected into the post-create hook
pub const ENV_PROJECT_PATH: &str = "SHELLFORGE_PROJECT_PATH";
pub const ENV_PROJECT_NAME: &str = "SHELLFORGE_PROJECT_NAME";
pub const ENV_PROFILE: &str = "SHELLFORGE_PROFILE";
