use shellforge::error::Error;
use shellforge::registry::ProfileRegistry;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_profile(root: &Path, name: &str, descriptor: &str, templates: &[(&str, &str)]) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("profile.json"), descriptor).unwrap();
    for (rel, content) in templates {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn valid_descriptor(name: &str) -> String {
    format!(
        r#"{{
            "metadata": {{
                "name": "{name}",
                "description": "A test profile",
                "version": "1.0.0",
                "tags": ["test"]
            }},
            "templates": {{
                "flake": "flake.nix.j2",
                "scaffold": [".envrc.j2"]
            }},
            "defaults": {{ "nodeVersion": "20" }}
        }}"#
    )
}

#[test]
fn test_load_valid_profile() {
    let root = TempDir::new().unwrap();
    write_profile(
        root.path(),
        "typescript-node",
        &valid_descriptor("typescript-node"),
        &[("flake.nix.j2", "{}"), (".envrc.j2", "use flake")],
    );

    let registry = ProfileRegistry::load(root.path()).unwrap();
    assert_eq!(registry.count(), 1);
    assert!(registry.has("typescript-node"));

    let profile = registry.get("typescript-node").unwrap();
    assert_eq!(profile.metadata.name, "typescript-node");
    assert_eq!(profile.defaults["nodeVersion"], serde_json::json!("20"));
}

#[test]
fn test_invalid_profile_is_isolated() {
    let root = TempDir::new().unwrap();
    write_profile(
        root.path(),
        "good",
        &valid_descriptor("good"),
        &[("flake.nix.j2", "{}"), (".envrc.j2", "use flake")],
    );
    // Missing required metadata field 'version'
    write_profile(
        root.path(),
        "bad",
        r#"{
            "metadata": {"name": "bad", "description": "no version"},
            "templates": {"flake": "flake.nix.j2"}
        }"#,
        &[("flake.nix.j2", "{}")],
    );

    let registry = ProfileRegistry::load(root.path()).unwrap();
    assert_eq!(registry.count(), 1);
    assert!(registry.has("good"));
    assert!(!registry.has("bad"));
}

#[test]
fn test_profile_without_flake_key_is_rejected() {
    let root = TempDir::new().unwrap();
    write_profile(
        root.path(),
        "no-flake",
        r#"{
            "metadata": {"name": "no-flake", "description": "d", "version": "1.0.0"},
            "templates": {"scaffold": ["a.txt.j2"]}
        }"#,
        &[("a.txt.j2", "x")],
    );

    let registry = ProfileRegistry::load(root.path()).unwrap();
    assert_eq!(registry.count(), 0);
}

#[test]
fn test_profile_with_missing_template_file_is_rejected() {
    let root = TempDir::new().unwrap();
    // Descriptor references a nested leaf that does not exist on disk
    write_profile(
        root.path(),
        "dangling",
        r#"{
            "metadata": {"name": "dangling", "description": "d", "version": "1.0.0"},
            "templates": {
                "flake": "flake.nix.j2",
                "scaffold": {"src": ["src/index.ts.j2"]}
            }
        }"#,
        &[("flake.nix.j2", "{}")],
    );

    let registry = ProfileRegistry::load(root.path()).unwrap();
    assert_eq!(registry.count(), 0);
}

#[test]
fn test_get_unknown_profile_reports_available_names() {
    let root = TempDir::new().unwrap();
    write_profile(
        root.path(),
        "known",
        &valid_descriptor("known"),
        &[("flake.nix.j2", "{}"), (".envrc.j2", "use flake")],
    );

    let registry = ProfileRegistry::load(root.path()).unwrap();
    match registry.get("unknown") {
        Err(Error::ProfileNotFound { name, available }) => {
            assert_eq!(name, "unknown");
            assert_eq!(available, vec!["known".to_string()]);
        }
        other => panic!("expected ProfileNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_list_returns_metadata_only() {
    let root = TempDir::new().unwrap();
    write_profile(
        root.path(),
        "listed",
        &valid_descriptor("listed"),
        &[("flake.nix.j2", "{}"), (".envrc.j2", "use flake")],
    );

    let registry = ProfileRegistry::load(root.path()).unwrap();
    let summaries = registry.list();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "listed");
    assert_eq!(summaries[0].version, "1.0.0");
    assert_eq!(summaries[0].tags, vec!["test".to_string()]);
    // Without an explicit displayName the summary falls back to the name
    assert_eq!(summaries[0].display_name, "listed");
    assert!(summaries[0].examples.is_empty());
}

#[test]
fn test_list_carries_display_name_and_examples() {
    let root = TempDir::new().unwrap();
    write_profile(
        root.path(),
        "fancy",
        r#"{
            "metadata": {
                "name": "fancy",
                "displayName": "Fancy Devshell",
                "description": "d",
                "version": "1.0.0",
                "examples": ["shellforge new . -p fancy"]
            },
            "templates": {"flake": "flake.nix.j2"}
        }"#,
        &[("flake.nix.j2", "{}")],
    );

    let registry = ProfileRegistry::load(root.path()).unwrap();
    let summaries = registry.list();
    assert_eq!(summaries[0].display_name, "Fancy Devshell");
    assert_eq!(summaries[0].examples, vec!["shellforge new . -p fancy".to_string()]);
}

#[test]
fn test_unreadable_templates_root_is_fatal() {
    let missing = Path::new("/nonexistent/templates/root");
    assert!(matches!(
        ProfileRegistry::load(missing),
        Err(Error::Internal { .. })
    ));
}

#[test]
fn test_reload_picks_up_new_profiles() {
    let root = TempDir::new().unwrap();
    let mut registry = ProfileRegistry::load(root.path()).unwrap();
    assert_eq!(registry.count(), 0);

    write_profile(
        root.path(),
        "late",
        &valid_descriptor("late"),
        &[("flake.nix.j2", "{}"), (".envrc.j2", "use flake")],
    );
    registry.reload().unwrap();
    assert_eq!(registry.count(), 1);
    assert!(registry.has("late"));
}

#[test]
fn test_yaml_descriptor_is_supported() {
    let root = TempDir::new().unwrap();
    let dir = root.path().join("yaml-profile");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("profile.yml"),
        "metadata:\n  name: yaml-profile\n  description: yaml descriptor\n  version: 1.0.0\ntemplates:\n  flake: flake.nix.j2\n",
    )
    .unwrap();
    fs::write(dir.join("flake.nix.j2"), "{}").unwrap();

    let registry = ProfileRegistry::load(root.path()).unwrap();
    assert!(registry.has("yaml-profile"));
}
