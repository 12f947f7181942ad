//! Scaffolding orchestration.
//! Composes the config loader, profile registry, template renderer, atomic
//! writer and hook executor into the single end-to-end use case: materialize
//! a profile into an existing project directory.

use crate::config::{load_project_config, load_user_config};
use crate::constants::HOOK_TIMEOUT;
use crate::error::{Error, Result};
use crate::generator::generate_files;
use crate::hooks::{run_post_create_hook, ExecutionResult};
use crate::merge::merge_layers;
use crate::profile::ProfileSummary;
use crate::registry::ProfileRegistry;
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::validation::Validator;
use log::info;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::time::Duration;

/// One scaffold request: target directory, profile name and per-request
/// option overrides (the highest-precedence configuration layer).
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub project_path: PathBuf,
    pub profile: String,
    pub options: Map<String, Value>,
}

/// Result of a successful scaffold call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaffoldOutput {
    pub success: bool,
    pub files_created: Vec<PathBuf>,
    pub profile: String,
    pub configuration: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_result: Option<ExecutionResult>,
}

/// Owns the collaborating components. The registry is read-only after
/// construction; requests borrow it shared, so unlimited concurrent readers
/// are safe.
pub struct Scaffolder {
    registry: ProfileRegistry,
    renderer: Box<dyn TemplateRenderer>,
    validator: Validator,
    hook_timeout: Duration,
}

impl Scaffolder {
    pub fn new(registry: ProfileRegistry) -> Result<Self> {
        Ok(Scaffolder {
            registry,
            renderer: Box::new(MiniJinjaRenderer::new()),
            validator: Validator::new()?,
            hook_timeout: HOOK_TIMEOUT,
        })
    }

    /// Overrides the hook wall-clock bound. Tests use this to exercise the
    /// timeout path without waiting out the default.
    pub fn with_hook_timeout(mut self, timeout: Duration) -> Self {
        self.hook_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Reloads the profile registry. Takes `&mut self`, so it is exclusive
    /// with every in-flight request by construction.
    pub fn reload_profiles(&mut self) -> Result<()> {
        self.registry.reload()
    }

    /// Lists metadata summaries of every registered profile.
    pub fn list_profiles(&self) -> Vec<ProfileSummary> {
        self.registry.list()
    }

    /// The end-to-end scaffold operation.
    ///
    /// Any failure before the template walk aborts with no partial output.
    /// Once the walk has started, already-written files are never rolled
    /// back; that is safe because only new files are ever created, existing
    /// ones are never overwritten or deleted.
    pub fn create_scaffold(&self, request: &ScaffoldRequest) -> Result<ScaffoldOutput> {
        info!("Creating scaffold for profile: {}", request.profile);

        let project_path_str = request.project_path.display().to_string();
        self.validator.validate_request(&json!({
            "projectPath": project_path_str,
            "profile": request.profile,
            "options": Value::Object(request.options.clone()),
        }))?;
        if project_path_str.contains("..") || project_path_str.contains('\0') {
            return Err(Error::InvalidInput {
                message: format!("project path must not contain traversal segments: {}", project_path_str),
            });
        }

        if !request.project_path.is_dir() {
            return Err(Error::DirectoryNotFound { path: project_path_str });
        }

        let user_config = load_user_config()?;
        let project_config = load_project_config(&request.project_path)?;

        let profile = self.registry.get(&request.profile)?;

        let configuration = merge_layers(
            &profile.defaults,
            user_config.as_ref(),
            project_config.as_ref(),
            &request.options,
        );

        let config_value = Value::Object(configuration.clone());
        self.validator.validate_config(&config_value)?;
        self.validator.validate_profile_options(&config_value, profile.metadata.schema.as_ref())?;

        let project_name = configuration
            .get("projectName")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                request
                    .project_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| project_path_str.clone())
            });

        // Computed fields win over merged configuration keys of the same name.
        let mut context = configuration.clone();
        context.insert("profile".to_string(), json!(profile.metadata.name));
        context.insert("projectPath".to_string(), json!(project_path_str));
        context.insert("projectName".to_string(), json!(project_name));
        let context = Value::Object(context);

        let files_created =
            generate_files(profile, &context, &request.project_path, self.renderer.as_ref())?;

        let hook_result = match &profile.metadata.post_create {
            Some(hook_script) => Some(run_post_create_hook(
                &profile.root,
                hook_script,
                &request.project_path,
                &project_name,
                &profile.metadata.name,
                self.hook_timeout,
            )?),
            None => None,
        };

        info!("Scaffold completed: {} files created", files_created.len());

        Ok(ScaffoldOutput {
            success: true,
            files_created,
            profile: profile.metadata.name.clone(),
            configuration,
            hook_result,
        })
    }
}
