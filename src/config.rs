//! Cleanup rule configuration.
//! Loads the rule file that tells the hook which generated paths to remove or
//! rename for a given set of answers. JSON is tried first, then YAML.

use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Supported rule file names
pub const CONFIG_FILES: [&str; 3] = ["cleanup.json", "cleanup.yml", "cleanup.yaml"];

/// Directories under the template root searched for a rule file, in order.
pub const CONFIG_DIRS: [&str; 2] = ["hooks", ""];

/// Removes `paths` when `when` evaluates truthy (or is absent).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RemoveRule {
    #[serde(default)]
    pub when: Option<String>,
    pub paths: Vec<String>,
}

/// Renames `from` to `to` when `when` evaluates truthy (or is absent).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenameRule {
    #[serde(default)]
    pub when: Option<String>,
    pub from: String,
    pub to: String,
}

/// Banner printed once the hook is done.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Messages {
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CleanupRules {
    #[serde(default)]
    pub remove: Vec<RemoveRule>,
    #[serde(default)]
    pub rename: Vec<RenameRule>,
    #[serde(default)]
    pub messages: Messages,
}

/// A rename with both sides rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

fn applies(
    when: Option<&str>,
    context: &serde_json::Value,
    engine: &dyn TemplateRenderer,
) -> Result<bool> {
    match when {
        Some(condition) => engine.evaluate(condition, context),
        None => Ok(true),
    }
}

impl CleanupRules {
    /// Parses rule file content, trying JSON first and YAML second.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML rules
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        match serde_json::from_str(content) {
            Ok(rules) => Ok(rules),
            Err(json_err) => {
                debug!("Rules are not JSON ({}), trying YAML", json_err);
                serde_yaml::from_str(content).map_err(|e| {
                    Error::ConfigError(format!("Invalid cleanup rules format: {}", e))
                })
            }
        }
    }

    /// Target paths of every applicable remove rule, rendered, in declaration order.
    pub fn targets(
        &self,
        context: &serde_json::Value,
        engine: &dyn TemplateRenderer,
    ) -> Result<Vec<String>> {
        let mut targets = Vec::new();
        for rule in &self.remove {
            if !applies(rule.when.as_deref(), context, engine)? {
                debug!("Skipping remove rule, condition is false: {:?}", rule.when);
                continue;
            }
            for path in &rule.paths {
                let rendered = engine.render(path, context)?;
                // A placeholder that renders to nothing would otherwise target the base directory.
                if rendered.trim().is_empty() {
                    debug!("Skipping path '{}' that rendered empty", path);
                    continue;
                }
                targets.push(rendered);
            }
        }
        Ok(targets)
    }

    /// Every applicable rename rule, rendered, in declaration order.
    pub fn renames(
        &self,
        context: &serde_json::Value,
        engine: &dyn TemplateRenderer,
    ) -> Result<Vec<Rename>> {
        let mut renames = Vec::new();
        for rule in &self.rename {
            if !applies(rule.when.as_deref(), context, engine)? {
                continue;
            }
            renames.push(Rename {
                from: engine.render(&rule.from, context)?,
                to: engine.render(&rule.to, context)?,
            });
        }
        Ok(renames)
    }

    /// Banner lines with their placeholders rendered.
    pub fn messages(
        &self,
        context: &serde_json::Value,
        engine: &dyn TemplateRenderer,
    ) -> Result<Messages> {
        let render = |m: &Option<String>| -> Result<Option<String>> {
            m.as_deref().map(|s| engine.render(s, context)).transpose()
        };
        Ok(Messages {
            success: render(&self.messages.success)?,
            info: render(&self.messages.info)?,
        })
    }
}

/// Finds the first rule file of `config_files` in `dir`.
pub fn find_config<P: AsRef<Path>>(dir: P, config_files: &[&str]) -> Option<PathBuf> {
    config_files.iter().map(|file| dir.as_ref().join(file)).find(|path| path.is_file())
}

/// Reads and parses a rule file.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<CleanupRules> {
    let config_path = config_path.as_ref();
    debug!("Loading cleanup rules from {}", config_path.display());
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        Error::ConfigError(format!("cannot read {}: {}", config_path.display(), e))
    })?;
    CleanupRules::parse(&content)
}

/// Resolves the cleanup rules for a run.
///
/// An explicit rule file must exist. Otherwise the template directory is
/// searched (`hooks/` first, then its root); no rule file means no rules.
pub fn get_rules(explicit: Option<&Path>, template_dir: Option<&Path>) -> Result<CleanupRules> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    if let Some(template_dir) = template_dir {
        for dir in CONFIG_DIRS {
            if let Some(path) = find_config(template_dir.join(dir), &CONFIG_FILES) {
                return load_config(path);
            }
        }
    }
    debug!("No cleanup rules found");
    Ok(CleanupRules::default())
}
