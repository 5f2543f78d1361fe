//! postgen is a post-generation hook for project templates.
//! After a scaffolding tool has rendered a project, it removes the files and
//! directories that do not apply to the chosen options, applies renames, and
//! reports what it did.

/// Command-line interface module for the postgen binary
pub mod cli;

/// Per-target removal and rename pass
pub mod cleanup;

/// Cleanup rule files
/// Supports JSON and YAML formats (cleanup.json, cleanup.yml, cleanup.yaml)
pub mod config;

/// Error types and handling for the postgen application
pub mod error;

/// Payload passed by the scaffolding tool to hooks/post_gen_project
pub mod hooks;

/// Target path resolution and glob expansion
pub mod paths;

/// Condition evaluation and placeholder rendering for rules
pub mod renderer;

/// Styled console status lines
pub mod status;
