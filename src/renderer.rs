//! Rule rendering against the resolved configuration.
//! Cleanup rules carry MiniJinja conditions (`when`) and may embed placeholders in
//! their paths; both are evaluated here with the answers from the hook payload.
use crate::error::{Error, Result};
use minijinja::Environment;

/// Trait for rule rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;

    /// Evaluates a boolean expression such as `database != 'postgresql'`.
    fn evaluate(&self, expression: &str, context: &serde_json::Value) -> Result<bool>;
}

/// MiniJinja-based rendering engine.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let env = Environment::new();
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// Strings without template syntax are returned unchanged without going
    /// through the engine.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template fails to parse or render
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        if !template.contains("{{") && !template.contains("{%") {
            return Ok(template.to_string());
        }
        self.env.render_str(template, context).map_err(Error::MinijinjaError)
    }

    /// Evaluates an expression and reports its truthiness.
    ///
    /// Undefined variables are falsy, so a rule referring to an option the
    /// template never asked about does not fire.
    fn evaluate(&self, expression: &str, context: &serde_json::Value) -> Result<bool> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(Error::TemplateError("empty condition".to_string()));
        }
        let expr = self.env.compile_expression(expression).map_err(Error::MinijinjaError)?;
        let value = expr.eval(context).map_err(Error::MinijinjaError)?;
        Ok(value.is_true())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_strings_pass_through() {
        let engine = MiniJinjaRenderer::new();
        let result = engine.render("app/static", &json!({})).unwrap();
        assert_eq!(result, "app/static");
    }

    #[test]
    fn placeholders_are_substituted() {
        let engine = MiniJinjaRenderer::new();
        let context = json!({"project_slug": "demo"});
        let result = engine.render("{{ project_slug }}/migrations", &context).unwrap();
        assert_eq!(result, "demo/migrations");
    }

    #[test]
    fn conditions_follow_context() {
        let engine = MiniJinjaRenderer::new();
        let context = json!({"database": "sqlite", "render_html": false});

        assert!(engine.evaluate("database != 'postgresql'", &context).unwrap());
        assert!(!engine.evaluate("database == 'postgresql'", &context).unwrap());
        assert!(engine.evaluate("not render_html", &context).unwrap());
        assert!(!engine.evaluate("missing_option", &context).unwrap());
    }

    #[test]
    fn malformed_condition_is_an_error() {
        let engine = MiniJinjaRenderer::new();
        assert!(engine.evaluate("database ==", &json!({})).is_err());
        assert!(engine.evaluate("   ", &json!({})).is_err());
    }
}
