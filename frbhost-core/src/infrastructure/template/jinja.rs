// frbhost-core/src/infrastructure/template/jinja.rs

// Renders the pcigale.ini family of files from a JSON context.

use minijinja::Environment;

use crate::application::ports::TemplateEngine;
use crate::error::HostError;
use crate::infrastructure::error::InfrastructureError;

pub struct JinjaRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> JinjaRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();
        // Block tags sit on their own lines in the ini templates
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        // CIGALE lists are comma separated
        env.add_filter("ini_list", |value: Vec<String>| value.join(", "));

        Self { env }
    }
}

impl<'a> Default for JinjaRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TemplateEngine for JinjaRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, HostError> {
        self.env
            .render_str(template, context)
            .map_err(|e| HostError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}
