// frbhost-core/src/application/ports/renderer.rs

use crate::error::HostError;

pub trait TemplateEngine {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, HostError>;
}
