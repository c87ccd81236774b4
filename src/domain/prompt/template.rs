//! Prompt template parsing and rendering
//!
//! Supports variable syntax: `${var:variable-name:default-value}`
//! - `${var:name}` - Required variable, error if not provided
//! - `${var:name:default}` - Optional variable with default value

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Regex to match variable patterns: ${var:name} or ${var:name:default}
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9]*)(?::([^}]*))?\}").unwrap()
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },
}

/// A parsed variable from a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptVariable {
    pub name: String,
    pub default: Option<String>,
}

impl PromptVariable {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
    variables: Vec<PromptVariable>,
}

impl PromptTemplate {
    /// Parse a template string and extract its variables
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut variables = Vec::new();
        let mut seen = HashSet::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = cap[1].to_string();

            if !seen.insert(name.clone()) {
                continue;
            }

            variables.push(PromptVariable {
                name,
                default: cap.get(2).map(|m| m.as_str().to_string()),
            });
        }

        Self { content, variables }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn variables(&self) -> &[PromptVariable] {
        &self.variables
    }

    /// Render the template in a single pass.
    ///
    /// Substituted values are never re-scanned, so a value that itself looks
    /// like `${var:...}` is emitted literally.
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|v| v.is_required() && !values.contains_key(v.name.as_str()))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.name.clone(),
            });
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &Captures| {
            let name = &cap[1];
            values
                .get(name)
                .cloned()
                .or_else(|| cap.get(2).map(|m| m.as_str().to_string()))
                .unwrap_or_default()
        });

        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variables() {
        let template =
            PromptTemplate::parse("Hello ${var:greeting:Hi}, ${var:name}! Bye ${var:name}.");

        assert_eq!(template.variables().len(), 2);
        assert!(!template.variables()[0].is_required());
        assert!(template.variables()[1].is_required());
    }

    #[test]
    fn test_render_with_default() {
        let template = PromptTemplate::parse("${var:greeting:Hi}, ${var:name}!");

        let mut values = HashMap::new();
        values.insert("name", "Alice".to_string());

        assert_eq!(template.render(&values).unwrap(), "Hi, Alice!");
    }

    #[test]
    fn test_render_missing_required_variable() {
        let template = PromptTemplate::parse("Hello, ${var:name}!");

        let result = template.render(&HashMap::new());
        assert_eq!(
            result,
            Err(TemplateError::MissingVariable {
                name: "name".to_string()
            })
        );
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let template = PromptTemplate::parse("A=${var:a} B=${var:b}");

        let mut values = HashMap::new();
        values.insert("a", "${var:b}".to_string());
        values.insert("b", "two".to_string());

        assert_eq!(template.render(&values).unwrap(), "A=${var:b} B=two");
    }
}
