use serde::{Deserialize, Serialize};

/// Label pattern for generated records; `{n}` is replaced by the 1-based index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTemplate(String);

impl LabelTemplate {
    pub const PLACEHOLDER: &'static str = "{n}";

    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn pattern(&self) -> &str {
        &self.0
    }

    /// Patterns without a placeholder get the index appended.
    pub fn render(&self, index: usize) -> String {
        if self.0.contains(Self::PLACEHOLDER) {
            self.0.replace(Self::PLACEHOLDER, &index.to_string())
        } else {
            format!("{}{}", self.0, index)
        }
    }
}

impl Default for LabelTemplate {
    fn default() -> Self {
        Self::new("blue-{n}")
    }
}
