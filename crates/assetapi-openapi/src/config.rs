//! OpenAPI configuration

/// Configuration for per-version documentation
#[derive(Debug, Clone)]
pub struct OpenApiConfig {
    /// API title; each document is titled "{title} {group}"
    pub title: String,
    /// API description shared by every version
    pub description: Option<String>,
    /// Path template serving one document, with a `{group}` placeholder
    pub json_path: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            title: "Asset API".to_string(),
            description: None,
            json_path: "/openapi/{group}.json".to_string(),
        }
    }
}

impl OpenApiConfig {
    /// Create a new OpenAPI configuration
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set API description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the path template for document JSON
    pub fn json_path(mut self, path: impl Into<String>) -> Self {
        self.json_path = path.into();
        self
    }

    /// Path serving the document for `group` (e.g. "v1")
    pub fn document_path(&self, group: &str) -> String {
        self.json_path.replace("{group}", group)
    }

    /// Document title for `group`
    pub fn document_title(&self, group: &str) -> String {
        format!("{} {}", self.title, group)
    }
}
