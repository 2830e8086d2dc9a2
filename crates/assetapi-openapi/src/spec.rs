//! OpenAPI specification types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// API information for OpenAPI spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One generated OpenAPI document
#[derive(Debug, Clone)]
pub struct OpenApiSpec {
    pub info: ApiInfo,
    pub paths: BTreeMap<String, PathItem>,
    pub schemas: BTreeMap<String, serde_json::Value>,
}

/// Path item in OpenAPI spec
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

impl PathItem {
    /// All operations declared on this path
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        [&self.get, &self.post, &self.put, &self.patch, &self.delete]
            .into_iter()
            .flatten()
    }

    /// All operations declared on this path, mutably
    pub fn operations_mut(&mut self) -> impl Iterator<Item = &mut Operation> {
        [
            &mut self.get,
            &mut self.post,
            &mut self.put,
            &mut self.patch,
            &mut self.delete,
        ]
        .into_iter()
        .flatten()
    }
}

/// Operation (endpoint) in OpenAPI spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<String, ResponseSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// Parameter in OpenAPI spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: SchemaRef,
}

/// Request body in OpenAPI spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBody {
    pub required: bool,
    pub content: BTreeMap<String, MediaType>,
}

/// Media type in OpenAPI spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: SchemaRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

/// Response specification
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ResponseSpec {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

/// Schema reference or inline schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRef {
    Ref {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Inline(serde_json::Value),
}

impl SchemaRef {
    /// Reference a schema under `#/components/schemas`
    pub fn component(name: &str) -> Self {
        Self::Ref {
            reference: format!("#/components/schemas/{}", name),
        }
    }
}

impl MediaType {
    /// `application/json` content keyed by media type
    pub fn json(schema: SchemaRef) -> BTreeMap<String, MediaType> {
        BTreeMap::from([(
            "application/json".to_string(),
            MediaType {
                schema,
                example: None,
            },
        )])
    }
}

impl OpenApiSpec {
    /// Create a new OpenAPI specification
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: ApiInfo {
                title: title.into(),
                version: version.into(),
                description: None,
            },
            paths: BTreeMap::new(),
            schemas: BTreeMap::new(),
        }
    }

    /// Set description
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.info.description = Some(desc.into());
        self
    }

    /// Add a path operation
    pub fn path(mut self, path: &str, method: &http::Method, operation: Operation) -> Self {
        let item = self.paths.entry(path.to_string()).or_default();
        match method.as_str() {
            "GET" => item.get = Some(operation),
            "POST" => item.post = Some(operation),
            "PUT" => item.put = Some(operation),
            "PATCH" => item.patch = Some(operation),
            "DELETE" => item.delete = Some(operation),
            _ => {}
        }
        self
    }

    /// Add a schema definition
    pub fn schema(mut self, name: &str, schema: serde_json::Value) -> Self {
        self.schemas.insert(name.to_string(), schema);
        self
    }

    /// Register a type that implements Schema (utoipa::ToSchema)
    pub fn register<T: for<'a> utoipa::ToSchema<'a>>(mut self) -> Self {
        let (name, schema) = T::schema();
        if let Ok(json_schema) = serde_json::to_value(schema) {
            self.schemas.insert(name.to_string(), json_schema);
        }
        self
    }

    /// Every operation in the document
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.paths.values().flat_map(PathItem::operations)
    }

    /// Every operation in the document, mutably
    pub fn operations_mut(&mut self) -> impl Iterator<Item = &mut Operation> {
        self.paths.values_mut().flat_map(PathItem::operations_mut)
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> serde_json::Value {
        let mut spec = serde_json::json!({
            "openapi": "3.0.3",
            "info": self.info,
            "paths": self.paths,
        });

        if !self.schemas.is_empty() {
            spec["components"] = serde_json::json!({
                "schemas": self.schemas
            });
        }

        spec
    }
}

impl Operation {
    /// Create a new operation
    pub fn new() -> Self {
        Self {
            operation_id: None,
            summary: None,
            description: None,
            tags: None,
            parameters: None,
            request_body: None,
            responses: BTreeMap::from([(
                "200".to_string(),
                ResponseSpec {
                    description: "Successful response".to_string(),
                    content: None,
                },
            )]),
            deprecated: None,
        }
    }

    /// Set operation id
    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    /// Set summary
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set description
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Add tags
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Add a required path parameter of type string
    pub fn path_param(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(Parameter {
            name: name.into(),
            location: "path".to_string(),
            required: true,
            description: Some(description.into()),
            schema: SchemaRef::Inline(serde_json::json!({ "type": "string" })),
        });
        self
    }

    /// Set a required JSON request body
    pub fn json_body(mut self, schema: SchemaRef) -> Self {
        self.request_body = Some(RequestBody {
            required: true,
            content: MediaType::json(schema),
        });
        self
    }

    /// Set the JSON response for a status code
    pub fn json_response(
        mut self,
        status: u16,
        description: impl Into<String>,
        schema: SchemaRef,
    ) -> Self {
        self.responses.insert(
            status.to_string(),
            ResponseSpec {
                description: description.into(),
                content: Some(MediaType::json(schema)),
            },
        );
        self
    }

    /// Attach a JSON example to a response declared with [`Self::json_response`]
    pub fn response_example(mut self, status: u16, example: &impl Serialize) -> Self {
        let media = self
            .responses
            .get_mut(&status.to_string())
            .and_then(|response| response.content.as_mut())
            .and_then(|content| content.get_mut("application/json"));
        if let Some(media) = media {
            media.example = serde_json::to_value(example).ok();
        }
        self
    }

    /// Whether this operation is flagged deprecated
    pub fn is_deprecated(&self) -> bool {
        self.deprecated.unwrap_or(false)
    }
}

impl Default for Operation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_path_operations_are_grouped() {
        let spec = OpenApiSpec::new("Assets", "1.0")
            .path("/assets/{id}", &Method::GET, Operation::new().summary("get"))
            .path("/assets/{id}", &Method::PATCH, Operation::new().summary("update"));

        assert_eq!(spec.paths.len(), 1);
        assert_eq!(spec.operations().count(), 2);
    }

    #[test]
    fn test_to_json_shape() {
        let spec = OpenApiSpec::new("Assets", "2.0")
            .description("Asset API")
            .path(
                "/assets/{id}",
                &Method::GET,
                Operation::new()
                    .operation_id("getAsset")
                    .path_param("id", "Asset identifier")
                    .json_response(200, "The asset", SchemaRef::component("AssetResponse")),
            )
            .schema("AssetResponse", serde_json::json!({ "type": "object" }));

        let json = spec.to_json();
        assert_eq!(json["openapi"], "3.0.3");
        assert_eq!(json["info"]["version"], "2.0");
        assert_eq!(json["paths"]["/assets/{id}"]["get"]["operationId"], "getAsset");
        assert_eq!(
            json["paths"]["/assets/{id}"]["get"]["responses"]["200"]["content"]["application/json"]
                ["schema"]["$ref"],
            "#/components/schemas/AssetResponse"
        );
        assert!(json["paths"]["/assets/{id}"]["get"].get("deprecated").is_none());
        assert!(json["components"]["schemas"]["AssetResponse"].is_object());
    }

    #[test]
    fn test_response_example_attaches_to_declared_response() {
        let operation = Operation::new()
            .json_response(404, "Not found", SchemaRef::component("ErrorSchema"))
            .response_example(404, &serde_json::json!({ "error": { "type": "not_found" } }))
            .response_example(500, &serde_json::json!({ "ignored": true }));

        let json = serde_json::to_value(&operation).unwrap();
        assert_eq!(
            json["responses"]["404"]["content"]["application/json"]["example"]["error"]["type"],
            "not_found"
        );
        assert!(json["responses"].get("500").is_none());

        let plain = serde_json::to_value(
            Operation::new().json_response(200, "Ok", SchemaRef::component("AssetResponse")),
        )
        .unwrap();
        assert!(plain["responses"]["200"]["content"]["application/json"]
            .get("example")
            .is_none());
    }
}
