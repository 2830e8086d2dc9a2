//! Per-version OpenAPI documents
//!
//! One document per registered version, named after its group (`v1`, `v2`).
//! Each lists only that version's paths and DTO schemas and is passed through
//! the [`DocumentAnnotator`] so deprecated versions are marked.

use crate::handler::Operation;
use crate::registry::{RegistryEntry, VersionRegistry};
use assetapi_openapi::versioning::ApiVersion;
use assetapi_openapi::{
    DocumentAnnotator, ErrorBodySchema, ErrorSchema, FieldErrorSchema, OpenApiConfig, OpenApiSpec,
    SchemaRef,
};

/// A generated document and the path serving it
#[derive(Debug, Clone)]
pub struct VersionDocument {
    pub version: ApiVersion,
    /// Group name, e.g. `v1`
    pub group: String,
    /// Request path serving the JSON document
    pub path: String,
    pub spec: OpenApiSpec,
}

/// Build one annotated document per registered version, ascending
pub fn build_documents(registry: &VersionRegistry, config: &OpenApiConfig) -> Vec<VersionDocument> {
    let annotator = DocumentAnnotator::new();
    registry
        .entries()
        .map(|entry| build_document(entry, config, &annotator))
        .collect()
}

/// Build the document of a single version
pub fn build_document(
    entry: &RegistryEntry,
    config: &OpenApiConfig,
    annotator: &DocumentAnnotator,
) -> VersionDocument {
    let descriptor = entry.descriptor();
    let group = descriptor.group_name.clone();

    let mut spec = OpenApiSpec::new(config.document_title(&group), entry.version().to_string());
    if let Some(description) = &config.description {
        spec = spec.description(description.clone());
    }

    let path = format!("/api/{}/assets/{{id}}", group);
    for operation in entry.operations() {
        spec = spec.path(&path, &operation.method(), describe(operation, entry, &group));
    }

    spec = entry.response_mapper().register_schemas(spec);
    if let Some(decoder) = entry.request_mapper() {
        spec = decoder.register_schemas(spec);
    }
    spec = spec
        .register::<ErrorSchema>()
        .register::<ErrorBodySchema>()
        .register::<FieldErrorSchema>();

    VersionDocument {
        version: entry.version(),
        path: config.document_path(&group),
        spec: annotator.annotate(spec, &descriptor),
        group,
    }
}

fn describe(operation: Operation, entry: &RegistryEntry, group: &str) -> assetapi_openapi::Operation {
    let asset = SchemaRef::component(entry.response_mapper().asset_schema());
    let error = || SchemaRef::component("ErrorSchema");

    let doc = assetapi_openapi::Operation::new()
        .operation_id(format!("{}_asset_{}", operation.name(), group.replace('.', "_")))
        .tags(vec![group.to_string()])
        .path_param("id", "Asset identifier")
        .json_response(200, "The asset", asset)
        .json_response(400, "Malformed, missing or unsupported API version", error())
        .response_example(400, &ErrorSchema::unsupported_version_example())
        .json_response(404, "Asset not found", error());

    match operation {
        Operation::Get => doc.summary("Get an asset"),
        Operation::Update => {
            let doc = doc
                .summary("Update an asset")
                .json_response(409, "Update rejected", error())
                .json_response(422, "Invalid field values", error())
                .response_example(422, &ErrorSchema::validation_example());
            match entry.request_mapper() {
                Some(decoder) => doc.json_body(SchemaRef::component(decoder.update_schema())),
                None => doc,
            }
        }
    }
}
