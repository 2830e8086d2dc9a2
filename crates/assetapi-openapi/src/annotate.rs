//! Deprecation annotation for per-version documents
//!
//! Runtime behaviour of a deprecated version is unchanged; only its document
//! is marked so documentation UIs can warn readers.

use crate::spec::OpenApiSpec;
use crate::versioning::ApiVersion;

/// Notice appended to a deprecated version's document description
pub const DOCUMENT_DEPRECATION_NOTICE: &str =
    "**Deprecated**: This API version is deprecated. Please migrate to the latest version.";

/// Notice appended to every operation of a deprecated version
pub const OPERATION_DEPRECATION_NOTICE: &str = "**Deprecated**: Use latest version instead.";

/// What the annotator needs to know about one API version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    /// The version the document describes
    pub version: ApiVersion,
    /// Document group name (e.g. "v1")
    pub group_name: String,
    /// Whether the version is deprecated
    pub deprecated: bool,
}

impl VersionDescriptor {
    /// Describe a version
    pub fn new(version: ApiVersion, deprecated: bool) -> Self {
        Self {
            version,
            group_name: version.group_name(),
            deprecated,
        }
    }
}

/// Post-processes generated documents with version metadata
#[derive(Debug, Clone)]
pub struct DocumentAnnotator {
    document_notice: String,
    operation_notice: String,
}

impl DocumentAnnotator {
    /// Annotator using the standard notices
    pub fn new() -> Self {
        Self {
            document_notice: DOCUMENT_DEPRECATION_NOTICE.to_string(),
            operation_notice: OPERATION_DEPRECATION_NOTICE.to_string(),
        }
    }

    /// Replace the document-level notice
    pub fn document_notice(mut self, notice: impl Into<String>) -> Self {
        self.document_notice = notice.into();
        self
    }

    /// Replace the operation-level notice
    pub fn operation_notice(mut self, notice: impl Into<String>) -> Self {
        self.operation_notice = notice.into();
        self
    }

    /// Stamp the version onto `spec` and, when deprecated, mark the document
    /// and every operation in it
    ///
    /// Running this again on its own output changes nothing.
    pub fn annotate(&self, mut spec: OpenApiSpec, descriptor: &VersionDescriptor) -> OpenApiSpec {
        spec.info.version = descriptor.version.to_string();

        if !descriptor.deprecated {
            return spec;
        }

        append_notice(&mut spec.info.description, &self.document_notice);

        for operation in spec.operations_mut() {
            operation.deprecated = Some(true);
            append_notice(&mut operation.description, &self.operation_notice);
        }

        spec
    }
}

impl Default for DocumentAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

fn append_notice(description: &mut Option<String>, notice: &str) {
    match description {
        Some(text) if text.contains(notice) => {}
        Some(text) if text.is_empty() => text.push_str(notice),
        Some(text) => {
            text.push_str("\n\n");
            text.push_str(notice);
        }
        None => *description = Some(notice.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Operation;
    use http::Method;

    fn document() -> OpenApiSpec {
        OpenApiSpec::new("Assets v1", "0.0")
            .description("Asset endpoints")
            .path(
                "/api/v1/assets/{id}",
                &Method::GET,
                Operation::new().description("Fetch one asset"),
            )
            .path("/api/v1/assets/{id}", &Method::PATCH, Operation::new())
    }

    #[test]
    fn test_deprecated_document_is_marked() {
        let annotated =
            DocumentAnnotator::new().annotate(document(), &VersionDescriptor::new(ApiVersion::v1(), true));

        assert_eq!(annotated.info.version, "1.0");
        assert_eq!(
            annotated.info.description.as_deref(),
            Some("Asset endpoints\n\n**Deprecated**: This API version is deprecated. Please migrate to the latest version.")
        );

        for operation in annotated.operations() {
            assert!(operation.is_deprecated());
            let description = operation.description.as_deref().unwrap();
            assert_eq!(description.matches(OPERATION_DEPRECATION_NOTICE).count(), 1);
        }

        let get = annotated.paths["/api/v1/assets/{id}"].get.as_ref().unwrap();
        assert_eq!(
            get.description.as_deref(),
            Some("Fetch one asset\n\n**Deprecated**: Use latest version instead.")
        );
        let patch = annotated.paths["/api/v1/assets/{id}"].patch.as_ref().unwrap();
        assert_eq!(patch.description.as_deref(), Some(OPERATION_DEPRECATION_NOTICE));
    }

    #[test]
    fn test_annotation_is_idempotent() {
        let annotator = DocumentAnnotator::new();
        let descriptor = VersionDescriptor::new(ApiVersion::v1(), true);

        let once = annotator.annotate(document(), &descriptor);
        let twice = annotator.annotate(once.clone(), &descriptor);

        assert_eq!(once.to_json(), twice.to_json());
        let description = twice.info.description.unwrap();
        assert_eq!(description.matches(DOCUMENT_DEPRECATION_NOTICE).count(), 1);
    }

    #[test]
    fn test_current_version_is_left_alone() {
        let annotated =
            DocumentAnnotator::new().annotate(document(), &VersionDescriptor::new(ApiVersion::v2(), false));

        assert_eq!(annotated.info.version, "2.0");
        assert_eq!(annotated.info.description.as_deref(), Some("Asset endpoints"));
        assert!(annotated.operations().all(|op| !op.is_deprecated()));
    }

    #[test]
    fn test_custom_notices() {
        let annotator = DocumentAnnotator::new()
            .document_notice("Sunset soon")
            .operation_notice("Use v2");
        let annotated = annotator.annotate(
            OpenApiSpec::new("Assets", "0").path("/a", &Method::GET, Operation::new()),
            &VersionDescriptor::new(ApiVersion::v1(), true),
        );

        assert_eq!(annotated.info.description.as_deref(), Some("Sunset soon"));
        assert_eq!(
            annotated.operations().next().unwrap().description.as_deref(),
            Some("Use v2")
        );
    }
}
