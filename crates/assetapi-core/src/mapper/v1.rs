//! Version 1 wire contract (deprecated)
//!
//! Request: `{status, notes?, value?}`
//! Response: `{id, status, notes, value}`

use super::{
    body_fields, decode_money, decode_status, decode_text, FieldErrors, RequestDecoder,
    ResponseEncoder,
};
use crate::domain::{Asset, AssetId, AssetStatus, AssetUpdate, Money, RetirementChange};
use crate::error::DecodeError;
use assetapi_openapi::{OpenApiSpec, Schema};
use serde::{Deserialize, Serialize};

/// V1 update request body
#[derive(Debug, Clone, Default, Serialize, Deserialize, Schema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    /// One of the asset status names
    #[schema(example = "Active")]
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Non-negative amount
    pub value: Option<f64>,
}

/// V1 asset representation
#[derive(Debug, Clone, Serialize, Schema)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    #[schema(value_type = String)]
    pub id: AssetId,
    pub status: AssetStatus,
    pub notes: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub value: Option<Money>,
}

impl From<&Asset> for AssetResponse {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            status: asset.status,
            notes: asset.notes.clone(),
            value: asset.value,
        }
    }
}

/// V1 request mapper
#[derive(Debug, Clone, Copy, Default)]
pub struct V1RequestMapper;

impl RequestDecoder for V1RequestMapper {
    fn decode_update(&self, body: &[u8]) -> Result<AssetUpdate, DecodeError> {
        let fields = body_fields(body)?;

        let mut errors = FieldErrors::new();
        let status = errors.check(decode_status("status", fields.get("status")));
        let notes = errors.check(decode_text("notes", fields.get("notes")));
        let value = errors.check(decode_money("value", fields.get("value")));
        errors.finish()?;

        match (status, notes, value) {
            (Some(status), Some(notes), Some(value)) => Ok(AssetUpdate {
                status,
                notes,
                value,
                // V1 has no way to say anything about retirement
                retired_on: RetirementChange::Keep,
            }),
            _ => Err(DecodeError::Body("incomplete V1 update request".to_string())),
        }
    }

    fn update_schema(&self) -> &'static str {
        "UpdateAssetRequest"
    }

    fn register_schemas(&self, spec: OpenApiSpec) -> OpenApiSpec {
        spec.register::<UpdateAssetRequest>()
    }
}

/// V1 response mapper
#[derive(Debug, Clone, Copy, Default)]
pub struct V1ResponseMapper;

impl ResponseEncoder for V1ResponseMapper {
    fn encode(&self, asset: &Asset) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(AssetResponse::from(asset))
    }

    fn asset_schema(&self) -> &'static str {
        "AssetResponse"
    }

    fn register_schemas(&self, spec: OpenApiSpec) -> OpenApiSpec {
        spec.register::<AssetStatus>().register::<AssetResponse>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn retired_asset() -> Asset {
        Asset {
            id: AssetId::new("42"),
            status: AssetStatus::Retired,
            notes: Some("decommissioned".to_string()),
            value: Some(Money::new(250.0).unwrap()),
            retired_on: NaiveDate::from_ymd_opt(2024, 1, 1),
        }
    }

    #[test]
    fn test_decode_update() {
        let update = V1RequestMapper
            .decode_update(br#"{"status":"Active","value":100.0}"#)
            .unwrap();

        assert_eq!(update.status, AssetStatus::Active);
        assert_eq!(update.notes, None);
        assert_eq!(update.value, Some(Money::new(100.0).unwrap()));
        assert_eq!(update.retired_on, RetirementChange::Keep);
    }

    #[test]
    fn test_decode_ignores_later_version_fields() {
        let update = V1RequestMapper
            .decode_update(br#"{"status":"Retired","totalValue":5.0,"retiredOn":"2024-01-01"}"#)
            .unwrap();

        assert_eq!(update.value, None);
        assert_eq!(update.retired_on, RetirementChange::Keep);
    }

    #[test]
    fn test_decode_reports_every_bad_field() {
        let err = V1RequestMapper
            .decode_update(br#"{"status":"Lost","value":-1}"#)
            .unwrap_err();

        match err {
            DecodeError::Fields(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["status", "value"]);
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let err = V1RequestMapper.decode_update(b"{status:").unwrap_err();
        assert!(matches!(err, DecodeError::Body(_)));

        let err = V1RequestMapper.decode_update(br#""Active""#).unwrap_err();
        assert!(matches!(err, DecodeError::Body(_)));
    }

    #[test]
    fn test_decode_reports_wrong_type_per_field() {
        let err = V1RequestMapper
            .decode_update(br#"{"status":"Active","value":"lots"}"#)
            .unwrap_err();

        match err {
            DecodeError::Fields(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "value");
                assert_eq!(fields[0].code, "type");
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_uses_v1_shape() {
        let json = V1ResponseMapper.encode(&retired_asset()).unwrap();

        assert_eq!(
            json,
            json!({
                "id": "42",
                "status": "Retired",
                "notes": "decommissioned",
                "value": 250.0,
            })
        );
    }

    #[test]
    fn test_encode_writes_unset_fields_as_null() {
        let json = V1ResponseMapper
            .encode(&Asset::new(AssetId::new("7"), AssetStatus::Active))
            .unwrap();

        assert_eq!(
            json,
            json!({ "id": "7", "status": "Active", "notes": null, "value": null })
        );
    }

    #[test]
    fn test_schemas_registered() {
        let spec = V1ResponseMapper.register_schemas(OpenApiSpec::new("t", "1"));
        let spec = V1RequestMapper.register_schemas(spec);

        assert!(spec.schemas.contains_key("AssetResponse"));
        assert!(spec.schemas.contains_key("AssetStatus"));
        assert!(spec.schemas.contains_key("UpdateAssetRequest"));
        assert!(spec.schemas["AssetResponse"]["properties"].get("retiredOn").is_none());
    }
}
