//! Version 2 wire contract
//!
//! Renames `id` to `assetId` and `value` to `totalValue`, and adds the
//! retirement date. Nothing here is shared with [`super::v1`].

use super::{
    body_fields, decode_money, decode_retirement, decode_status, decode_text, FieldErrors,
    RequestDecoder, ResponseEncoder,
};
use crate::domain::{Asset, AssetId, AssetStatus, AssetUpdate, Money};
use crate::error::DecodeError;
use assetapi_openapi::{OpenApiSpec, Schema};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// V2 update request body
#[derive(Debug, Clone, Default, Serialize, Deserialize, Schema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    #[schema(example = "Retired")]
    pub status: Option<String>,
    pub notes: Option<String>,
    /// Non-negative amount
    pub total_value: Option<f64>,
    /// Calendar date, `YYYY-MM-DD`; only valid with a terminal status.
    /// Omit to keep the stored date, send `null` to clear it.
    #[schema(example = "2024-01-01", format = Date)]
    pub retired_on: Option<String>,
}

/// V2 asset representation
#[derive(Debug, Clone, Serialize, Schema)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    #[schema(value_type = String)]
    pub asset_id: AssetId,
    pub status: AssetStatus,
    pub notes: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub total_value: Option<Money>,
    pub retired_on: Option<NaiveDate>,
}

impl From<&Asset> for AssetResponse {
    fn from(asset: &Asset) -> Self {
        Self {
            asset_id: asset.id.clone(),
            status: asset.status,
            notes: asset.notes.clone(),
            total_value: asset.value,
            retired_on: asset.retired_on,
        }
    }
}

/// V2 request mapper
#[derive(Debug, Clone, Copy, Default)]
pub struct V2RequestMapper;

impl RequestDecoder for V2RequestMapper {
    fn decode_update(&self, body: &[u8]) -> Result<AssetUpdate, DecodeError> {
        let fields = body_fields(body)?;

        let mut errors = FieldErrors::new();
        let status = errors.check(decode_status("status", fields.get("status")));
        let notes = errors.check(decode_text("notes", fields.get("notes")));
        let value = errors.check(decode_money("totalValue", fields.get("totalValue")));
        let retired_on = errors.check(decode_retirement("retiredOn", fields.get("retiredOn")));
        errors.finish()?;

        match (status, notes, value, retired_on) {
            (Some(status), Some(notes), Some(value), Some(retired_on)) => Ok(AssetUpdate {
                status,
                notes,
                value,
                retired_on,
            }),
            _ => Err(DecodeError::Body("incomplete V2 update request".to_string())),
        }
    }

    fn update_schema(&self) -> &'static str {
        "UpdateAssetRequest"
    }

    fn register_schemas(&self, spec: OpenApiSpec) -> OpenApiSpec {
        spec.register::<UpdateAssetRequest>()
    }
}

/// V2 response mapper
#[derive(Debug, Clone, Copy, Default)]
pub struct V2ResponseMapper;

impl ResponseEncoder for V2ResponseMapper {
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
    use crate::domain::RetirementChange;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_decode_update() {
        let update = V2RequestMapper
            .decode_update(
                br#"{"status":"Retired","totalValue":250.0,"retiredOn":"2024-01-01"}"#,
            )
            .unwrap();

        assert_eq!(update.status, AssetStatus::Retired);
        assert_eq!(update.value, Some(Money::new(250.0).unwrap()));
        assert_eq!(
            update.retired_on,
            RetirementChange::Set(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_decode_distinguishes_omitted_and_null_retirement() {
        let omitted = V2RequestMapper
            .decode_update(br#"{"status":"Retired"}"#)
            .unwrap();
        assert_eq!(omitted.retired_on, RetirementChange::Keep);

        let cleared = V2RequestMapper
            .decode_update(br#"{"status":"Retired","retiredOn":null}"#)
            .unwrap();
        assert_eq!(cleared.retired_on, RetirementChange::Clear);
    }

    #[test]
    fn test_decode_reports_wrong_types_per_field() {
        let err = V2RequestMapper
            .decode_update(br#"{"status":5,"notes":true,"retiredOn":20240101}"#)
            .unwrap_err();

        match err {
            DecodeError::Fields(fields) => {
                let found: Vec<_> = fields
                    .iter()
                    .map(|f| (f.field.as_str(), f.code.as_str()))
                    .collect();
                assert_eq!(
                    found,
                    vec![("status", "type"), ("notes", "type"), ("retiredOn", "type")]
                );
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_ignores_v1_value_field() {
        let update = V2RequestMapper
            .decode_update(br#"{"status":"Active","value":10.0}"#)
            .unwrap();
        assert_eq!(update.value, None);
    }

    #[test]
    fn test_decode_rejects_datetime_retirement() {
        let err = V2RequestMapper
            .decode_update(br#"{"status":"Retired","retiredOn":"2024-01-01T00:00:00Z"}"#)
            .unwrap_err();

        match err {
            DecodeError::Fields(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "retiredOn");
                assert_eq!(fields[0].code, "date");
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_errors_use_v2_names() {
        let err = V2RequestMapper
            .decode_update(br#"{"totalValue":-5}"#)
            .unwrap_err();

        match err {
            DecodeError::Fields(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["status", "totalValue"]);
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_uses_v2_shape() {
        let asset = Asset {
            id: AssetId::new("42"),
            status: AssetStatus::Retired,
            notes: None,
            value: Some(Money::new(250.0).unwrap()),
            retired_on: NaiveDate::from_ymd_opt(2024, 1, 1),
        };

        assert_eq!(
            V2ResponseMapper.encode(&asset).unwrap(),
            json!({
                "assetId": "42",
                "status": "Retired",
                "notes": null,
                "totalValue": 250.0,
                "retiredOn": "2024-01-01",
            })
        );
    }

    #[test]
    fn test_encode_leaves_missing_retirement_null() {
        let json = V2ResponseMapper
            .encode(&Asset::new(AssetId::new("1"), AssetStatus::Inactive))
            .unwrap();

        assert_eq!(json["retiredOn"], serde_json::Value::Null);
        assert_eq!(json["totalValue"], serde_json::Value::Null);
        assert!(json.get("id").is_none());
        assert!(json.get("value").is_none());
    }

    fn asset_strategy() -> impl Strategy<Value = Asset> {
        (
            "[a-z0-9]{1,8}",
            prop::sample::select(AssetStatus::ALL.to_vec()),
            prop::option::of("[ -~]{0,24}"),
            prop::option::of(0u32..1_000_000),
        )
            .prop_map(|(id, status, notes, cents)| Asset {
                id: AssetId::new(id),
                status,
                notes,
                value: cents.and_then(|c| Money::new(f64::from(c) / 100.0).ok()),
                retired_on: None,
            })
    }

    proptest! {
        /// Shared fields survive an encode followed by decoding the same JSON
        #[test]
        fn prop_shared_fields_round_trip(asset in asset_strategy()) {
            let encoded = V2ResponseMapper.encode(&asset).unwrap();
            let body = serde_json::to_vec(&encoded).unwrap();
            let update = V2RequestMapper.decode_update(&body).unwrap();

            prop_assert_eq!(update.status, asset.status);
            prop_assert_eq!(update.notes, asset.notes);
            prop_assert_eq!(update.value, asset.value);
        }

        #[test]
        fn prop_v2_shape_never_has_v1_fields(asset in asset_strategy()) {
            let encoded = V2ResponseMapper.encode(&asset).unwrap();
            let object = encoded.as_object().unwrap();

            prop_assert!(!object.contains_key("id"));
            prop_assert!(!object.contains_key("value"));
            prop_assert_eq!(object.len(), 5);
        }
    }
}
