// Wire shapes shared by every paginated endpoint.

use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

/// Body of a `POST {endpoint}/paginate` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub per_page: u32,
    pub page: u32,
}

/// A decoded list page: raw records plus the total record count.
///
/// The backend names the collection after the resource (`ages`, `roles`,
/// ...) and reports the total as `count`. A bare array or the generic
/// `data` / `totalCount` keys are accepted too.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEnvelope {
    pub items: Vec<Value>,
    pub total_count: u64,
}

const ITEM_KEYS: [&str; 2] = ["data", "items"];
const COUNT_KEYS: [&str; 3] = ["count", "totalCount", "total"];

impl PageEnvelope {
    pub fn from_value(value: Value, collection_key: &str) -> Result<Self, Error> {
        match value {
            Value::Array(items) => {
                let total_count = u64::try_from(items.len()).unwrap_or(u64::MAX);
                Ok(Self { items, total_count })
            }
            Value::Object(mut map) => {
                let items = std::iter::once(collection_key)
                    .chain(ITEM_KEYS)
                    .find_map(|key| match map.remove(key) {
                        Some(Value::Array(items)) => Some(items),
                        _ => None,
                    })
                    .ok_or_else(|| Error::Deserialization {
                        message: format!("page has no `{collection_key}` array"),
                        body: Value::Object(map.clone()).to_string(),
                    })?;

                let total_count = COUNT_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_u64))
                    .unwrap_or_else(|| u64::try_from(items.len()).unwrap_or(u64::MAX));

                Ok(Self { items, total_count })
            }
            other => Err(Error::Deserialization {
                message: "page is neither an object nor an array".into(),
                body: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn page_request_uses_camel_case() {
        let body = serde_json::to_value(PageRequest {
            per_page: 10,
            page: 2,
        })
        .unwrap();
        assert_eq!(body, json!({ "perPage": 10, "page": 2 }));
    }

    #[test]
    fn envelope_reads_named_collection_and_count() {
        let value = json!({
            "ages": [{ "_id": "a1" }, { "_id": "a2" }],
            "count": 25,
            "returnCnt": 2,
            "totalPage": 3
        });
        let page = PageEnvelope::from_value(value, "ages").unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 25);
    }

    #[test]
    fn envelope_falls_back_to_data_and_len() {
        let value = json!({ "data": [{ "_id": "x" }] });
        let page = PageEnvelope::from_value(value, "roles").unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn envelope_accepts_bare_array() {
        let page = PageEnvelope::from_value(json!([1, 2, 3]), "users").unwrap();
        assert_eq!(page.total_count, 3);
    }

    #[test]
    fn envelope_without_items_is_an_error() {
        let err = PageEnvelope::from_value(json!({ "count": 4 }), "skills").unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
