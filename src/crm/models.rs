use super::CrmError;
use crate::collection::PageResult;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Describes a remote collection endpoint.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resource {
    /// Path below `{base}/api/`, e.g. `lead/getLeads`.
    pub path: &'static str,
    /// Key under `data` that holds the rows.
    pub items_key: &'static str,
}

/// Table column rendered for a row type.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: u16,
}

/// Server-side filter a collection accepts, with the values it cycles through.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub options: &'static [&'static str],
}

/// A record returned by a collection endpoint. The shape is owned by the
/// API; implementors only describe where to fetch it and how to show it.
///
pub trait Row: DeserializeOwned + Clone + Send + Sync + 'static {
    const RESOURCE: Resource;

    fn columns() -> &'static [Column];

    fn cells(&self) -> Vec<String>;

    fn filters() -> &'static [FilterSpec] {
        &[]
    }

    fn supports_date_range() -> bool {
        false
    }
}

/// Envelope every endpoint wraps its payload in.
///
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Convert the envelope into a page of raw rows, checking the status
    /// flag and the `data` layout.
    ///
    pub fn into_page(
        self,
        resource: &Resource,
        requested_size: usize,
    ) -> Result<PageResult<Value>, CrmError> {
        if self.status == Some(false) {
            let code = self.code.unwrap_or_default();
            if code == 401 || code == 403 {
                return Err(CrmError::Unauthorized { status: code as u16 });
            }
            return Err(CrmError::Api {
                code,
                message: self.message.unwrap_or_default(),
            });
        }

        let mut data = match self.data {
            Some(Value::Object(map)) => map,
            _ => return Err(CrmError::MissingField("data".to_string())),
        };

        let items = match data.remove(resource.items_key) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => vec![],
            Some(_) => {
                return Err(CrmError::MissingField(format!(
                    "data.{}",
                    resource.items_key
                )))
            }
        };
        let total = data
            .get("total")
            .and_then(Value::as_u64)
            .map(|t| t as usize)
            .unwrap_or(items.len());
        let page_size = data
            .get("limit")
            .and_then(Value::as_u64)
            .map(|l| l as usize)
            .filter(|l| *l > 0)
            .unwrap_or(requested_size);

        Ok(PageResult::new(items, total, page_size))
    }
}

/// Decode raw rows into a concrete row type.
///
pub fn decode_page<R: Row>(page: PageResult<Value>) -> Result<PageResult<R>, CrmError> {
    let PageResult {
        items,
        total,
        page_size,
    } = page;
    let items = items
        .into_iter()
        .map(serde_json::from_value::<R>)
        .collect::<Result<Vec<R>, _>>()?;
    Ok(PageResult::new(items, total, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LEADS: Resource = Resource {
        path: "lead/getLeads",
        items_key: "leads",
    };

    fn envelope(value: Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_into_page() {
        let page = envelope(json!({
            "status": true,
            "code": 200,
            "message": "Leads fetched",
            "data": { "total": 47, "limit": 10, "offset": 0, "leads": [{ "name": "a" }, { "name": "b" }] }
        }))
        .into_page(&LEADS, 25)
        .unwrap();
        assert_eq!(page.total, 47);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_into_page_defaults() {
        let page = envelope(json!({ "data": { "leads": [{}] } }))
            .into_page(&LEADS, 25)
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.page_size, 25);

        let page = envelope(json!({ "status": true, "data": { "total": 0, "leads": null } }))
            .into_page(&LEADS, 25)
            .unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_into_page_status_false() {
        let err = envelope(json!({ "status": false, "code": 500, "message": "boom" }))
            .into_page(&LEADS, 10)
            .unwrap_err();
        assert!(matches!(err, CrmError::Api { code: 500, .. }));
        assert!(err.to_string().contains("boom"));

        let err = envelope(json!({ "status": false, "code": 401, "message": "jwt expired" }))
            .into_page(&LEADS, 10)
            .unwrap_err();
        assert!(err.is_blocking());
    }

    #[test]
    fn test_null_message() {
        let err = envelope(json!({ "status": false, "code": 500, "message": null }))
            .into_page(&LEADS, 10)
            .unwrap_err();
        assert!(matches!(err, CrmError::Api { code: 500, .. }));

        let page = envelope(json!({ "status": true, "message": null, "data": { "leads": [] } }))
            .into_page(&LEADS, 10)
            .unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_decode_page_with_null_fields() {
        let raw = PageResult::new(vec![json!({ "_id": "1", "name": null })], 1, 10);
        let page = decode_page::<crate::crm::Lead>(raw).unwrap();
        assert_eq!(page.items[0].id, "1");
        assert_eq!(page.items[0].name, "");
    }

    #[test]
    fn test_into_page_missing_data() {
        let err = envelope(json!({ "status": true }))
            .into_page(&LEADS, 10)
            .unwrap_err();
        assert!(matches!(err, CrmError::MissingField(_)));

        let err = envelope(json!({ "status": true, "data": { "leads": "nope" } }))
            .into_page(&LEADS, 10)
            .unwrap_err();
        assert!(err.to_string().contains("data.leads"));
    }
}
