use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record as returned by the platform.
///
/// Records are schemaless JSON objects keyed by field id (`field_12`,
/// `field_12_raw`, ...) plus the record `id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    /// Record identifier, when present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Raw JSON value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Response of a record listing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RecordsPage {
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub total_records: Option<u64>,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl RecordsPage {
    /// Identifiers of every record on the page, skipping records without one.
    pub fn ids(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(Record::id)
            .map(str::to_owned)
            .collect()
    }
}

/// Asset bucket an upload is stored in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AssetType {
    File,
    Image,
}

impl AssetType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata of an uploaded asset.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct UploadedAsset {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub public_url: Option<String>,
    /// Remaining keys returned by the platform.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{RecordsPage, UploadedAsset};

    #[test]
    fn records_page_collects_ids() {
        let page: RecordsPage = serde_json::from_value(json!({
            "total_pages": 1,
            "current_page": 1,
            "total_records": 3,
            "records": [
                { "id": "5f1a" , "field_1": "a" },
                { "field_1": "no id" },
                { "id": "5f1b" }
            ]
        }))
        .expect("must decode");

        assert_eq!(page.total_records, Some(3));
        assert_eq!(page.ids(), vec!["5f1a".to_owned(), "5f1b".to_owned()]);
    }

    #[test]
    fn uploaded_asset_keeps_unknown_keys() {
        let asset: UploadedAsset = serde_json::from_value(json!({
            "id": "a1",
            "type": "image",
            "filename": "logo.png",
            "public_url": "https://cdn/logo.png",
            "size": 2048
        }))
        .expect("must decode");

        assert_eq!(asset.kind.as_deref(), Some("image"));
        assert_eq!(asset.extra.get("size"), Some(&json!(2048)));
    }
}
