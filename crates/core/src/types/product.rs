//! Product documents and store acknowledgments.
//!
//! Products are schemaless JSON objects. Only a handful of fields take part
//! in filtering (see [`ProductField`]); everything else passes through the
//! store untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;

/// A schemaless JSON object as stored in a collection.
pub type Document = Map<String, Value>;

/// Name of the key member in serialized documents.
pub const ID_FIELD: &str = "_id";

/// Product fields the catalog knows how to filter and sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    /// `category` (string)
    Category,
    /// `price` (number)
    Price,
    /// `ratings` (number)
    Ratings,
    /// `flashSale` (boolean)
    FlashSale,
}

impl ProductField {
    /// The JSON member name of this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Price => "price",
            Self::Ratings => "ratings",
            Self::FlashSale => "flashSale",
        }
    }
}

/// A stored product: its key plus the document body.
///
/// Serializes as the document with an `_id` member prepended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Store-assigned key.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Document body, without the key.
    #[serde(flatten)]
    pub fields: Document,
}

impl ProductRecord {
    /// Build a record, dropping any `_id` member from the body.
    #[must_use]
    pub fn new(id: ProductId, mut fields: Document) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }

    /// Look up a recognized field in the body.
    #[must_use]
    pub fn field(&self, field: ProductField) -> Option<&Value> {
        self.fields.get(field.as_str())
    }

    /// Numeric value of `ratings`, if it is a JSON number.
    #[must_use]
    pub fn ratings(&self) -> Option<f64> {
        self.field(ProductField::Ratings).and_then(Value::as_f64)
    }
}

/// Remove the key member from a client-supplied body.
///
/// Keys are assigned by the store and never change, so an `_id` in an insert
/// or update payload is ignored.
#[must_use]
pub fn strip_key(mut doc: Document) -> Document {
    doc.remove(ID_FIELD);
    doc
}

/// Merge top-level members of `patch` into `doc`, replacing existing values.
///
/// Returns whether the document changed. The key member is never touched.
pub fn merge_fields(doc: &mut Document, patch: Document) -> bool {
    let mut changed = false;
    for (name, value) in strip_key(patch) {
        if doc.get(&name) != Some(&value) {
            doc.insert(name, value);
            changed = true;
        }
    }
    changed
}

/// Acknowledgment returned after inserting a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: ProductId,
}

impl InsertAck {
    #[must_use]
    pub const fn new(inserted_id: ProductId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Acknowledgment returned after a merge update.
///
/// Updates never upsert, so `upserted_count` is always zero and
/// `upserted_id` always `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<ProductId>,
}

impl UpdateAck {
    #[must_use]
    pub const fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

/// Acknowledgment returned after a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    #[must_use]
    pub const fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_record_serializes_with_key_and_body() {
        let id: ProductId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        let record = ProductRecord::new(id, doc(json!({"name": "Lamp", "price": 12.5})));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "name": "Lamp",
                "price": 12.5
            })
        );
    }

    #[test]
    fn test_record_drops_client_key() {
        let id = ProductId::generate();
        let record = ProductRecord::new(id, doc(json!({"_id": "forged", "name": "Lamp"})));
        assert!(!record.fields.contains_key(ID_FIELD));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_id"], json!(id.to_string()));
    }

    #[test]
    fn test_ratings_only_reads_numbers() {
        let id = ProductId::generate();
        assert_eq!(
            ProductRecord::new(id, doc(json!({"ratings": 4}))).ratings(),
            Some(4.0)
        );
        assert_eq!(
            ProductRecord::new(id, doc(json!({"ratings": "4"}))).ratings(),
            None
        );
    }

    #[test]
    fn test_merge_fields_reports_changes() {
        let mut body = doc(json!({"name": "Lamp", "price": 10}));

        assert!(!merge_fields(&mut body, doc(json!({"price": 10}))));
        assert!(merge_fields(&mut body, doc(json!({"price": 12, "flashSale": true}))));
        assert_eq!(
            Value::Object(body.clone()),
            json!({"name": "Lamp", "price": 12, "flashSale": true})
        );

        assert!(!merge_fields(&mut body, doc(json!({"_id": "forged"}))));
        assert!(!body.contains_key(ID_FIELD));
    }

    #[test]
    fn test_ack_shapes() {
        let id: ProductId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();

        assert_eq!(
            serde_json::to_value(InsertAck::new(id)).unwrap(),
            json!({"acknowledged": true, "insertedId": "67e55044-10b1-426f-9247-bb680e5fe0c8"})
        );
        assert_eq!(
            serde_json::to_value(UpdateAck::new(1, 0)).unwrap(),
            json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 0,
                "upsertedCount": 0,
                "upsertedId": null
            })
        );
        assert_eq!(
            serde_json::to_value(DeleteAck::new(1)).unwrap(),
            json!({"acknowledged": true, "deletedCount": 1})
        );
    }
}
