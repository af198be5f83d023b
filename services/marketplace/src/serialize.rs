//! Wire serialization for persisted documents
//!
//! Stored documents carry ObjectIds and BSON datetimes; responses carry
//! their canonical text forms (24-hex identifiers, RFC 3339 timestamps).
//! The pass descends into nested documents and arrays and is idempotent:
//! values already in text form are left untouched.

use chrono::SecondsFormat;
use mongodb::bson::{Bson, Document};

/// Recursively replace ObjectIds and datetimes with their string forms
pub fn serialize_bson(value: Bson) -> Bson {
    match value {
        Bson::ObjectId(oid) => Bson::String(oid.to_hex()),
        Bson::DateTime(dt) => Bson::String(
            dt.to_chrono()
                .to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ),
        Bson::Document(doc) => Bson::Document(serialize_document(doc)),
        Bson::Array(items) => Bson::Array(items.into_iter().map(serialize_bson).collect()),
        other => other,
    }
}

/// Serialize every value of a document, preserving key order
pub fn serialize_document(doc: Document) -> Document {
    doc.into_iter()
        .map(|(key, value)| (key, serialize_bson(value)))
        .collect()
}

/// Convert a stored document into its JSON wire representation
pub fn to_wire(doc: Document) -> serde_json::Value {
    Bson::Document(serialize_document(doc)).into()
}

/// Convert a list of stored documents into a JSON array
pub fn to_wire_list(docs: Vec<Document>) -> serde_json::Value {
    serde_json::Value::Array(docs.into_iter().map(to_wire).collect())
}
