//! Customer models and positional record mapping.

use crate::source::decode_latin1;
use csv::ByteRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A customer as accepted by the sync endpoint.
///
/// Absent fields are omitted from the serialized form. `properties` holds the
/// loosely typed auxiliary values, so numbers stay numbers through a JSON
/// round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Device identifier supplied by the event when no customer id is known.
    #[serde(rename = "IDFA", default, skip_serializing_if = "Option::is_none")]
    pub idfa: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Time this profile was assembled, `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// One request body for the sync endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncBatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_group: Option<String>,

    pub customers: Vec<Customer>,
}

impl SyncBatch {
    pub fn new(customers: Vec<Customer>, app_group: Option<String>) -> Self {
        SyncBatch {
            app_group,
            customers,
        }
    }

    pub fn single(customer: Customer) -> Self {
        SyncBatch::new(vec![customer], None)
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// Maps `;`-split lines onto customers by position.
///
/// The first two tokens fill `id` and `last_name` and the trailing tokens fill the
/// configured property names. Short lines are not errors: zipping stops at
/// the shorter side and the missing fields are simply left out.
#[derive(Debug, Clone)]
pub struct RecordMapper {
    property_fields: Vec<String>,
}

impl RecordMapper {
    pub fn new(property_fields: Vec<String>) -> Self {
        RecordMapper { property_fields }
    }

    pub fn property_fields(&self) -> &[String] {
        &self.property_fields
    }

    /// Maps one raw record, decoding each field as Latin-1.
    pub fn map_record(&self, record: &ByteRecord) -> Customer {
        let tokens: Vec<String> = record.iter().map(decode_latin1).collect();
        self.map_tokens(&tokens)
    }

    /// Maps one decoded line.
    pub fn map_line(&self, line: &str) -> Customer {
        let tokens: Vec<String> = line.split(';').map(str::to_string).collect();
        self.map_tokens(&tokens)
    }

    fn map_tokens(&self, tokens: &[String]) -> Customer {
        let mut customer = Customer {
            id: tokens.first().cloned(),
            last_name: tokens.get(1).cloned(),
            ..Customer::default()
        };

        let take = self.property_fields.len().min(tokens.len());
        let trailing = &tokens[tokens.len() - take..];
        for (name, token) in self.property_fields.iter().zip(trailing) {
            customer
                .properties
                .insert(name.clone(), Value::String(token.clone()));
        }

        customer
    }
}
