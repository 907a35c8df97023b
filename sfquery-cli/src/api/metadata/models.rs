//! Salesforce object metadata models

use serde::{Deserialize, Serialize};

/// One field descriptor from a describe call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// API name (e.g., "AccountId", "Custom__c")
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Salesforce field type (e.g., "id", "string", "reference")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nillable: Option<bool>,
    /// Target objects for reference fields
    #[serde(rename = "referenceTo", default, skip_serializing_if = "Vec::is_empty")]
    pub reference_to: Vec<String>,
}

/// Result of `sobjects/<name>/describe`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Fields in server-returned order
    pub fields: Vec<FieldDescription>,
}

impl ObjectDescription {
    /// Field API names, preserving server order
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

/// Entry of the global object listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queryable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<bool>,
}

/// Result of `<data_path>/sobjects`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectList {
    #[serde(rename = "sobjects")]
    pub objects: Vec<ObjectSummary>,
    /// Largest batch the tenant accepts
    #[serde(rename = "maxBatchSize")]
    pub max_batch_size: u64,
}

impl ObjectList {
    pub fn names(&self) -> Vec<&str> {
        self.objects.iter().map(|o| o.name.as_str()).collect()
    }
}
