//! # Response Formatting
//!
//! Bodies returned by the table and upload endpoints.

use serde::Serialize;
use serde_json::{Map, Value};

pub const RECORD_ADDED: &str = "Record added successfully.";
pub const RECORD_UPDATED: &str = "Record Update successfully.";
pub const RECORD_CREATED_ON_NO_MATCH: &str = "No Match Found, Record Created Successfully";
pub const RECORD_DELETED: &str = "Record deleted successfully.";
pub const RECORD_NOT_FOUND: &str = "No record found matching this ID";
pub const FILE_UPLOADED: &str =
    "File Uploaded Successfully, You can now start accessing the API via /api";

/// Every row of the table
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub data: Vec<Map<String, Value>>,
}

impl ListResponse {
    pub fn new(data: Vec<Map<String, Value>>) -> Self {
        Self { data }
    }
}

/// Outcome message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_response_serialization() {
        let mut row = Map::new();
        row.insert("bookno".into(), json!(1));
        let json = serde_json::to_value(ListResponse::new(vec![row])).unwrap();
        assert_eq!(json, json!({"data": [{"bookno": 1}]}));
    }

    #[test]
    fn test_message_response_serialization() {
        let json = serde_json::to_value(MessageResponse::new(RECORD_ADDED)).unwrap();
        assert_eq!(json, json!({"message": "Record added successfully."}));
    }
}
