use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const TABLE: &str = "department";

pub const FIELDS: &[&str] = &["Id", "Name"];

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Department {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DepartmentPatch {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
