use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A student profile row. `person_nr` is the national id string and the key
/// admin edits are addressed by; `email` is the self-service login identity.
/// JSON uses camelCase to match the front end (`firstName`, `personNr`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub person_nr: String,
    /// School year, 1 through 3
    pub year: i32,
    pub phone: String,
    pub email: String,
    pub address: String,
}
