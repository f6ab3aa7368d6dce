use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A platform user as stored in the `users` collection. The identity
/// service resolves emails to these records.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Custom claim: which dispensary this user belongs to, if any.
    pub dispensary_id: Option<Uuid>,
    /// Custom claim: platform role, e.g. "dispensary_owner".
    pub role: Option<String>,
    /// Advisor-interaction credit balance.
    pub credits: i64,
}
