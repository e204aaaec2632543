//! Admin user management

pub(crate) mod credit;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use topup_app::domain::users::records::UserRecord;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    /// `customer` or `admin`
    pub role: String,
    #[salvo(schema(value_type = f64))]
    pub balance: Decimal,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.uuid.into_uuid(),
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            balance: user.balance,
            created_at: user.created_at.to_string(),
        }
    }
}
