//! Admin Credit Balance Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{envelope::Envelope, errors::ApiError, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreditRequest {
    #[salvo(schema(value_type = f64))]
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreditResponse {
    #[salvo(schema(value_type = f64))]
    pub new_balance: Decimal,
    pub transaction_id: Uuid,
}

/// Add funds to a user's balance. Recorded as an `admin_credit` ledger row.
#[endpoint(
    tags("admin"),
    summary = "Credit User Balance",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<CreditRequest>,
    depot: &mut Depot,
) -> Result<Json<Envelope<CreditResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let user = user.into_inner().into();
    let amount = json.into_inner().amount;

    let credited = state.app.wallet.credit_balance(user, amount).await?;

    info!(%user, %amount, admin = %principal.user, "balance credited by admin");

    Ok(Json(Envelope::ok(
        "Balance credited",
        CreditResponse {
            new_balance: credited.new_balance,
            transaction_id: credited.transaction.uuid.into_uuid(),
        },
    )))
}
