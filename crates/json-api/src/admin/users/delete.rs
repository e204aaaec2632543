//! Admin Delete User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use crate::{envelope::Acknowledgement, errors::ApiError, extensions::*, state::State};

/// Delete a user. Their orders stay, without an owner.
#[endpoint(
    tags("admin"),
    summary = "Delete User",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Acknowledgement>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let user = user.into_inner();

    if principal.user.into_uuid() == user {
        return Err(ApiError::unprocessable("administrators cannot delete themselves"));
    }

    state.app.users.delete_user(user.into()).await?;

    info!(%user, admin = %principal.user, "user deleted");

    Ok(Json(Acknowledgement::ok("User deleted")))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use topup_app::domain::users::{MockUsersService, UsersServiceError, records::UserUuid};

    use crate::test_helpers::{AppMocks, TEST_ADMIN};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        AppMocks {
            users,
            ..AppMocks::default()
        }
        .admin_service(Router::with_path("admin/users/{user}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_acknowledges() -> TestResult {
        let uuid = UserUuid::new();
        let mut users = MockUsersService::new();

        users
            .expect_delete_user()
            .once()
            .withf(move |user| *user == uuid)
            .return_once(|_| Ok(()));

        let mut res = TestClient::delete(format!("http://example.com/admin/users/{uuid}"))
            .send(&make_service(users))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["message"], "User deleted");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_user_returns_404() {
        let mut users = MockUsersService::new();

        users
            .expect_delete_user()
            .once()
            .return_once(|_| Err(UsersServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/admin/users/{}", UserUuid::new()))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_self() {
        let mut users = MockUsersService::new();

        users.expect_delete_user().never();

        let res = TestClient::delete(format!("http://example.com/admin/users/{TEST_ADMIN}"))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }
}
