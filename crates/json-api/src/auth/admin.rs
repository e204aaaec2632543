//! Admin guard.

use salvo::prelude::*;
use tracing::warn;

use crate::{errors::ApiError, extensions::*};

/// Reject callers that are not administrators. Runs after the auth hoop.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let principal = match depot.principal_or_401() {
        Ok(principal) => principal,
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    if !principal.is_admin() {
        warn!(user = %principal.user, path = %req.uri().path(), "admin route denied");

        res.render(ApiError::forbidden("Admin access required"));
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::Value;
    use testresult::TestResult;

    use crate::test_helpers::{AppMocks, inject_admin, inject_customer};

    use super::*;

    #[salvo::handler]
    async fn secret(res: &mut Response) {
        res.render("admins only");
    }

    #[tokio::test]
    async fn customers_are_forbidden() -> TestResult {
        let service = AppMocks::default().service(
            Router::new()
                .hoop(inject_customer)
                .hoop(handler)
                .push(Router::new().get(secret)),
        );

        let mut res = TestClient::get("http://example.com").send(&service).await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(body["message"], "Admin access required");

        Ok(())
    }

    #[tokio::test]
    async fn admins_pass_through() -> TestResult {
        let service = AppMocks::default().service(
            Router::new()
                .hoop(inject_admin)
                .hoop(handler)
                .push(Router::new().get(secret)),
        );

        let mut res = TestClient::get("http://example.com").send(&service).await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "admins only");

        Ok(())
    }

    #[tokio::test]
    async fn anonymous_callers_are_unauthorized() {
        let service =
            AppMocks::default().service(Router::new().hoop(handler).push(Router::new().get(secret)));

        let res = TestClient::get("http://example.com").send(&service).await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }
}
