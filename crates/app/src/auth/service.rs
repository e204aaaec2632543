//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenVersion, AuthServiceError, build_verifier_input, format_api_token,
        generate_api_token_secret, hash_verifier_input,
        models::{ApiTokenMetadata, IssuedApiToken, NewApiToken, Principal},
        parse_api_token,
        repository::PgAuthRepository,
        verifier_matches,
    },
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for `user`. The raw token is only returned here.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::UserNotFound`] for an unknown user, or a
    /// storage error when the insert fails.
    pub async fn issue_api_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        let token_hash =
            hash_verifier_input(&build_verifier_input(&token_uuid, version, user, &secret));

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                user,
                version,
                token_hash,
                expires_at,
            })
            .await?;

        info!(token = %token_uuid, %user, "api token issued");

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for `user`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens_by_user(user).await?)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        let revoked = self.repository.revoke_api_token(token_uuid).await?;

        if revoked.is_some() {
            info!(token = %token_uuid, "api token revoked");
        }

        Ok(revoked.is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|error| {
            debug!(%error, "malformed bearer token");

            AuthServiceError::NotFound
        })?;

        let token = self
            .repository
            .find_active_api_token_by_uuid(parsed.token_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let computed = hash_verifier_input(&build_verifier_input(
            &parsed.token_uuid,
            parsed.version,
            token.user,
            &parsed.secret,
        ));

        if token.version != parsed.version || !verifier_matches(&computed, &token.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        // last_used_at is advisory; a failed write does not fail the request.
        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed.token_uuid)
            .await
        {
            debug!(%error, "failed to record token use");
        }

        Ok(Principal {
            user: token.user,
            role: token.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}
