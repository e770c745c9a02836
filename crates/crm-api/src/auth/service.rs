//! 인증 서비스 (가입, 로그인, 내 정보).
//!
//! 로그인 실패는 이메일 없음, 비밀번호 불일치, 해시 손상을 구분하지 않고
//! 같은 응답으로 돌려줍니다. 구분은 로그에서만 합니다.

use std::sync::Arc;

use chrono::Utc;
use crm_core::{AccountView, NewAccount, Role};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::jwt::{Claims, TokenCodec};
use super::password::{PasswordError, PasswordHasher};
use super::VerifiedIdentity;
use crate::error::{ApiError, AuthFailure, CredentialFailure};
use crate::repository::{CredentialStore, DUPLICATE_EMAIL};

/// 가입 요청.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "이메일은 필수입니다"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "비밀번호는 필수입니다"))]
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    /// 비어 있으면 `user`
    #[serde(default)]
    pub role: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// 로그인 요청.
#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// 로그인 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// 24시간 유효한 Bearer 토큰
    pub token: String,
}

/// 없는 이메일로 로그인할 때 대신 검증하는 평문
const DUMMY_PASSWORD: &str = "crm-dummy-password";

/// 인증 서비스.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenCodec>,
    /// 없는 이메일도 같은 작업 계수로 검증하기 위한 해시. 첫 사용 시 생성.
    dummy_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenCodec>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            dummy_hash: OnceCell::new(),
        }
    }

    /// 새 계정 등록.
    ///
    /// 이메일 중복은 저장소의 유일성 제약이 최종 판단합니다. 앞선 조회는
    /// 불필요한 해싱을 피하기 위한 것입니다.
    pub async fn register(&self, request: RegisterRequest) -> Result<AccountView, ApiError> {
        request.validate()?;

        if self.store.find_by_email(&request.email).await?.is_some() {
            return Err(ApiError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let password_hash = self.hash_password(request.password).await?;

        let account = self
            .store
            .insert(NewAccount {
                name: request.name.unwrap_or_default(),
                email: request.email,
                password_hash,
                role: Role::from_input(request.role),
            })
            .await?;

        info!(user_id = account.id, role = %account.role, "계정 등록");
        Ok(AccountView::from(account))
    }

    /// 이메일과 비밀번호로 로그인하고 토큰 발급.
    ///
    /// 이메일이 없어도 더미 해시로 한 번 검증해 응답 시간을 맞춥니다.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let Some(account) = self.store.find_by_email(email).await? else {
            let dummy = self
                .dummy_hash
                .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD.to_string()))
                .await?;
            let _ = self.verify_password(password, dummy).await?;
            return Err(invalid_credentials(CredentialFailure::UnknownEmail));
        };

        match self.verify_password(password, &account.password_hash).await? {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                return Err(invalid_credentials(CredentialFailure::WrongPassword));
            }
            Err(e) => {
                warn!(user_id = account.id, error = %e, "저장된 비밀번호 해시를 해석할 수 없음");
                return Err(invalid_credentials(CredentialFailure::CorruptHash));
            }
        }

        let claims = Claims::for_account(&account, Utc::now());
        let token = self.tokens.issue(&claims).map_err(ApiError::internal)?;

        info!(user_id = account.id, "로그인 성공");
        Ok(LoginResponse { token })
    }

    /// 검증된 신원의 계정 조회. 그 사이 삭제되었으면 NotFound.
    pub async fn me(&self, identity: &VerifiedIdentity) -> Result<AccountView, ApiError> {
        self.store
            .find_by_id(identity.id)
            .await?
            .map(AccountView::from)
            .ok_or_else(|| ApiError::not_found("사용자를 찾을 수 없습니다"))
    }

    /// 블로킹 스레드에서 비밀번호 검증. 바깥 Result는 작업 실패.
    async fn verify_password(
        &self,
        password: &str,
        hash: &str,
    ) -> Result<Result<(), PasswordError>, ApiError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(ApiError::internal)
    }

    /// 블로킹 스레드에서 비밀번호 해싱.
    pub async fn hash_password(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(ApiError::internal)?
            .map_err(ApiError::internal)
    }
}

fn invalid_credentials(reason: CredentialFailure) -> ApiError {
    ApiError::Authentication(AuthFailure::InvalidCredentials(reason))
}
