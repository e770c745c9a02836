//! 인메모리 계정 저장소 (테스트용).

use async_trait::async_trait;
use chrono::Utc;
use crm_core::{Account, AccountUpdate, NewAccount};
use tokio::sync::RwLock;

use super::{CredentialStore, StoreError, UserStore, DUPLICATE_EMAIL};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    accounts: Vec<Account>,
}

impl Inner {
    fn live(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|a| !a.is_deleted())
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.live()
            .any(|a| a.email == email && Some(a.id) != except)
    }
}

/// `PgUserStore`와 같은 규칙을 따르는 인메모리 저장소.
///
/// 중복 검사와 삽입이 하나의 쓰기 잠금 안에서 이루어집니다.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 해시를 직접 바꿔 넣기 (손상된 해시 시나리오용).
    pub async fn overwrite_hash(&self, id: i64, hash: &str) {
        let mut inner = self.inner.write().await;
        if let Some(account) = inner.accounts.iter_mut().find(|a| a.id == id) {
            account.password_hash = hash.to_string();
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        let found = inner.live().find(|a| a.email == email).cloned();
        Ok(found)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        let found = inner.live().find(|a| a.id == id).cloned();
        Ok(found)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.email_taken(&account.email, None) {
            return Err(StoreError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        inner.next_id += 1;
        let stored = Account {
            id: inner.next_id,
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            created_at: Utc::now(),
            deleted_at: None,
        };
        inner.accounts.push(stored.clone());

        Ok(stored)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().await;
        let accounts = inner.live().cloned().collect();
        Ok(accounts)
    }

    async fn update(&self, id: i64, update: AccountUpdate) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(email) = &update.email {
            if inner.email_taken(email, Some(id)) {
                return Err(StoreError::Conflict(DUPLICATE_EMAIL.to_string()));
            }
        }

        let Some(account) = inner
            .accounts
            .iter_mut()
            .find(|a| a.id == id && !a.is_deleted())
        else {
            return Ok(None);
        };
        update.apply_to(account);

        Ok(Some(account.clone()))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(account) = inner
            .accounts
            .iter_mut()
            .find(|a| a.id == id && !a.is_deleted())
        else {
            return Ok(false);
        };
        account.deleted_at = Some(Utc::now());

        Ok(true)
    }
}
