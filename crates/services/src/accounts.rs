//! # Account service
//!
//! Registration, login, and profile management over the [`AccountRepo`]
//! and [`PasswordService`] ports. Session issuance itself stays with the
//! web layer; this service only answers whether credentials check out.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    Account, AccountRepo, AppError, FieldError, PasswordService, Result, UserProfile,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::content::normalize_url;

const MAX_USERNAME_LEN: usize = 30;

/// Everything collected by the registration form.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub website: String,
    /// Media id of an already-stored picture upload.
    pub picture: Option<String>,
}

pub struct AccountService {
    repo: Arc<dyn AccountRepo>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepo>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { repo, passwords }
    }

    pub async fn register(&self, reg: Registration) -> Result<Account> {
        let username = reg.username.trim();
        let email = reg.email.trim();

        let mut errors = Vec::new();
        if username.is_empty() {
            errors.push(FieldError::new("username", "This field is required."));
        } else if username.len() > MAX_USERNAME_LEN
            || !username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            errors.push(FieldError::new(
                "username",
                "Letters, digits and _ - . only, at most 30 characters.",
            ));
        }
        if email.is_empty() || !email.contains('@') {
            errors.push(FieldError::new("email", "Enter a valid email address."));
        }
        if reg.password.is_empty() {
            errors.push(FieldError::new("password", "This field is required."));
        }
        let website = if reg.website.trim().is_empty() {
            None
        } else {
            match normalize_url(&reg.website) {
                Ok(url) => Some(url),
                Err(message) => {
                    errors.push(FieldError::new("website", message));
                    None
                }
            }
        };
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        if self.repo.find_account(username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "username '{username}' is taken"
            )));
        }

        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: self.passwords.hash_password(&reg.password).await?,
            is_active: true,
            created_at: Utc::now(),
        };
        self.repo.create_account(account.clone()).await?;

        // A profile row only exists once the user has given it content.
        if website.is_some() || reg.picture.is_some() {
            self.repo
                .save_profile(UserProfile {
                    account_id: account.id,
                    website: website.unwrap_or_default(),
                    picture: reg.picture,
                })
                .await?;
        }

        info!(username = %account.username, "account registered");
        Ok(account)
    }

    /// Credential check. The disabled-account message is deliberately
    /// distinct from the bad-credentials one, matching the original flow.
    pub async fn login(&self, username: &str, password: &str) -> Result<Account> {
        let account = match self.repo.find_account(username.trim()).await? {
            Some(account) => account,
            None => {
                warn!(username = %username.trim(), "login attempt for unknown username");
                return Err(AppError::Unauthorized(
                    "Invalid login details provided.".to_string(),
                ));
            }
        };

        if !self
            .passwords
            .verify_password(password, &account.password_hash)
            .await
        {
            warn!(username = %account.username, "login attempt with bad password");
            return Err(AppError::Unauthorized(
                "Invalid login details provided.".to_string(),
            ));
        }

        if !account.is_active {
            return Err(AppError::Unauthorized(
                "Your Rango account is disabled.".to_string(),
            ));
        }

        Ok(account)
    }

    pub async fn profile_for(&self, username: &str) -> Result<Option<(Account, UserProfile)>> {
        let Some(account) = self.repo.find_account(username).await? else {
            return Ok(None);
        };
        let Some(profile) = self.repo.get_profile(account.id).await? else {
            return Ok(None);
        };
        Ok(Some((account, profile)))
    }

    pub async fn complete_profile(
        &self,
        account_id: Uuid,
        website: &str,
        picture: Option<String>,
    ) -> Result<UserProfile> {
        let website = if website.trim().is_empty() {
            String::new()
        } else {
            normalize_url(website)
                .map_err(|message| AppError::Validation(vec![FieldError::new("website", message)]))?
        };

        let profile = UserProfile {
            account_id,
            website,
            picture,
        };
        self.repo.save_profile(profile.clone()).await?;
        Ok(profile)
    }

    pub async fn list_profiles(&self) -> Result<Vec<(Account, UserProfile)>> {
        Ok(self.repo.list_profiles().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MockAccountRepo, MockPasswordService};

    fn hasher() -> MockPasswordService {
        let mut passwords = MockPasswordService::new();
        passwords
            .expect_hash_password()
            .returning(|_| Ok("$argon2id$stub".to_string()));
        passwords
            .expect_verify_password()
            .returning(|password, _| password == "correct horse");
        passwords
    }

    fn account(active: bool) -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "leifos".into(),
            email: "leifos@tango.example".into(),
            password_hash: "$argon2id$stub".into(),
            is_active: active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account()
            .returning(|_| Ok(Some(account(true))));
        repo.expect_create_account().times(0);

        let err = AccountService::new(Arc::new(repo), Arc::new(hasher()))
            .register(Registration {
                username: "leifos".into(),
                email: "leifos@tango.example".into(),
                password: "correct horse".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_without_profile_fields_creates_no_profile() {
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account().returning(|_| Ok(None));
        repo.expect_create_account().returning(|_| Ok(()));
        repo.expect_save_profile().times(0);

        AccountService::new(Arc::new(repo), Arc::new(hasher()))
            .register(Registration {
                username: "maxwelld90".into(),
                email: "max@tango.example".into(),
                password: "correct horse".into(),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn login_distinguishes_disabled_accounts() {
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account()
            .returning(|_| Ok(Some(account(false))));

        let err = AccountService::new(Arc::new(repo), Arc::new(hasher()))
            .login("leifos", "correct horse")
            .await
            .unwrap_err();
        match err {
            AppError::Unauthorized(message) => assert!(message.contains("disabled")),
            other => panic!("expected unauthorized, got {other}"),
        }
    }

    #[tokio::test]
    async fn login_rejects_bad_password() {
        let mut repo = MockAccountRepo::new();
        repo.expect_find_account()
            .returning(|_| Ok(Some(account(true))));

        let err = AccountService::new(Arc::new(repo), Arc::new(hasher()))
            .login("leifos", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
