use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::storage::UserStore;

/// Step of a credential operation that failed for infrastructure reasons.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed")]
    Hash(#[source] anyhow::Error),
    #[error("user insert failed")]
    Insert(#[source] anyhow::Error),
    #[error("user lookup failed")]
    Lookup(#[source] anyhow::Error),
    #[error("password update failed")]
    Update(#[source] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    /// Unknown username and wrong password both land here.
    InvalidCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset,
    EmailNotFound,
}

pub async fn register(
    store: &dyn UserStore,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), CredentialError> {
    let hash = hash_password(password).map_err(CredentialError::Hash)?;
    store
        .insert(username, email, &hash)
        .await
        .map_err(CredentialError::Insert)
}

pub async fn authenticate(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<LoginOutcome, CredentialError> {
    let Some(user) = store
        .find_by_username(username)
        .await
        .map_err(CredentialError::Lookup)?
    else {
        debug!("no user with that username");
        return Ok(LoginOutcome::InvalidCredentials);
    };

    match verify_password(password, &user.password) {
        Ok(true) => Ok(LoginOutcome::Success),
        Ok(false) => Ok(LoginOutcome::InvalidCredentials),
        Err(e) => {
            warn!(error = %e, username = %user.username, "stored password hash is unreadable");
            Ok(LoginOutcome::InvalidCredentials)
        }
    }
}

/// Anyone who knows a registered email can reset the password; every row
/// sharing the email gets the new hash. Concurrent resets are last-write-wins.
pub async fn reset_password(
    store: &dyn UserStore,
    email: &str,
    new_password: &str,
) -> Result<ResetOutcome, CredentialError> {
    if store
        .find_by_email(email)
        .await
        .map_err(CredentialError::Lookup)?
        .is_none()
    {
        return Ok(ResetOutcome::EmailNotFound);
    }

    let hash = hash_password(new_password).map_err(CredentialError::Hash)?;
    let touched = store
        .update_password_by_email(email, &hash)
        .await
        .map_err(CredentialError::Update)?;
    debug!(rows = touched, "password hash replaced");
    Ok(ResetOutcome::Reset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fakes::{FailingUserStore, MemoryUserStore, ReadOnlyUserStore};

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let store = MemoryUserStore::default();
        register(&store, "alice", "a@x.com", "pw1").await.unwrap();

        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "alice");
        assert_eq!(rows[0].email, "a@x.com");
        assert_ne!(rows[0].password, "pw1");
        assert!(verify_password("pw1", &rows[0].password).unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_an_insert_error() {
        let store = MemoryUserStore::default();
        register(&store, "alice", "a@x.com", "pw1").await.unwrap();
        let err = register(&store, "alice", "other@x.com", "pw2").await.unwrap_err();
        assert!(matches!(err, CredentialError::Insert(_)));
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_accepted() {
        let store = MemoryUserStore::default();
        register(&store, "alice", "shared@x.com", "pw1").await.unwrap();
        register(&store, "bob", "shared@x.com", "pw2").await.unwrap();
        assert_eq!(store.rows().len(), 2);
    }

    #[tokio::test]
    async fn authenticate_failures_are_indistinguishable() {
        let store = MemoryUserStore::default();
        register(&store, "alice", "a@x.com", "pw1").await.unwrap();

        let wrong_password = authenticate(&store, "alice", "wrong").await.unwrap();
        let unknown_user = authenticate(&store, "bob", "anything").await.unwrap();
        assert_eq!(wrong_password, LoginOutcome::InvalidCredentials);
        assert_eq!(wrong_password, unknown_user);
    }

    #[tokio::test]
    async fn username_match_is_exact() {
        let store = MemoryUserStore::default();
        register(&store, "alice", "a@x.com", "pw1").await.unwrap();
        assert_eq!(
            authenticate(&store, "Alice", "pw1").await.unwrap(),
            LoginOutcome::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn unreadable_stored_hash_is_a_failed_login() {
        let store = MemoryUserStore::default();
        store.seed("legacy", "l@x.com", "plaintext");
        assert_eq!(
            authenticate(&store, "legacy", "plaintext").await.unwrap(),
            LoginOutcome::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn full_credential_lifecycle() {
        let store = MemoryUserStore::default();
        register(&store, "alice", "a@x.com", "pw1").await.unwrap();
        assert_eq!(authenticate(&store, "alice", "pw1").await.unwrap(), LoginOutcome::Success);
        assert_eq!(
            authenticate(&store, "alice", "wrong").await.unwrap(),
            LoginOutcome::InvalidCredentials
        );
        assert_eq!(
            authenticate(&store, "bob", "anything").await.unwrap(),
            LoginOutcome::InvalidCredentials
        );

        assert_eq!(reset_password(&store, "a@x.com", "pw2").await.unwrap(), ResetOutcome::Reset);
        assert_eq!(
            authenticate(&store, "alice", "pw1").await.unwrap(),
            LoginOutcome::InvalidCredentials
        );
        assert_eq!(authenticate(&store, "alice", "pw2").await.unwrap(), LoginOutcome::Success);
    }

    #[tokio::test]
    async fn reset_unknown_email_changes_nothing() {
        let store = MemoryUserStore::default();
        register(&store, "alice", "a@x.com", "pw1").await.unwrap();
        let before = store.rows()[0].password.clone();

        let outcome = reset_password(&store, "nobody@x.com", "pw2").await.unwrap();
        assert_eq!(outcome, ResetOutcome::EmailNotFound);
        assert_eq!(store.rows()[0].password, before);
    }

    #[tokio::test]
    async fn reset_updates_every_row_sharing_the_email() {
        let store = MemoryUserStore::default();
        register(&store, "alice", "shared@x.com", "pw-a").await.unwrap();
        register(&store, "bob", "shared@x.com", "pw-b").await.unwrap();
        register(&store, "carol", "c@x.com", "pw-c").await.unwrap();

        reset_password(&store, "shared@x.com", "new").await.unwrap();

        for row in store.rows() {
            match row.username.as_str() {
                "alice" | "bob" => {
                    assert!(verify_password("new", &row.password).unwrap());
                    assert!(!verify_password("pw-a", &row.password).unwrap());
                    assert!(!verify_password("pw-b", &row.password).unwrap());
                }
                _ => assert!(verify_password("pw-c", &row.password).unwrap()),
            }
        }
    }

    #[tokio::test]
    async fn repeated_reset_still_verifies() {
        let store = MemoryUserStore::default();
        register(&store, "alice", "a@x.com", "pw1").await.unwrap();

        reset_password(&store, "a@x.com", "pw2").await.unwrap();
        let first = store.rows()[0].password.clone();
        reset_password(&store, "a@x.com", "pw2").await.unwrap();
        let second = store.rows()[0].password.clone();

        assert_ne!(first, second);
        assert_eq!(authenticate(&store, "alice", "pw2").await.unwrap(), LoginOutcome::Success);
    }

    #[tokio::test]
    async fn storage_failures_name_the_failing_step() {
        let store = FailingUserStore;
        assert!(matches!(
            register(&store, "a", "a@x.com", "pw").await,
            Err(CredentialError::Insert(_))
        ));
        assert!(matches!(
            authenticate(&store, "a", "pw").await,
            Err(CredentialError::Lookup(_))
        ));
        assert!(matches!(
            reset_password(&store, "a@x.com", "pw").await,
            Err(CredentialError::Lookup(_))
        ));
    }

    #[tokio::test]
    async fn reset_write_failure_is_an_update_error() {
        let inner = MemoryUserStore::default();
        inner.seed("alice", "a@x.com", "irrelevant");
        let store = ReadOnlyUserStore(inner);

        let err = reset_password(&store, "a@x.com", "pw2").await.unwrap_err();
        assert!(matches!(err, CredentialError::Update(_)));
    }
}
