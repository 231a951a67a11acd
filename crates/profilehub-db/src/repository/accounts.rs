//! Account operations

use chrono::Utc;
use sqlx::Row;
use tracing::debug;

use crate::error::DbError;
use crate::models::{Account, NewAccount, Profile};
use crate::repository::Database;
use crate::utils::normalize_email;

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, profile_name, profile_bio, \
     profile_phone, profile_photo, profile_is_public, is_admin, created_at, updated_at";

impl Database {
    // ==================== Account Operations ====================

    /// Insert a new account
    ///
    /// The email is the login key, so a second account with the same
    /// (normalized) email is rejected with [`DbError::DuplicateEmail`].
    pub async fn insert_account(&self, account: NewAccount) -> Result<Account, DbError> {
        let now = Utc::now();
        let email = normalize_email(&account.email);

        // Check if email already exists
        let existing = self.get_account_by_email(&email).await?;
        if existing.is_some() {
            return Err(DbError::DuplicateEmail(email));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (username, email, password_hash, profile_is_public, is_admin, created_at, updated_at)
            VALUES (?, ?, ?, 1, 0, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&account.username)
        .bind(&email)
        .bind(&account.password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                DbError::DuplicateEmail(email.clone())
            }
            other => DbError::from(other),
        })?;

        let id: i64 = result.get("id");
        debug!("Inserted account {} for {}", id, account.username);

        Ok(Account {
            id,
            username: account.username,
            email,
            password_hash: account.password_hash,
            profile: Profile::default(),
            is_admin: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an account by email
    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
        let result = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?"
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an account by ID
    pub async fn get_account_by_id(&self, id: i64) -> Result<Option<Account>, DbError> {
        let result = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all accounts
    pub async fn list_accounts(&self) -> Result<Vec<Account>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Account::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// List accounts whose profile is public
    pub async fn list_public_accounts(&self) -> Result<Vec<Account>, DbError> {
        let rows = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE profile_is_public = 1 ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Account::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Replace the profile sub-document of an account
    ///
    /// Every field is overwritten; fields absent from `profile` end up empty.
    /// Returns `None` when no account has the given ID.
    pub async fn replace_profile(&self, id: i64, profile: &Profile) -> Result<Option<Account>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET profile_name = ?, profile_bio = ?, profile_phone = ?, profile_photo = ?,
                profile_is_public = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.bio)
        .bind(&profile.phone)
        .bind(&profile.photo)
        .bind(profile.is_public)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_account_by_id(id).await
    }

    /// Update the profile visibility flag
    pub async fn set_profile_visibility(&self, id: i64, is_public: bool) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET profile_is_public = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(is_public)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or clear the admin flag for the account with the given email
    ///
    /// Only used for out-of-band provisioning; no HTTP route reaches this.
    pub async fn set_admin(&self, email: &str, is_admin: bool) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET is_admin = ?, updated_at = ?
            WHERE email = ?
            "#,
        )
        .bind(is_admin)
        .bind(now.to_rfc3339())
        .bind(normalize_email(email))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();
        (db, dir)
    }

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_account() {
        let (db, _dir) = test_db().await;

        let created = db.insert_account(new_account("alice", "a@x.com")).await.unwrap();
        assert!(created.id > 0);
        assert!(created.profile.is_public);
        assert!(!created.is_admin);

        let by_email = db.get_account_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.username, "alice");
        assert!(by_email.profile.is_public);

        let by_id = db.get_account_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        assert!(db.get_account_by_id(created.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (db, _dir) = test_db().await;

        db.insert_account(new_account("alice", "a@x.com")).await.unwrap();
        let err = db.insert_account(new_account("other", "A@X.com")).await.unwrap_err();
        assert!(matches!(err, DbError::DuplicateEmail(_)));

        // Same username with a different email is fine
        db.insert_account(new_account("alice", "b@x.com")).await.unwrap();
        assert_eq!(db.list_accounts().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_replace_profile_overwrites_all_fields() {
        let (db, _dir) = test_db().await;
        let account = db.insert_account(new_account("alice", "a@x.com")).await.unwrap();

        let first = Profile {
            name: Some("Alice".to_string()),
            bio: Some("hello".to_string()),
            phone: Some("555-0100".to_string()),
            photo: None,
            is_public: false,
        };
        let updated = db.replace_profile(account.id, &first).await.unwrap().unwrap();
        assert_eq!(updated.profile, first);

        let second = Profile {
            name: Some("Al".to_string()),
            ..Profile::default()
        };
        let updated = db.replace_profile(account.id, &second).await.unwrap().unwrap();
        assert_eq!(updated.profile.bio, None);
        assert_eq!(updated.profile.phone, None);
        assert!(updated.profile.is_public);

        assert!(db.replace_profile(9999, &second).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_visibility_and_public_listing() {
        let (db, _dir) = test_db().await;
        let alice = db.insert_account(new_account("alice", "a@x.com")).await.unwrap();
        let bob = db.insert_account(new_account("bob", "b@x.com")).await.unwrap();

        assert!(db.set_profile_visibility(alice.id, false).await.unwrap());
        assert!(!db.set_profile_visibility(9999, false).await.unwrap());

        let public = db.list_public_accounts().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, bob.id);

        assert_eq!(db.list_accounts().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_set_admin() {
        let (db, _dir) = test_db().await;
        let account = db.insert_account(new_account("root", "root@x.com")).await.unwrap();

        assert!(db.set_admin("root@x.com", true).await.unwrap());
        assert!(db.get_account_by_id(account.id).await.unwrap().unwrap().is_admin);

        assert!(db.set_admin("root@x.com", false).await.unwrap());
        assert!(!db.get_account_by_id(account.id).await.unwrap().unwrap().is_admin);

        assert!(!db.set_admin("missing@x.com", true).await.unwrap());
    }
}
