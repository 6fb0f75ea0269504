use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::internal::UserError;
use crate::errors::InternalError;
use crate::types::db::user::{self, Entity as User};
use crate::types::internal::Role;

/// Fields required to register a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// Repository for user records and credential verification
pub struct UserStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl UserStore {
    /// `password_pepper` is the secret key mixed into every password hash
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    fn hasher(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("hash_password", e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Create a user. Duplicate email maps to `UserError::EmailTaken`.
    pub async fn create(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        let existing = User::find()
            .filter(user::Column::Email.eq(&new_user.email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))?;

        if existing.is_some() {
            return Err(UserError::EmailTaken {
                email: new_user.email,
            }
            .into());
        }

        let now = Utc::now().timestamp();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(new_user.email.clone()),
            password_hash: Set(self.hash_password(&new_user.password)?),
            role: Set(new_user.role),
            name: Set(new_user.name),
            phone: Set(new_user.phone),
            avatar_url: Set(None),
            verified_at: Set(None),
            approved_at: Set(None),
            suspended_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(&self.db).await.map_err(|e| {
            // Unique index race: two concurrent registrations for the same email
            if e.to_string().contains("UNIQUE") {
                InternalError::User(UserError::EmailTaken {
                    email: new_user.email.clone(),
                })
            } else {
                InternalError::database("insert_user", e)
            }
        })?;

        Ok(inserted)
    }

    /// Verify email/password and return the user row.
    ///
    /// Misses return `EmailNotFound`/`IncorrectPassword`; the API layer
    /// collapses both into one invalid-credentials response.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))?
            .ok_or_else(|| UserError::EmailNotFound {
                email: email.to_owned(),
            })?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| InternalError::crypto("parse_password_hash", e.to_string()))?;

        self.hasher()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| UserError::IncorrectPassword {
                user_id: user.id.clone(),
            })?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Lookup that treats a miss as an error
    pub async fn get(&self, user_id: &str) -> Result<user::Model, InternalError> {
        self.find_by_id(user_id).await?.ok_or_else(|| {
            InternalError::User(UserError::NotFound {
                user_id: user_id.to_owned(),
            })
        })
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        name: Option<String>,
        phone: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<user::Model, InternalError> {
        let user = self.get(user_id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if phone.is_some() {
            active.phone = Set(phone);
        }
        if avatar_url.is_some() {
            active.avatar_url = Set(avatar_url);
        }
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_user_profile", e))
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        new_password: &str,
    ) -> Result<user::Model, InternalError> {
        let user = self.get(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(self.hash_password(new_password)?);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("change_password", e))
    }

    pub async fn approve(&self, user_id: &str) -> Result<user::Model, InternalError> {
        let user = self.get(user_id).await?;
        let now = Utc::now().timestamp();
        let mut active: user::ActiveModel = user.into();
        active.approved_at = Set(Some(now));
        active.updated_at = Set(now);

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("approve_user", e))
    }

    pub async fn suspend(&self, user_id: &str) -> Result<user::Model, InternalError> {
        let user = self.get(user_id).await?;
        let now = Utc::now().timestamp();
        let mut active: user::ActiveModel = user.into();
        active.suspended_at = Set(Some(now));
        active.updated_at = Set(now);

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("suspend_user", e))
    }

    pub async fn unsuspend(&self, user_id: &str) -> Result<user::Model, InternalError> {
        let user = self.get(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.suspended_at = Set(None);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("unsuspend_user", e))
    }

    /// Role transitions only happen through this explicit administrative path
    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<user::Model, InternalError> {
        let user = self.get(user_id).await?;
        let mut active: user::ActiveModel = user.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_user_role", e))
    }
}
