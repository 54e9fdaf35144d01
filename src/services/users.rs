use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::user::{self, Role};
use crate::error::ApiError;
use crate::middleware::auth::generate_token;

#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

pub struct UserService {
    db: DatabaseConnection,
    jwt_secret: String,
}

impl UserService {
    pub fn new(db: DatabaseConnection, jwt_secret: String) -> Self {
        Self { db, jwt_secret }
    }

    pub async fn register(&self, input: Credentials) -> Result<Profile, ApiError> {
        let model = create_account(&self.db, &input.username, &input.password, Role::User).await?;
        Ok(Profile {
            id: model.id,
            username: model.username,
            role: model.role,
        })
    }

    /// Credential check plus token issuance; the role is part of the
    /// lookup so a user token can never be minted from an admin login
    /// form or vice versa.
    pub async fn login(&self, input: Credentials, role: Role) -> Result<String, ApiError> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(&input.username))
            .filter(user::Column::Role.eq(role))
            .one(&self.db)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        model.check_hash(&input.password)?;
        generate_token(&self.jwt_secret, model.id, role)
    }

    /// Administrative listing of user accounts. Admin and store accounts
    /// are not included.
    pub async fn list(&self) -> Result<Vec<Profile>, ApiError> {
        let models = user::Entity::find()
            .filter(user::Column::Role.eq(Role::User))
            .all(&self.db)
            .await?;
        Ok(models
            .into_iter()
            .map(|model| Profile {
                id: model.id,
                username: model.username,
                role: model.role,
            })
            .collect())
    }

    pub async fn profile(&self, account_id: i32) -> Result<Profile, ApiError> {
        let model = user::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(ApiError::NotFound("user"))?;

        Ok(Profile {
            id: model.id,
            username: model.username,
            role: model.role,
        })
    }
}

pub(crate) fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| ApiError::Internal(err.to_string()))?
        .to_string())
}

pub(crate) async fn create_account(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    role: Role,
) -> Result<user::Model, ApiError> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict(format!(
            "username '{username}' already exists"
        )));
    }

    let model = user::ActiveModel {
        username: Set(username.to_owned()),
        password: Set(hash_password(password)?),
        role: Set(role),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(account_id = model.id, %role, "account created");
    Ok(model)
}
