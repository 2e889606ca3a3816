use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::debug;

use crate::db::StoreError;
use crate::entities::users;

/// A row of the `users` table, including the password hash.
///
/// Never serialized; the API layer converts it into an `Account` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub is_disabled: bool,
    pub token: Option<String>,
}

impl From<users::Model> for StoredAccount {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            full_name: model.full_name,
            email: model.email,
            password_hash: model.password_hash,
            is_disabled: model.is_disabled,
            token: model.token,
        }
    }
}

/// Values for a new row; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub full_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub token: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new account and return the id assigned by the database.
    pub async fn insert(&self, account: NewAccount) -> Result<i32, StoreError> {
        let active = users::ActiveModel {
            username: Set(account.username),
            full_name: Set(account.full_name),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            is_disabled: Set(false),
            token: Set(Some(account.token)),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        Ok(model.id)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<StoredAccount>, StoreError> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        Ok(user.map(StoredAccount::from))
    }

    pub async fn get_by_token(&self, token: &str) -> Result<Option<StoredAccount>, StoreError> {
        let user = users::Entity::find()
            .filter(users::Column::Token.eq(token))
            .one(&self.conn)
            .await?;

        Ok(user.map(StoredAccount::from))
    }

    /// Overwrite the bearer token of one account
    pub async fn update_token(&self, id: i32, token: &str) -> Result<(), StoreError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Token, Expr::value(token.to_string()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            debug!(account_id = id, "Token update matched no rows");
        }

        Ok(())
    }

    pub async fn update_password_hash(&self, id: i32, password_hash: &str) -> Result<(), StoreError> {
        users::Entity::update_many()
            .col_expr(
                users::Column::PasswordHash,
                Expr::value(password_hash.to_string()),
            )
            .filter(users::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}
