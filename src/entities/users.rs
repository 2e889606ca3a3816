use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(column_name = "fullname")]
    pub full_name: Option<String>,

    pub email: String,

    /// PHC-encoded password hash (Argon2id, or bcrypt for legacy rows)
    #[sea_orm(column_name = "passwordhash")]
    pub password_hash: String,

    /// Stored for compatibility; not consulted by any auth flow.
    #[sea_orm(column_name = "isdisabled")]
    pub is_disabled: bool,

    /// Current bearer token, rewritten on every login.
    #[sea_orm(unique)]
    pub token: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
