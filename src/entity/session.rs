//! Session entity model.
//!
//! Maps to the `sessions` table. Rows are looked up by their random
//! `session_id` token, never by the integer primary key.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing a login session.
///
/// | Column           | Type               | Description                         |
/// |------------------|--------------------|-------------------------------------|
/// | id               | INTEGER (PK)       | Auto-incremented row id             |
/// | session_id       | TEXT UNIQUE        | 32-char hex token handed to clients |
/// | user_id          | INTEGER (FK)       | Owning user, `users.id`             |
/// | expiry_timestamp | TIMESTAMPTZ        | UTC instant after which it is stale |
///
/// Expired rows are not deleted; lookups compare `expiry_timestamp` against
/// the current time and ignore stale rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub session_id: String,

    pub user_id: i32,

    pub expiry_timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
