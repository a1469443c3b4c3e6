//! User entity model.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing a registered user.
///
/// | Column        | Type               | Description                     |
/// |---------------|--------------------|---------------------------------|
/// | id            | INTEGER (PK)       | Auto-incremented user id        |
/// | username      | TEXT UNIQUE        | Login name                      |
/// | email         | TEXT UNIQUE        | Contact address                 |
/// | password_hash | TEXT               | Argon2 PHC string               |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
