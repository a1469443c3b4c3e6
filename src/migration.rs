//! Schema migrations for the relational credential store.

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_auth_tables;

/// Creates the `users` and `sessions` tables.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Own migration table so the host application's migrations don't collide
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("sales_dashboard_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_auth_tables::Migration)]
    }
}
