pub use sea_orm_migration::prelude::*;

mod m20260110_000001_create_identity_tables;
mod m20260110_000002_create_access_tables;
mod m20260110_000003_create_audit_tables;

pub struct IdentityMigrator;

#[async_trait::async_trait]
impl MigratorTrait for IdentityMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_create_identity_tables::Migration),
            Box::new(m20260110_000002_create_access_tables::Migration),
        ]
    }
}

pub struct AuditMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AuditMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260110_000003_create_audit_tables::Migration)]
    }
}
