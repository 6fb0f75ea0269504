use migration::{AuditMigrator, IdentityMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::settings::Settings;
use crate::errors::InternalError;

/// The identity database holds users, sessions and access records; the audit
/// trail may live in the same database or its own.
pub struct DatabaseConnections {
    pub identity: DatabaseConnection,
    pub audit: DatabaseConnection,
}

impl DatabaseConnections {
    pub async fn init(settings: &Settings) -> Result<Self, InternalError> {
        let identity = Database::connect(&settings.database_url)
            .await
            .map_err(|e| InternalError::database("connect_identity_database", e))?;
        tracing::debug!("Connected to identity database");

        let audit = Database::connect(&settings.audit_database_url)
            .await
            .map_err(|e| InternalError::database("connect_audit_database", e))?;
        tracing::debug!("Connected to audit database");

        Ok(Self { identity, audit })
    }

    pub async fn migrate(&self) -> Result<(), InternalError> {
        IdentityMigrator::up(&self.identity, None)
            .await
            .map_err(|e| InternalError::database("run_identity_migrations", e))?;
        tracing::debug!("Identity database migrations completed");

        AuditMigrator::up(&self.audit, None)
            .await
            .map_err(|e| InternalError::database("run_audit_migrations", e))?;
        tracing::debug!("Audit database migrations completed");

        Ok(())
    }
}
