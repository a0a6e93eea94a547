//! Module declaration and lifecycle

use crate::config::Config;
use crate::contract::NotetypeSettingsApi;
use crate::domain::{DefinitionTable, Service, TemplateCatalog, TracingEventPublisher};
use crate::infra::catalog::{DirectoryCatalog, StaticCatalog};
use crate::infra::storage::{migrations::Migrator, repositories::SeaOrmNotetypeRepository};
use anyhow::{Context, Result};
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Notetype settings module
pub struct NotetypeSettingsModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for NotetypeSettingsModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl NotetypeSettingsModule {
    /// Build catalog, repository and domain service
    pub async fn init(&self, cfg: Config, db: Arc<DatabaseConnection>) -> Result<()> {
        let catalog: Arc<dyn TemplateCatalog> = match &cfg.templates_dir {
            Some(dir) => Arc::new(DirectoryCatalog::load(dir)?),
            None => Arc::new(StaticCatalog::default()),
        };

        // Field settings of every authored family are known up front
        let families = catalog.families();
        let definitions = DefinitionTable::with_families(families.iter())
            .context("Failed to build setting definitions")?;

        let repo = Arc::new(SeaOrmNotetypeRepository::new(db));
        let event_publisher = Arc::new(TracingEventPublisher);

        let service = Service::new(repo, catalog, definitions, event_publisher)
            .with_options(cfg.service_options());
        *self.service.write() = Some(Arc::new(service));
        *self.config.write() = cfg;

        tracing::info!(families = families.len(), "Notetype settings initialized");
        Ok(())
    }

    /// Run database migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None).await?;
        tracing::info!("Notetype settings migrations completed");
        Ok(())
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client
    pub fn client(&self) -> Result<Arc<dyn NotetypeSettingsApi>> {
        Ok(Arc::new(crate::api::native::NativeClient::new(self.service()?)))
    }

    /// Register the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;

        tracing::info!("Registering notetype settings REST routes");
        crate::api::rest::routes::register_routes(router, service)
    }
}
