//! Application context - dependency injection container

use std::sync::Arc;

use oficina_core::{
    CatalogService, ClientRepository, ContractRepository, DocumentRenderer, DocumentService,
    InvoiceRepository, LifecycleService, LifecycleStore, MaterialRepository, QuoteRepository,
    QuoteService, ReportService, ServiceOrderRepository, UserRepository, UserService,
};
use oficina_domain::{Config, Result};
use oficina_infra::config as config_loader;
use oficina_infra::{
    ArtifactRenderer, DbManager, SqliteClientRepository, SqliteContractRepository,
    SqliteInvoiceRepository, SqliteLifecycleStore, SqliteMaterialRepository,
    SqliteQuoteRepository, SqliteServiceOrderRepository, SqliteUserRepository,
};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds the configuration and every wired service
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub catalog: Arc<CatalogService>,
    pub users: Arc<UserService>,
    pub quotes: Arc<QuoteService>,
    pub lifecycle: Arc<LifecycleService>,
    pub reports: Arc<ReportService>,
    pub documents: Arc<DocumentService>,
}

impl AppContext {
    /// Create a new application context from the probed configuration
    /// (environment, then config files, then defaults).
    pub fn new() -> Result<Self> {
        Self::new_with_config(config_loader::load()?)
    }

    /// Create a new application context with custom configuration.
    ///
    /// Tests use this to point the context at a per-test database file.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let clients: Arc<dyn ClientRepository> =
            Arc::new(SqliteClientRepository::new(Arc::clone(&db)));
        let materials: Arc<dyn MaterialRepository> =
            Arc::new(SqliteMaterialRepository::new(Arc::clone(&db)));
        let users: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(Arc::clone(&db)));
        let quotes: Arc<dyn QuoteRepository> =
            Arc::new(SqliteQuoteRepository::new(Arc::clone(&db)));
        let orders: Arc<dyn ServiceOrderRepository> =
            Arc::new(SqliteServiceOrderRepository::new(Arc::clone(&db)));
        let contracts: Arc<dyn ContractRepository> =
            Arc::new(SqliteContractRepository::new(Arc::clone(&db)));
        let invoices: Arc<dyn InvoiceRepository> =
            Arc::new(SqliteInvoiceRepository::new(Arc::clone(&db)));
        let store: Arc<dyn LifecycleStore> = Arc::new(SqliteLifecycleStore::new(Arc::clone(&db)));
        let renderer: Arc<dyn DocumentRenderer> =
            Arc::new(ArtifactRenderer::new(config.render.clone()));

        let catalog =
            Arc::new(CatalogService::new(Arc::clone(&clients), Arc::clone(&materials)));
        let user_service = Arc::new(UserService::new(Arc::clone(&users)));
        let quote_service = Arc::new(QuoteService::new(
            Arc::clone(&quotes),
            Arc::clone(&clients),
            Arc::clone(&materials),
            Arc::clone(&users),
            config.quoting.validity_days,
        ));
        let lifecycle = Arc::new(LifecycleService::new(
            Arc::clone(&quotes),
            Arc::clone(&orders),
            Arc::clone(&contracts),
            Arc::clone(&invoices),
            store,
            config.render.company_name.clone(),
        ));
        let reports = Arc::new(ReportService::new(
            Arc::clone(&clients),
            Arc::clone(&materials),
            Arc::clone(&quotes),
            Arc::clone(&orders),
            Arc::clone(&invoices),
        ));
        let documents = Arc::new(DocumentService::new(
            quotes,
            clients,
            users,
            materials,
            orders,
            contracts,
            invoices,
            renderer,
        ));

        Ok(Self {
            config,
            db,
            catalog,
            users: user_service,
            quotes: quote_service,
            lifecycle,
            reports,
            documents,
        })
    }

    /// Probe every application component and score the result.
    pub async fn health_check(&self) -> HealthStatus {
        let mut components = vec![self.check_database_health().await];

        // Services hold no connections of their own; they are healthy
        // whenever the context exists.
        for service in [
            "catalog_service",
            "quote_service",
            "lifecycle_service",
            "report_service",
            "document_service",
        ] {
            components.push(ComponentHealth::healthy(service));
        }

        HealthStatus::from_components(components)
    }

    /// Run the database probe query off the async runtime.
    async fn check_database_health(&self) -> ComponentHealth {
        let db = Arc::clone(&self.db);
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "database health check failed");
                ComponentHealth::unhealthy("database", format!("query failed: {e}"))
            }
            Err(e) => {
                tracing::error!(error = %e, "database health check task panicked");
                ComponentHealth::unhealthy("database", format!("task panic: {e}"))
            }
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").field("database", &self.db.path()).finish_non_exhaustive()
    }
}
