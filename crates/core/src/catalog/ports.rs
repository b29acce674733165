//! Port interfaces for the client and material catalog
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for catalog persistence.

use async_trait::async_trait;
use oficina_domain::{Client, Material, NewClient, NewMaterial, Page, Result};

/// Trait for client persistence and retrieval
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Insert a new client and return the stored row
    async fn create(&self, client: NewClient, created_at: i64) -> Result<Client>;

    /// Replace the mutable fields of an existing client
    async fn update(&self, id: i64, client: NewClient) -> Result<Client>;

    /// Get a client by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Client>>;

    /// Get a client by canonical tax id
    async fn get_by_tax_id(&self, tax_id: &str) -> Result<Option<Client>>;

    /// Page through clients, optionally filtered by a contains-search over
    /// name, tax id, email and phone
    async fn list(&self, search: Option<&str>, page: u32) -> Result<Page<Client>>;

    /// First `limit` clients matching `term` on name or tax id
    async fn quick_search(&self, term: &str, limit: u32) -> Result<Vec<Client>>;

    /// Number of quotes referencing this client
    async fn quote_count(&self, id: i64) -> Result<u64>;

    /// Delete a client by ID
    async fn delete(&self, id: i64) -> Result<()>;

    /// Total number of clients
    async fn count(&self) -> Result<u64>;
}

/// Trait for material persistence and retrieval
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    /// Insert a new material and return the stored row
    async fn create(&self, material: NewMaterial, created_at: i64) -> Result<Material>;

    /// Replace the mutable fields of an existing material
    async fn update(&self, id: i64, material: NewMaterial) -> Result<Material>;

    /// Get a material by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Material>>;

    /// Get a material by its unique part code
    async fn get_by_code(&self, code: &str) -> Result<Option<Material>>;

    /// Page through materials, optionally filtered by a contains-search over
    /// name, code and description
    async fn list(&self, search: Option<&str>, page: u32) -> Result<Page<Material>>;

    /// First `limit` materials matching `term` on name or code
    async fn quick_search(&self, term: &str, limit: u32) -> Result<Vec<Material>>;

    /// Number of quote line items referencing this material
    async fn usage_count(&self, id: i64) -> Result<u64>;

    /// Set the absolute stock quantity
    async fn set_stock(&self, id: i64, stock_qty: i64) -> Result<Material>;

    /// Delete a material by ID
    async fn delete(&self, id: i64) -> Result<()>;

    /// Total number of materials
    async fn count(&self) -> Result<u64>;

    /// Number of materials at or below their minimum stock
    async fn low_stock_count(&self) -> Result<u64>;
}
