//! Catalog service - client and material registry rules

use std::sync::Arc;

use chrono::Utc;
use oficina_domain::constants::{QUICK_SEARCH_LIMIT, QUICK_SEARCH_MIN_CHARS};
use oficina_domain::utils::tax_id;
use oficina_domain::{
    Client, Material, NewClient, NewMaterial, OficinaError, Page, Result,
};

use super::ports::{ClientRepository, MaterialRepository};

/// Catalog service
pub struct CatalogService {
    clients: Arc<dyn ClientRepository>,
    materials: Arc<dyn MaterialRepository>,
}

impl CatalogService {
    /// Create a new catalog service
    pub fn new(clients: Arc<dyn ClientRepository>, materials: Arc<dyn MaterialRepository>) -> Self {
        Self { clients, materials }
    }

    // ------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------

    /// Register a client. The tax id is canonicalized to digits and must be
    /// unique.
    pub async fn create_client(&self, client: NewClient) -> Result<Client> {
        let client = normalize_client(client)?;
        if self.clients.get_by_tax_id(&client.tax_id).await?.is_some() {
            return Err(OficinaError::Conflict(format!(
                "tax id {} is already registered",
                tax_id::format_display(&client.tax_id)
            )));
        }
        self.clients.create(client, Utc::now().timestamp()).await
    }

    /// Update a client's registration data.
    pub async fn update_client(&self, id: i64, client: NewClient) -> Result<Client> {
        self.get_client(id).await?;
        let client = normalize_client(client)?;
        if let Some(existing) = self.clients.get_by_tax_id(&client.tax_id).await? {
            if existing.id != id {
                return Err(OficinaError::Conflict(format!(
                    "tax id {} is already registered",
                    tax_id::format_display(&client.tax_id)
                )));
            }
        }
        self.clients.update(id, client).await
    }

    /// Get a client by ID.
    pub async fn get_client(&self, id: i64) -> Result<Client> {
        self.clients
            .get_by_id(id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("client {id} not found")))
    }

    /// Page through clients.
    pub async fn list_clients(&self, search: Option<&str>, page: u32) -> Result<Page<Client>> {
        self.clients.list(clean_search(search), page).await
    }

    /// Autocomplete-style search; short terms return nothing.
    pub async fn quick_search_clients(&self, term: &str) -> Result<Vec<Client>> {
        let term = term.trim();
        if term.chars().count() < QUICK_SEARCH_MIN_CHARS {
            return Ok(Vec::new());
        }
        self.clients.quick_search(term, QUICK_SEARCH_LIMIT).await
    }

    /// Delete a client. Blocked while any quote references it.
    pub async fn delete_client(&self, id: i64) -> Result<()> {
        let client = self.get_client(id).await?;
        let quotes = self.clients.quote_count(id).await?;
        if quotes > 0 {
            return Err(OficinaError::Referenced(format!(
                "client {} has {quotes} quote(s) and cannot be deleted",
                client.name
            )));
        }
        self.clients.delete(id).await
    }

    // ------------------------------------------------------------------
    // Materials
    // ------------------------------------------------------------------

    /// Register a material. The part code must be unique.
    pub async fn create_material(&self, material: NewMaterial) -> Result<Material> {
        let material = normalize_material(material)?;
        if self.materials.get_by_code(&material.code).await?.is_some() {
            return Err(OficinaError::Conflict(format!(
                "material code {} is already registered",
                material.code
            )));
        }
        self.materials.create(material, Utc::now().timestamp()).await
    }

    /// Update a material's catalog data.
    pub async fn update_material(&self, id: i64, material: NewMaterial) -> Result<Material> {
        self.get_material(id).await?;
        let material = normalize_material(material)?;
        if let Some(existing) = self.materials.get_by_code(&material.code).await? {
            if existing.id != id {
                return Err(OficinaError::Conflict(format!(
                    "material code {} is already registered",
                    material.code
                )));
            }
        }
        self.materials.update(id, material).await
    }

    /// Get a material by ID.
    pub async fn get_material(&self, id: i64) -> Result<Material> {
        self.materials
            .get_by_id(id)
            .await?
            .ok_or_else(|| OficinaError::NotFound(format!("material {id} not found")))
    }

    /// Page through materials.
    pub async fn list_materials(&self, search: Option<&str>, page: u32) -> Result<Page<Material>> {
        self.materials.list(clean_search(search), page).await
    }

    /// Autocomplete-style search; short terms return nothing.
    pub async fn quick_search_materials(&self, term: &str) -> Result<Vec<Material>> {
        let term = term.trim();
        if term.chars().count() < QUICK_SEARCH_MIN_CHARS {
            return Ok(Vec::new());
        }
        self.materials.quick_search(term, QUICK_SEARCH_LIMIT).await
    }

    /// Set the absolute stock quantity of a material.
    pub async fn adjust_stock(&self, id: i64, stock_qty: i64) -> Result<Material> {
        if stock_qty < 0 {
            return Err(OficinaError::Validation("stock quantity cannot be negative".to_string()));
        }
        self.get_material(id).await?;
        self.materials.set_stock(id, stock_qty).await
    }

    /// Delete a material. Blocked while any quote line item references it.
    pub async fn delete_material(&self, id: i64) -> Result<()> {
        let material = self.get_material(id).await?;
        let uses = self.materials.usage_count(id).await?;
        if uses > 0 {
            return Err(OficinaError::Referenced(format!(
                "material {} is used by {uses} quote item(s) and cannot be deleted",
                material.code
            )));
        }
        self.materials.delete(id).await
    }
}

/// Trims and validates client input; the tax id field is replaced with its
/// canonical digits-only form.
fn normalize_client(mut client: NewClient) -> Result<NewClient> {
    client.name = client.name.trim().to_string();
    if client.name.is_empty() {
        return Err(OficinaError::Validation("client name is required".to_string()));
    }
    let canonical = tax_id::canonicalize(&client.tax_id);
    if canonical.is_empty() {
        return Err(OficinaError::Validation("client tax id is required".to_string()));
    }
    client.tax_id = canonical;
    client.phone = clean_opt(client.phone);
    client.email = clean_opt(client.email);
    client.address = clean_opt(client.address);
    client.city = clean_opt(client.city);
    client.state = clean_opt(client.state);
    client.postal_code = clean_opt(client.postal_code);
    Ok(client)
}

/// Trims and validates material input.
fn normalize_material(mut material: NewMaterial) -> Result<NewMaterial> {
    material.name = material.name.trim().to_string();
    if material.name.is_empty() {
        return Err(OficinaError::Validation("material name is required".to_string()));
    }
    material.code = material.code.trim().to_string();
    if material.code.is_empty() {
        return Err(OficinaError::Validation("material code is required".to_string()));
    }
    if material.unit_price.is_sign_negative() {
        return Err(OficinaError::Validation("material price cannot be negative".to_string()));
    }
    if material.stock_qty < 0 || material.min_stock_qty < 0 {
        return Err(OficinaError::Validation("stock quantities cannot be negative".to_string()));
    }
    material.description = clean_opt(material.description);
    material.unit = clean_opt(material.unit);
    Ok(material)
}

fn clean_opt(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn clean_search(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}
