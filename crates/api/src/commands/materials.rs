//! Material catalog commands

use oficina_domain::{Material, NewMaterial, Page, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;

/// Register a material. The part code must be unique.
pub async fn create_material(context: &AppContext, input: NewMaterial) -> Result<Material> {
    execute_logged("materials::create_material", context.catalog.create_material(input)).await
}

/// Update a material's catalog data.
pub async fn update_material(
    context: &AppContext,
    id: i64,
    input: NewMaterial,
) -> Result<Material> {
    execute_logged("materials::update_material", context.catalog.update_material(id, input)).await
}

/// Get a material by ID.
pub async fn get_material(context: &AppContext, id: i64) -> Result<Material> {
    execute_logged("materials::get_material", context.catalog.get_material(id)).await
}

/// Page through materials, optionally narrowed by a contains-search over
/// name, code and description.
pub async fn list_materials(
    context: &AppContext,
    search: Option<&str>,
    page: u32,
) -> Result<Page<Material>> {
    execute_logged("materials::list_materials", context.catalog.list_materials(search, page)).await
}

/// Autocomplete-style material search; short terms return nothing.
pub async fn search_materials(context: &AppContext, term: &str) -> Result<Vec<Material>> {
    execute_logged("materials::search_materials", context.catalog.quick_search_materials(term))
        .await
}

/// Set the absolute stock quantity of a material.
pub async fn adjust_stock(context: &AppContext, id: i64, stock_qty: i64) -> Result<Material> {
    execute_logged("materials::adjust_stock", context.catalog.adjust_stock(id, stock_qty)).await
}

/// Delete a material. Blocked while any quote line item references it.
pub async fn delete_material(context: &AppContext, id: i64) -> Result<()> {
    execute_logged("materials::delete_material", context.catalog.delete_material(id)).await
}
