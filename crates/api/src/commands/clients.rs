//! Client registry commands

use oficina_domain::{Client, NewClient, Page, Result};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_logged;

/// Register a client. The tax id is canonicalized and must be unique.
pub async fn create_client(context: &AppContext, input: NewClient) -> Result<Client> {
    execute_logged("clients::create_client", context.catalog.create_client(input)).await
}

/// Update a client's registry data.
pub async fn update_client(context: &AppContext, id: i64, input: NewClient) -> Result<Client> {
    execute_logged("clients::update_client", context.catalog.update_client(id, input)).await
}

/// Get a client by ID.
pub async fn get_client(context: &AppContext, id: i64) -> Result<Client> {
    execute_logged("clients::get_client", context.catalog.get_client(id)).await
}

/// Page through clients, optionally narrowed by a contains-search over
/// name, tax id, email and phone.
pub async fn list_clients(
    context: &AppContext,
    search: Option<&str>,
    page: u32,
) -> Result<Page<Client>> {
    execute_logged("clients::list_clients", context.catalog.list_clients(search, page)).await
}

/// Autocomplete-style client search; short terms return nothing.
pub async fn search_clients(context: &AppContext, term: &str) -> Result<Vec<Client>> {
    execute_logged("clients::search_clients", context.catalog.quick_search_clients(term)).await
}

/// Delete a client. Blocked while any quote references the client.
pub async fn delete_client(context: &AppContext, id: i64) -> Result<()> {
    execute_logged("clients::delete_client", context.catalog.delete_client(id)).await
}
