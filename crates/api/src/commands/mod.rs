//! Command façade - the operations a user interface invokes
//!
//! Every command delegates to a core service and logs its outcome through
//! [`crate::utils::command_helpers::execute_logged`]. Command identifiers
//! follow the `module::function` convention.

mod clients;
mod health;
mod invoices;
mod materials;
mod orders;
mod quotes;
mod reports;
mod users;

pub use clients::*;
pub use health::*;
pub use invoices::*;
pub use materials::*;
pub use orders::*;
pub use quotes::*;
pub use reports::*;
pub use users::*;
