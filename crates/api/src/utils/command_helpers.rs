//! Command execution helpers
//!
//! Reduce boilerplate in the command façade: every command runs through
//! [`execute_logged`] so durations and error classes land in the logs
//! without each wrapper repeating the plumbing.

use std::future::Future;
use std::time::Instant;

use oficina_domain::Result;
use tracing::warn;

use crate::utils::logging::{error_label, log_command_execution};

/// Run a command future and log its outcome.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn get_client(context: &AppContext, id: i64) -> Result<Client> {
///     execute_logged("clients::get_client", context.catalog.get_client(id)).await
/// }
/// ```
pub async fn execute_logged<T, Fut>(command: &str, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();
    let result = fut.await;
    log_command_execution(command, start.elapsed(), result.is_ok());

    if let Err(error) = &result {
        warn!(command, error = %error, error_type = error_label(error), "command_error");
    }
    result
}

#[cfg(test)]
mod tests {
    use oficina_domain::OficinaError;

    use super::*;

    #[tokio::test]
    async fn passes_the_result_through() {
        let ok = execute_logged("tests::ok", async { Ok(7_i64) }).await;
        assert_eq!(ok.expect("ok result"), 7);

        let err: Result<i64> = execute_logged("tests::err", async {
            Err(OficinaError::NotFound("client 1 not found".to_string()))
        })
        .await;
        assert!(matches!(err, Err(OficinaError::NotFound(_))));
    }
}
