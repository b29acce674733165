use std::time::Duration;

use oficina_domain::OficinaError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"quotes::create_quote"`).
/// * `elapsed` - Duration the command execution took.
/// * `success` - Whether the command completed successfully.
///
/// The helper keeps the command wrappers concise and the log shape uniform.
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert an `OficinaError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &OficinaError) -> &'static str {
    match error {
        OficinaError::Database(_) => "database",
        OficinaError::Config(_) => "config",
        OficinaError::Validation(_) => "validation",
        OficinaError::Conflict(_) => "conflict",
        OficinaError::NotFound(_) => "not_found",
        OficinaError::InvalidTransition(_) => "invalid_transition",
        OficinaError::Referenced(_) => "referenced",
        OficinaError::Rendering(_) => "rendering",
        OficinaError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_labels_are_stable() {
        assert_eq!(error_label(&OficinaError::Database("x".into())), "database");
        assert_eq!(error_label(&OficinaError::Referenced("x".into())), "referenced");
        assert_eq!(error_label(&OficinaError::InvalidTransition("x".into())), "invalid_transition");
        assert_eq!(error_label(&OficinaError::Rendering("x".into())), "rendering");
    }
}
