//! Oficina status binary
//!
//! Opens the configured database, runs the health checks and prints the
//! dashboard figures as JSON. Useful as a smoke test for a deployment and
//! as the wiring example for embedding [`AppContext`].

use anyhow::Context as _;
use oficina_api::{commands, AppContext};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let context = AppContext::new().context("failed to initialize the application")?;

    let health = commands::get_app_health(&context).await;
    let dashboard =
        commands::get_dashboard(&context).await.context("failed to read dashboard figures")?;

    let status = serde_json::json!({
        "database": context.config.database.path,
        "health": health,
        "dashboard": dashboard,
    });

    // The report is this binary's output, not a log line.
    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&status)?);
    }

    Ok(())
}
