//! Backend entry-point: loads settings, starts logging and the external
//! clients, then serves HTTP until shutdown.

use mockable::DefaultEnv;
use tracing::{error, info};

use minimus::context::AppContext;
use minimus::logging;
use minimus::server::{ServerConfig, create_server};
use minimus::settings::Settings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::from_env(&DefaultEnv::new())
        .map_err(|e| std::io::Error::other(format!("invalid settings: {e}")))?;
    let _log_guard = logging::init(&settings.log)
        .map_err(|e| std::io::Error::other(format!("logging init failed: {e}")))?;
    info!(environment = %settings.environment, "Minimus API is starting...");

    let context = AppContext::from_settings(&settings);
    if let Err(e) = context.init().await {
        error!(error = %e, "startup aborted");
        context.shutdown().await;
        return Err(std::io::Error::other(e));
    }

    let result = match create_server(&context, ServerConfig::from_settings(&settings)) {
        Ok(server) => {
            info!(bind_addr = %settings.bind_addr, "Minimus API is ready");
            server.await
        }
        Err(e) => Err(e),
    };

    info!("Minimus API is shutting down...");
    context.shutdown().await;
    result
}
