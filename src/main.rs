//! `mockhttp` - serve the greeting fixture.
//!
//! Configuration comes from `MOCKHTTP_CONFIG`, `MOCKHTTP_ADDR` and
//! `MOCKHTTP_PROFILE`; logging from `RUST_LOG`.

use log::{error, info};

use mockhttp_rs::{MockConfig, MockServer};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), mockhttp_rs::ServerError> {
    let config = MockConfig::from_env()?;
    info!("Launching mock server on http://{addr}", addr = config.server.addr);

    let server = MockServer::new(config).await?;
    server.run().await
}
