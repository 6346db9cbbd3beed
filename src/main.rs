//! The `webroot` binary: serve a directory over HTTP.

use tracing::info;
use tracing_subscriber::EnvFilter;

use webroot::config::ServerConfig;
use webroot::server::Server;
use webroot::service::FileServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env();
    let service = FileServer::new(&config.root)?;
    let server = Server::bind(&config.addr).await?;

    info!(
        address = %server.local_addr(),
        root = %service.root().display(),
        "serving"
    );

    let serve = server.run(move |request, peer| {
        let service = service.clone();
        async move { service.handle(request, peer).await }
    });

    tokio::select! {
        result = serve => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    Ok(())
}
