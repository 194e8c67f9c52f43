//! Serve command: wires plugins together and runs the API server

use clap::Args;
use std::future::IntoFuture;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use utoipa_swagger_ui::SwaggerUi;

use frostline_content::ContentPlugin;
use frostline_core::plugin::PluginManager;
use frostline_core::DatabaseConfig;
use frostline_import::ImportPlugin;
use frostline_search::SearchPlugin;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "FROSTLINE_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(long, env = "FROSTLINE_DATABASE_URL")]
    pub database_url: String,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        let config = DatabaseConfig::new(&self.database_url);

        debug!("Initializing database connection");
        let db = frostline_database::establish_connection(&config).await?;

        let mut plugin_manager = PluginManager::new();

        // The database connection is the root service every plugin builds on
        plugin_manager.service_context().register_service(db);

        // Registration order matters: content provides the store the other
        // plugins depend on
        plugin_manager.register_plugin(Box::new(ContentPlugin::new()));
        plugin_manager.register_plugin(Box::new(ImportPlugin::new()));
        plugin_manager.register_plugin(Box::new(SearchPlugin::new()));

        plugin_manager.initialize_plugins().await?;

        let api_doc = plugin_manager
            .get_unified_openapi()
            .map_err(|e| anyhow::anyhow!("Failed to build unified OpenAPI schema: {}", e))?;

        let app = plugin_manager
            .build_application()
            .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let listener = TcpListener::bind(&self.address).await?;
        info!("Frostline API server listening on {}", self.address);

        axum::serve(listener, app).into_future().await?;
        info!("Frostline API server exited");
        Ok(())
    }
}
