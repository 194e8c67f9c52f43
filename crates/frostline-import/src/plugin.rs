//! Import plugin for the Frostline plugin system

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use frostline_core::plugin::{
    FrostlinePlugin, PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext,
};
use utoipa::{openapi::OpenApi, OpenApi as UtoipaOpenApi};

use frostline_content::ContentStore;

use crate::{handlers, services::ImportOrchestrator};

/// Import plugin exposing the WordPress export upload endpoint
pub struct ImportPlugin;

impl ImportPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImportPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl FrostlinePlugin for ImportPlugin {
    fn name(&self) -> &'static str {
        "import"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let store = context.require_service::<dyn ContentStore>();

            let orchestrator = Arc::new(ImportOrchestrator::new(store));
            context.register_service(orchestrator);

            tracing::debug!("Import plugin services registered");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let import_orchestrator = context
            .get_service::<ImportOrchestrator>()
            .expect("ImportOrchestrator must be registered before configuring routes");

        let app_state = Arc::new(handlers::types::AppState {
            import_orchestrator,
        });

        let routes = handlers::configure_routes().with_state(app_state);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<handlers::ImportApiDoc as UtoipaOpenApi>::openapi())
    }
}
