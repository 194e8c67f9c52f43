//! Search plugin for the Frostline plugin system

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use frostline_core::plugin::{
    FrostlinePlugin, PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext,
};
use utoipa::{openapi::OpenApi, OpenApi as UtoipaOpenApi};

use frostline_content::ContentStore;

use crate::{handlers, services::SearchService};

/// Search plugin exposing the site-wide search endpoint
pub struct SearchPlugin;

impl SearchPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SearchPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl FrostlinePlugin for SearchPlugin {
    fn name(&self) -> &'static str {
        "search"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let store = context.require_service::<dyn ContentStore>();

            let service = Arc::new(SearchService::new(store));
            context.register_service(service);

            tracing::debug!("Search plugin services registered");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let search_service = context
            .get_service::<SearchService>()
            .expect("SearchService must be registered before configuring routes");

        let app_state = Arc::new(handlers::types::AppState { search_service });

        let routes = handlers::configure_routes().with_state(app_state);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(<handlers::SearchApiDoc as UtoipaOpenApi>::openapi())
    }
}
