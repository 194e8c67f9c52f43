//! Content store plugin for the Frostline plugin system

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use frostline_core::plugin::{
    FrostlinePlugin, PluginError, ServiceRegistrationContext,
};

use crate::{ContentStore, SeaOrmContentStore};

/// Plugin providing the Content Store capability to other plugins
pub struct ContentPlugin;

impl ContentPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ContentPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl FrostlinePlugin for ContentPlugin {
    fn name(&self) -> &'static str {
        "content"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();

            let store: Arc<dyn ContentStore> = Arc::new(SeaOrmContentStore::new(db));
            context.register_service(store);

            tracing::debug!("Content store registered");
            Ok(())
        })
    }
}
