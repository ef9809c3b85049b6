pub mod api;
pub mod policy;
pub mod service;
pub mod templates;

use std::sync::Arc;

use axum::Router;
use netblocker_core::Module;
use netblocker_upstream::FirewallClient;

use service::PolicyService;

pub use service::{ActionSuccess, DetailError, PolicyDetail, PolicyList, Redirect};
pub use templates::{SIGNATURES, detect_templates};

/// The firewall module: managed-policy listing, detail and deletion.
pub struct FirewallModule {
    service: Arc<PolicyService>,
}

impl FirewallModule {
    pub fn new(client: FirewallClient) -> Self {
        Self {
            service: Arc::new(PolicyService::new(client)),
        }
    }
}

impl Module for FirewallModule {
    fn name(&self) -> &str {
        "firewall"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.service))
    }
}
