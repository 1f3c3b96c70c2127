//! crates/wonderpay_core/src/tenant.rs
//!
//! Finds the entity the console acts as, creating it when the platform has none.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::OrganizationProfile;
use crate::error::{CoreError, CoreResult};
use crate::ports::EntityGateway;

/// Resolves the single entity id by listing first and creating only on an
/// empty listing.
///
/// List-then-create is not atomic: two resolvers racing on an empty platform
/// can both create. Callers must treat creation as at-least-once.
pub struct TenantResolver {
    gateway: Arc<dyn EntityGateway>,
    profile: OrganizationProfile,
}

impl TenantResolver {
    pub fn new(gateway: Arc<dyn EntityGateway>, profile: OrganizationProfile) -> Self {
        Self { gateway, profile }
    }

    pub fn profile(&self) -> &OrganizationProfile {
        &self.profile
    }

    pub async fn resolve_tenant(&self, token: &str) -> CoreResult<String> {
        let existing = self.gateway.list_entities(token).await.map_err(|e| {
            warn!(error = %e, "Failed to list entities");
            CoreError::tenant(e)
        })?;

        if let Some(first) = existing.into_iter().next() {
            info!(entity_id = %first.id, "Using existing entity");
            return Ok(first.id);
        }

        let created = self
            .gateway
            .create_entity(token, &self.profile.to_request())
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create entity");
                CoreError::tenant(e)
            })?;

        if created.id.is_empty() {
            return Err(CoreError::Tenant("created entity has no id".to_string()));
        }

        info!(entity_id = %created.id, legal_name = %self.profile.legal_name, "Created entity");
        Ok(created.id)
    }
}
