//! Entity management beyond the bootstrap resolution.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ListParams, ResourceHook, Toasts};
use crate::domain::{Entity, Notification, Page};
use crate::ports::ResourceRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Active,
    Inactive,
}

pub struct EntityHooks {
    hook: ResourceHook,
}

impl EntityHooks {
    pub fn new(hook: ResourceHook) -> Self {
        Self { hook }
    }

    pub fn loading(&self) -> bool {
        self.hook.loading()
    }

    pub async fn create(&self, entity: Value) -> Option<Entity> {
        self.hook
            .call(
                ResourceRequest::post("entities", entity),
                Toasts::failure("Failed to create entity")
                    .with_success("Entity created successfully"),
            )
            .await
    }

    /// Details of the entity the session is bound to.
    pub async fn get(&self) -> Option<Entity> {
        let Some(entity_id) = self.hook.bound_entity_id() else {
            self.hook
                .notify(Notification::error("Monite SDK not initialized"));
            return None;
        };
        self.hook
            .call(
                ResourceRequest::get(format!("entities/{entity_id}")),
                Toasts::failure("Failed to fetch entity details"),
            )
            .await
    }

    pub async fn update(&self, id: &str, changes: Value) -> Option<Entity> {
        self.hook
            .call(
                ResourceRequest::patch(format!("entities/{id}"), changes),
                Toasts::failure("Failed to update entity settings")
                    .with_success("Entity settings updated successfully"),
            )
            .await
    }

    pub async fn list(&self, params: ListParams) -> Vec<Entity> {
        self.hook
            .call::<Page<Entity>>(
                params.apply(ResourceRequest::get("entities")),
                Toasts::failure("Failed to fetch entities"),
            )
            .await
            .map(|page| page.data)
            .unwrap_or_default()
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.hook
            .call_action(
                ResourceRequest::delete(format!("entities/{id}")),
                Toasts::failure("Failed to remove entity")
                    .with_success("Entity removed successfully"),
            )
            .await
    }

    pub async fn update_status(&self, id: &str, status: EntityStatus) -> Option<Entity> {
        self.hook
            .call(
                ResourceRequest::patch(format!("entities/{id}"), json!({ "status": status })),
                Toasts::failure("Failed to update entity status")
                    .with_success("Entity status updated successfully"),
            )
            .await
    }

    /// True iff the platform returns the entity under the same id.
    pub async fn validate(&self, id: &str) -> bool {
        self.hook
            .call::<Entity>(
                ResourceRequest::get(format!("entities/{id}")),
                Toasts::silent(),
            )
            .await
            .is_some_and(|entity| entity.id == id)
    }
}
