//! Counterparts (vendors and customers).

use serde_json::Value;

use super::{ListParams, ResourceHook, Toasts};
use crate::ports::ResourceRequest;

pub struct CounterpartHooks {
    hook: ResourceHook,
}

impl CounterpartHooks {
    pub fn new(hook: ResourceHook) -> Self {
        Self { hook }
    }

    pub fn loading(&self) -> bool {
        self.hook.loading()
    }

    pub async fn list(&self, params: ListParams) -> Vec<Value> {
        self.hook
            .call_list(
                params.apply(ResourceRequest::get("counterparts")),
                Toasts::failure("Failed to fetch counterparts"),
            )
            .await
    }

    pub async fn create(&self, counterpart: Value) -> Option<Value> {
        self.hook
            .call(
                ResourceRequest::post("counterparts", counterpart),
                Toasts::failure("Failed to create counterpart")
                    .with_success("Counterpart created successfully"),
            )
            .await
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.hook
            .call_action(
                ResourceRequest::delete(format!("counterparts/{id}")),
                Toasts::failure("Failed to remove counterpart")
                    .with_success("Counterpart removed successfully"),
            )
            .await
    }
}
