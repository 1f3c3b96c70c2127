//! Invoices, stored on the platform as receivables of type `invoice`.

use serde_json::Value;

use super::{ListParams, ResourceHook, Toasts};
use crate::ports::ResourceRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceListParams {
    pub page: ListParams,
    pub status: Option<String>,
}

pub struct InvoiceHooks {
    hook: ResourceHook,
}

impl InvoiceHooks {
    pub fn new(hook: ResourceHook) -> Self {
        Self { hook }
    }

    pub fn loading(&self) -> bool {
        self.hook.loading()
    }

    /// Creates a receivable, forcing its type to `invoice`.
    pub async fn create(&self, mut invoice: Value) -> Option<Value> {
        if let Some(fields) = invoice.as_object_mut() {
            fields.insert("type".to_string(), Value::from("invoice"));
        }
        self.hook
            .call(
                ResourceRequest::post("receivables", invoice),
                Toasts::failure("Failed to create invoice")
                    .with_success("Invoice created successfully"),
            )
            .await
    }

    pub async fn get(&self, id: &str) -> Option<Value> {
        self.hook
            .call(
                ResourceRequest::get(format!("receivables/{id}")),
                Toasts::failure("Failed to fetch invoice"),
            )
            .await
    }

    pub async fn update(&self, id: &str, changes: Value) -> Option<Value> {
        self.hook
            .call(
                ResourceRequest::patch(format!("receivables/{id}"), changes),
                Toasts::failure("Failed to update invoice")
                    .with_success("Invoice updated successfully"),
            )
            .await
    }

    pub async fn list(&self, params: &InvoiceListParams) -> Vec<Value> {
        let request = params
            .page
            .apply(ResourceRequest::get("receivables"))
            .with_query("status", params.status.as_deref());
        self.hook
            .call_list(request, Toasts::failure("Failed to fetch invoices"))
            .await
    }

    pub async fn issue(&self, id: &str) -> bool {
        self.action(id, "issue", "Invoice issued successfully", "Failed to issue invoice")
            .await
    }

    pub async fn cancel(&self, id: &str) -> bool {
        self.action(id, "cancel", "Invoice cancelled successfully", "Failed to cancel invoice")
            .await
    }

    pub async fn mark_as_paid(&self, id: &str) -> bool {
        self.action(
            id,
            "mark_as_paid",
            "Invoice marked as paid",
            "Failed to mark invoice as paid",
        )
        .await
    }

    async fn action(
        &self,
        id: &str,
        action: &str,
        success: &'static str,
        failure: &'static str,
    ) -> bool {
        self.hook
            .call_action(
                ResourceRequest::post(format!("receivables/{id}/{action}"), Value::Null),
                Toasts::failure(failure).with_success(success),
            )
            .await
    }
}
