//! Bank account connections.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{to_body, ResourceHook, Toasts};
use crate::ports::ResourceRequest;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectBankAccount {
    pub account_holder_name: String,
    pub iban: String,
    pub bic: String,
}

#[derive(Debug, Deserialize)]
struct Balance {
    available_balance: f64,
}

pub struct BankingHooks {
    hook: ResourceHook,
}

impl BankingHooks {
    pub fn new(hook: ResourceHook) -> Self {
        Self { hook }
    }

    pub fn loading(&self) -> bool {
        self.hook.loading()
    }

    pub async fn connect(&self, account: &ConnectBankAccount) -> Option<Value> {
        self.hook
            .call(
                ResourceRequest::post("bank_accounts", to_body(account)),
                Toasts::failure("Failed to connect bank account")
                    .with_success("Bank account connected successfully"),
            )
            .await
    }

    pub async fn list(&self) -> Vec<Value> {
        self.hook
            .call_list(
                ResourceRequest::get("bank_accounts"),
                Toasts::failure("Failed to fetch bank accounts"),
            )
            .await
    }

    /// Confirms the micro-deposit amounts sent to the account.
    pub async fn verify(&self, id: &str, amounts: &[i64]) -> bool {
        self.hook
            .call_action(
                ResourceRequest::post(
                    format!("bank_accounts/{id}/verify"),
                    json!({ "amounts": amounts }),
                ),
                Toasts::failure("Failed to verify bank account")
                    .with_success("Bank account verified successfully"),
            )
            .await
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.hook
            .call_action(
                ResourceRequest::delete(format!("bank_accounts/{id}")),
                Toasts::failure("Failed to remove bank account")
                    .with_success("Bank account removed successfully"),
            )
            .await
    }

    pub async fn transactions(&self, id: &str) -> Vec<Value> {
        self.hook
            .call_list(
                ResourceRequest::get(format!("bank_accounts/{id}/transactions")),
                Toasts::failure("Failed to fetch transactions"),
            )
            .await
    }

    pub async fn balance(&self, id: &str) -> Option<f64> {
        self.hook
            .call::<Balance>(
                ResourceRequest::get(format!("bank_accounts/{id}/balance")),
                Toasts::failure("Failed to fetch balance"),
            )
            .await
            .map(|b| b.available_balance)
    }
}
