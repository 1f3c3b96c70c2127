//! services/console/src/web/resources.rs
//!
//! JSON routes over the resource hooks. A hook that resolves to its empty
//! sentinel has already raised a notification; the handler only picks a status.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wonderpay_core::hooks::{
    ConnectBankAccount, DashboardMetrics, EntityStatus, InvoiceListParams, ListParams,
};
use wonderpay_core::Entity;

use crate::web::state::AppState;

type HandlerError = (StatusCode, String);

//=========================================================================================
// Query and Payload Structs
//=========================================================================================

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub status: Option<String>,
}

impl PageQuery {
    fn list_params(&self) -> ListParams {
        ListParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub amounts: Vec<i64>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: EntityStatus,
}

#[derive(Serialize)]
pub struct BalanceView {
    pub available_balance: f64,
}

#[derive(Serialize)]
pub struct ValidationView {
    pub valid: bool,
}

fn failed(state: &AppState, what: &str) -> HandlerError {
    if state.session.client().is_none() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Monite SDK not initialized".to_string(),
        )
    } else {
        (StatusCode::BAD_GATEWAY, format!("Failed to {what}"))
    }
}

fn found<T>(state: &AppState, value: Option<T>, what: &str) -> Result<Json<T>, HandlerError> {
    value.map(Json).ok_or_else(|| failed(state, what))
}

fn done(state: &AppState, ok: bool, what: &str) -> Result<StatusCode, HandlerError> {
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(failed(state, what))
    }
}

//=========================================================================================
// Banking
//=========================================================================================

pub async fn list_bank_accounts(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    Json(state.banking.list().await)
}

pub async fn connect_bank_account(
    State(state): State<Arc<AppState>>,
    Json(account): Json<ConnectBankAccount>,
) -> Result<(StatusCode, Json<Value>), HandlerError> {
    let created = state.banking.connect(&account).await;
    let Json(created) = found(&state, created, "connect bank account")?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn verify_bank_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<VerifyRequest>,
) -> Result<StatusCode, HandlerError> {
    let ok = state.banking.verify(&id, &req.amounts).await;
    done(&state, ok, "verify bank account")
}

pub async fn remove_bank_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let ok = state.banking.remove(&id).await;
    done(&state, ok, "remove bank account")
}

pub async fn bank_transactions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<Vec<Value>> {
    Json(state.banking.transactions(&id).await)
}

pub async fn bank_balance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BalanceView>, HandlerError> {
    let balance = state.banking.balance(&id).await;
    let Json(available_balance) = found(&state, balance, "fetch balance")?;
    Ok(Json(BalanceView { available_balance }))
}

//=========================================================================================
// Invoices
//=========================================================================================

pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Json<Vec<Value>> {
    let params = InvoiceListParams {
        page: query.list_params(),
        status: query.status.clone(),
    };
    Json(state.invoices.list(&params).await)
}

pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Json(invoice): Json<Value>,
) -> Result<(StatusCode, Json<Value>), HandlerError> {
    let created = state.invoices.create(invoice).await;
    let Json(created) = found(&state, created, "create invoice")?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, HandlerError> {
    let invoice = state.invoices.get(&id).await;
    found(&state, invoice, "fetch invoice")
}

pub async fn update_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(changes): Json<Value>,
) -> Result<Json<Value>, HandlerError> {
    let invoice = state.invoices.update(&id, changes).await;
    found(&state, invoice, "update invoice")
}

/// `issue`, `cancel` or `mark-as-paid`.
pub async fn invoice_action(
    State(state): State<Arc<AppState>>,
    Path((id, action)): Path<(String, String)>,
) -> Result<StatusCode, HandlerError> {
    let ok = match action.as_str() {
        "issue" => state.invoices.issue(&id).await,
        "cancel" => state.invoices.cancel(&id).await,
        "mark-as-paid" => state.invoices.mark_as_paid(&id).await,
        other => {
            return Err((
                StatusCode::NOT_FOUND,
                format!("Unknown invoice action '{other}'"),
            ))
        }
    };
    done(&state, ok, &format!("{action} invoice"))
}

//=========================================================================================
// Counterparts
//=========================================================================================

pub async fn list_counterparts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Json<Vec<Value>> {
    Json(state.counterparts.list(query.list_params()).await)
}

pub async fn create_counterpart(
    State(state): State<Arc<AppState>>,
    Json(counterpart): Json<Value>,
) -> Result<(StatusCode, Json<Value>), HandlerError> {
    let created = state.counterparts.create(counterpart).await;
    let Json(created) = found(&state, created, "create counterpart")?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn remove_counterpart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let ok = state.counterparts.remove(&id).await;
    done(&state, ok, "remove counterpart")
}

//=========================================================================================
// Entities
//=========================================================================================

pub async fn list_entities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Json<Vec<Entity>> {
    Json(state.entities.list(query.list_params()).await)
}

pub async fn create_entity(
    State(state): State<Arc<AppState>>,
    Json(entity): Json<Value>,
) -> Result<(StatusCode, Json<Entity>), HandlerError> {
    let created = state.entities.create(entity).await;
    let Json(created) = found(&state, created, "create entity")?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn current_entity(State(state): State<Arc<AppState>>) -> Result<Json<Entity>, HandlerError> {
    let entity = state.entities.get().await;
    found(&state, entity, "fetch entity")
}

pub async fn update_entity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(changes): Json<Value>,
) -> Result<Json<Entity>, HandlerError> {
    let entity = state.entities.update(&id, changes).await;
    found(&state, entity, "update entity")
}

pub async fn remove_entity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let ok = state.entities.remove(&id).await;
    done(&state, ok, "delete entity")
}

pub async fn update_entity_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Entity>, HandlerError> {
    let entity = state.entities.update_status(&id, req.status).await;
    found(&state, entity, "update entity status")
}

pub async fn validate_entity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<ValidationView> {
    Json(ValidationView {
        valid: state.entities.validate(&id).await,
    })
}

//=========================================================================================
// Dashboard
//=========================================================================================

pub async fn dashboard_metrics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardMetrics>, HandlerError> {
    let metrics = state.dashboard.fetch_metrics().await;
    found(&state, metrics, "fetch dashboard metrics")
}
