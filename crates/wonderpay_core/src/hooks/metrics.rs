//! Accounts payable / receivable summary and recent cash flow for the dashboard.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::ResourceHook;
use crate::domain::{Notification, Page};
use crate::ports::ResourceRequest;

const OPEN_STATUSES: [&str; 2] = ["draft", "pending"];
const CASH_FLOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub total: f64,
    pub pending_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub accounts_payable: LedgerSummary,
    pub accounts_receivable: LedgerSummary,
    pub cash_flow: CashFlow,
}

/// Daily payment totals, one entry per day in all three series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CashFlow {
    pub inflow: Vec<f64>,
    pub outflow: Vec<f64>,
    pub dates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PaymentDay {
    #[serde(default)]
    inflow: Option<f64>,
    #[serde(default)]
    outflow: Option<f64>,
    #[serde(default)]
    date: String,
}

impl CashFlow {
    fn from_days(days: Vec<PaymentDay>) -> Self {
        let mut flow = Self::default();
        for day in days {
            flow.inflow.push(day.inflow.unwrap_or(0.0));
            flow.outflow.push(day.outflow.unwrap_or(0.0));
            flow.dates.push(day.date);
        }
        flow
    }
}

#[derive(Debug, Deserialize)]
struct Amounted {
    #[serde(default)]
    amount: Option<f64>,
}

impl LedgerSummary {
    fn from_records(records: &[Amounted]) -> Self {
        Self {
            total: records.iter().filter_map(|r| r.amount).sum(),
            pending_count: records.len(),
        }
    }
}

pub struct DashboardHooks {
    hook: ResourceHook,
}

impl DashboardHooks {
    pub fn new(hook: ResourceHook) -> Self {
        Self { hook }
    }

    pub fn loading(&self) -> bool {
        self.hook.loading()
    }

    /// Open payables, open receivables and the last 30 days of payments,
    /// fetched concurrently.
    pub async fn fetch_metrics(&self) -> Option<DashboardMetrics> {
        self.fetch_metrics_as_of(Utc::now()).await
    }

    pub async fn fetch_metrics_as_of(&self, now: DateTime<Utc>) -> Option<DashboardMetrics> {
        let client = self.hook.client_or_notify()?;

        let (payables, receivables, payments) = futures::future::join3(
            self.hook
                .fetch::<Page<Amounted>>(&client, open_records("payables")),
            self.hook
                .fetch::<Page<Amounted>>(&client, open_records("receivables")),
            self.hook
                .fetch::<Page<PaymentDay>>(&client, payments_since(now)),
        )
        .await;

        match (payables, receivables, payments) {
            (Ok(payables), Ok(receivables), Ok(payments)) => Some(DashboardMetrics {
                accounts_payable: LedgerSummary::from_records(&payables.data),
                accounts_receivable: LedgerSummary::from_records(&receivables.data),
                cash_flow: CashFlow::from_days(payments.data),
            }),
            _ => {
                self.hook
                    .notify(Notification::error("Failed to fetch dashboard metrics"));
                None
            }
        }
    }
}

fn open_records(path: &str) -> ResourceRequest {
    OPEN_STATUSES
        .iter()
        .fold(ResourceRequest::get(path), |request, status| {
            request.with_query("status__in", Some(status))
        })
}

fn payments_since(now: DateTime<Utc>) -> ResourceRequest {
    let start = now - Duration::days(CASH_FLOW_DAYS);
    ResourceRequest::get("analytics/payments")
        .with_query(
            "start_date",
            Some(start.to_rfc3339_opts(SecondsFormat::Millis, true)),
        )
        .with_query("end_date", Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)))
}
