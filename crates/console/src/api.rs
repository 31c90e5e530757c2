//! REST client for the dashboard API.
//!
//! Every call carries the signed-in user's access token. Responses are read
//! into view types holding only what the console prints.

use chrono::NaiveDate;
use marches_core::filtering::SortKey;
use marches_core::status::{ContractStatus, PaymentStatus};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// HTTP client for one dashboard API instance.
pub struct MarchesApi {
    client: reqwest::Client,
    api_url: String,
}

/// Errors from the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KpiView {
    pub total_markets: usize,
    pub active_markets: usize,
    pub total_contracts: usize,
    pub active_contracts: usize,
    pub completed_contracts: usize,
    pub suspended_contracts: usize,
    pub total_value: Decimal,
    pub total_paid: Decimal,
    pub remaining_amount: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub overdue_contracts: usize,
    pub near_deadline_contracts: usize,
    pub pending_settlements: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricView {
    pub value: f64,
    pub target: f64,
    pub trend: String,
    pub unit: String,
    #[serde(default)]
    pub synthetic: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceView {
    pub success_rate: MetricView,
    pub budget_efficiency: MetricView,
    pub processing_time: MetricView,
    pub satisfaction: MetricView,
}

/// Body of `GET /api/reports/summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryView {
    pub kpis: KpiView,
    pub performance: PerformanceView,
}

/// One entry of `GET /api/contracts`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractRow {
    pub number: String,
    pub subject: String,
    pub awardee: Option<String>,
    pub status: String,
    pub initial_amount: Decimal,
    pub total_paid: Decimal,
    pub deadline_date: Option<NaiveDate>,
    pub remaining_days: i64,
    pub is_overdue: bool,
    pub is_near_deadline: bool,
    pub payment_status: PaymentStatus,
}

impl MarchesApi {
    /// * `api_url` - Base URL without the `/api` prefix.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    pub async fn summary(&self, access_token: &str) -> Result<SummaryView, ConsoleApiError> {
        let response = self
            .client
            .get(format!("{}/api/reports/summary", self.api_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// List contracts, filtered by status (all when `None`) and sorted.
    pub async fn contracts(
        &self,
        access_token: &str,
        status: Option<ContractStatus>,
        sort: SortKey,
    ) -> Result<Vec<ContractRow>, ConsoleApiError> {
        let status = status.map_or(marches_core::filtering::ALL, ContractStatus::as_str);
        let response = self
            .client
            .get(format!("{}/api/contracts", self.api_url))
            .query(&[("status", status), ("sort", sort.as_str())])
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Unwrap the `{ success, data }` envelope, or surface the `error`
    /// message of a failed call.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ConsoleApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(ConsoleApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<Envelope<T>>().await?.data)
    }
}
