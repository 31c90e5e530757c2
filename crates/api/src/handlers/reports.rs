//! Handlers for the `/reports` resource: the dashboard summary and its
//! file export.

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use marches_core::export::{export_file_name, to_csv, to_pretty_json, ExportFormat, ReportRow};
use marches_core::statistics::{build_report, ContractFigures, DashboardReport, MarketFigures, ReportInput};
use marches_core::types::Date;
use marches_db::models::contract::ContractWithMetrics;
use marches_db::models::expense::Expense;
use marches_db::models::market::Market;
use marches_db::models::settlement::Settlement;
use marches_db::repositories::{ContractRepo, ExpenseRepo, MarketRepo, SettlementRepo};
use serde::Serialize;

use super::contracts::enrich_all;
use super::today;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::ExportParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything a report is computed from, loaded in one pass.
pub struct ReportData {
    pub markets: Vec<Market>,
    pub contracts: Vec<ContractWithMetrics>,
    pub expenses: Vec<Expense>,
    pub settlements: Vec<Settlement>,
}

impl ReportData {
    async fn load(state: &AppState) -> AppResult<Self> {
        let markets = MarketRepo::list(&state.pool).await?;
        let contracts = ContractRepo::list(&state.pool).await?;
        let contracts = enrich_all(&state.pool, contracts).await?;
        let expenses = ExpenseRepo::list(&state.pool).await?;
        let settlements = SettlementRepo::list(&state.pool).await?;
        Ok(Self {
            markets,
            contracts,
            expenses,
            settlements,
        })
    }

    /// Project the rows onto the inputs of the statistics engine. Unknown
    /// stored labels become `None` and match no status bucket.
    pub fn report_input(&self) -> ReportInput {
        ReportInput {
            markets: self
                .markets
                .iter()
                .map(|m| MarketFigures {
                    status: m.status.parse().ok(),
                    estimated_amount: m.estimated_amount,
                })
                .collect(),
            contracts: self
                .contracts
                .iter()
                .map(|c| ContractFigures {
                    status: c.contract.status.parse().ok(),
                    service: c.contract.service.clone(),
                    start_date: c.contract.start_date,
                    duration_days: c.contract.duration_days,
                    initial_amount: c.contract.initial_amount,
                    metrics: c.metrics.clone(),
                })
                .collect(),
            expense_amounts: self.expenses.iter().map(|e| e.amount).collect(),
            settlement_statuses: self.settlements.iter().map(|s| s.status.parse().ok()).collect(),
        }
    }

    /// One CSV row per market, contract, settlement and expense.
    pub fn rows(&self) -> Vec<ReportRow> {
        fn date(d: Option<Date>) -> String {
            d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
        }
        let row = |kind: &str, value: String, d: Option<Date>, status: &str| ReportRow {
            kind: kind.to_string(),
            value,
            date: date(d),
            status: status.to_string(),
        };

        let markets = self.markets.iter().map(|m| {
            row("Marché", m.estimated_amount.to_string(), m.publication_date, m.status.as_str())
        });
        let contracts = self.contracts.iter().map(|c| {
            row(
                "Contrat",
                c.contract.initial_amount.to_string(),
                c.contract.start_date,
                c.contract.status.as_str(),
            )
        });
        let settlements = self.settlements.iter().map(|s| {
            row("Décompte", s.amount.to_string(), s.validation_date, s.status.as_str())
        });
        let expenses = self
            .expenses
            .iter()
            .map(|e| row("Dépense", e.amount.to_string(), Some(e.expense_date), e.status.as_str()));

        markets
            .chain(contracts)
            .chain(settlements)
            .chain(expenses)
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct JsonExport<'a> {
    generated_on: Date,
    report: &'a DashboardReport,
    rows: &'a [ReportRow],
}

/// GET /api/reports/summary
pub async fn summary(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let data = ReportData::load(&state).await?;
    Ok(Json(DataResponse::new(build_report(&data.report_input()))))
}

/// GET /api/reports/export?format=json|csv
///
/// Served as an attachment named `rapport-<date>.<ext>`.
pub async fn export(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<impl IntoResponse> {
    let format = ExportFormat::parse(params.format.as_deref())?;
    let data = ReportData::load(&state).await?;
    let rows = data.rows();
    let today = today();

    let body = match format {
        ExportFormat::Csv => to_csv(&rows),
        ExportFormat::Json => {
            let report = build_report(&data.report_input());
            to_pretty_json(&JsonExport {
                generated_on: today,
                report: &report,
                rows: &rows,
            })?
        }
    };

    let file_name = export_file_name(format, today);
    tracing::info!(user_id = %user.user_id, format = ?format, rows = rows.len(), "Report exported");

    Ok((
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}
