//! Dashboard KPIs and performance metrics.
//!
//! Reduces the enriched contract collection, the markets and the expenses
//! into one fixed [`DashboardReport`]. Amounts are summed as-is: mixed
//! currencies are not converted.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::contract_metrics::ContractMetrics;
use crate::status::{ContractStatus, MarketStatus, SettlementStatus};
use crate::types::{Amount, Date};

/// Target completion rate, in percent.
pub const SUCCESS_RATE_TARGET: f64 = 85.0;
/// Target share of contract value already paid, in percent.
pub const BUDGET_EFFICIENCY_TARGET: f64 = 80.0;
/// Target average duration of completed contracts, in days.
pub const PROCESSING_TIME_TARGET: f64 = 90.0;
/// Target satisfaction score, out of 5.
pub const SATISFACTION_TARGET: f64 = 4.0;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MarketFigures {
    pub status: Option<MarketStatus>,
    pub estimated_amount: Amount,
}

/// A contract with its derived fields already computed.
#[derive(Debug, Clone)]
pub struct ContractFigures {
    pub status: Option<ContractStatus>,
    pub service: Option<String>,
    pub start_date: Option<Date>,
    pub duration_days: Option<i32>,
    pub initial_amount: Amount,
    pub metrics: ContractMetrics,
}

#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    pub markets: Vec<MarketFigures>,
    pub contracts: Vec<ContractFigures>,
    pub expense_amounts: Vec<Amount>,
    pub settlement_statuses: Vec<Option<SettlementStatus>>,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardKpis {
    pub total_markets: usize,
    pub active_markets: usize,
    pub total_contracts: usize,
    pub active_contracts: usize,
    pub completed_contracts: usize,
    pub suspended_contracts: usize,
    pub total_value: Amount,
    pub total_paid: Amount,
    pub remaining_amount: Amount,
    /// Sum of market estimated amounts.
    pub total_revenue: Amount,
    pub total_expenses: Amount,
    /// `total_revenue - total_expenses - total_value`. An approximation kept
    /// for compatibility, not a ledger figure.
    pub net_profit: Amount,
    pub success_rate: f64,
    /// Mean duration in days of completed contracts with a duration.
    pub average_time: f64,
    pub overdue_contracts: usize,
    pub near_deadline_contracts: usize,
    pub pending_settlements: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetric {
    pub value: f64,
    pub target: f64,
    pub trend: Trend,
    pub unit: &'static str,
    /// Set when the value is derived by formula rather than measured.
    pub synthetic: bool,
}

impl PerformanceMetric {
    fn higher_is_better(value: f64, target: f64, unit: &'static str) -> Self {
        Self {
            value,
            target,
            trend: if value >= target { Trend::Up } else { Trend::Down },
            unit,
            synthetic: false,
        }
    }

    fn lower_is_better(value: f64, target: f64, unit: &'static str) -> Self {
        Self {
            value,
            target,
            trend: if value <= target { Trend::Up } else { Trend::Down },
            unit,
            synthetic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub success_rate: PerformanceMetric,
    pub budget_efficiency: PerformanceMetric,
    pub processing_time: PerformanceMetric,
    pub satisfaction: PerformanceMetric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdowns {
    pub contracts_by_status: BTreeMap<String, usize>,
    pub value_by_service: BTreeMap<String, Amount>,
    /// Keyed by `YYYY-MM` of the start date, ascending.
    pub value_by_month: BTreeMap<String, Amount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub kpis: DashboardKpis,
    pub performance: PerformanceMetrics,
    pub breakdowns: Breakdowns,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn ratio_percent(part: Amount, whole: Amount) -> f64 {
    if whole <= Decimal::ZERO {
        return 0.0;
    }
    let pct = (part * Decimal::ONE_HUNDRED / whole).round_dp(1);
    pct.to_f64().unwrap_or(0.0)
}

/// Reduce the collections into the KPI record.
pub fn compute_kpis(input: &ReportInput) -> DashboardKpis {
    let contracts = &input.contracts;
    let count_status =
        |status: ContractStatus| contracts.iter().filter(|c| c.status == Some(status)).count();

    let total_contracts = contracts.len();
    let completed_contracts = count_status(ContractStatus::Completed);

    let total_value: Amount = contracts.iter().map(|c| c.initial_amount).sum();
    let total_paid: Amount = contracts.iter().map(|c| c.metrics.total_paid).sum();
    let total_revenue: Amount = input.markets.iter().map(|m| m.estimated_amount).sum();
    let total_expenses: Amount = input.expense_amounts.iter().copied().sum();

    let success_rate = if total_contracts == 0 {
        0.0
    } else {
        round1(completed_contracts as f64 / total_contracts as f64 * 100.0)
    };

    let durations: Vec<f64> = contracts
        .iter()
        .filter(|c| c.status == Some(ContractStatus::Completed))
        .filter_map(|c| c.duration_days)
        .map(f64::from)
        .collect();
    let average_time = if durations.is_empty() {
        0.0
    } else {
        round1(durations.iter().sum::<f64>() / durations.len() as f64)
    };

    DashboardKpis {
        total_markets: input.markets.len(),
        active_markets: input
            .markets
            .iter()
            .filter(|m| {
                matches!(
                    m.status,
                    Some(MarketStatus::Published) | Some(MarketStatus::InProgress)
                )
            })
            .count(),
        total_contracts,
        active_contracts: count_status(ContractStatus::Active),
        completed_contracts,
        suspended_contracts: count_status(ContractStatus::Suspended),
        total_value,
        total_paid,
        remaining_amount: total_value - total_paid,
        total_revenue,
        total_expenses,
        net_profit: total_revenue - total_expenses - total_value,
        success_rate,
        average_time,
        overdue_contracts: contracts.iter().filter(|c| c.metrics.is_overdue).count(),
        near_deadline_contracts: contracts.iter().filter(|c| c.metrics.is_near_deadline).count(),
        pending_settlements: input
            .settlement_statuses
            .iter()
            .filter(|s| **s == Some(SettlementStatus::Pending))
            .count(),
    }
}

/// Derive the four performance metrics from the KPIs.
pub fn performance_metrics(kpis: &DashboardKpis) -> PerformanceMetrics {
    let satisfaction_value = round1((kpis.success_rate / 20.0 + 3.0).clamp(1.0, 5.0));

    PerformanceMetrics {
        success_rate: PerformanceMetric::higher_is_better(
            kpis.success_rate,
            SUCCESS_RATE_TARGET,
            "%",
        ),
        budget_efficiency: PerformanceMetric::higher_is_better(
            ratio_percent(kpis.total_paid, kpis.total_value),
            BUDGET_EFFICIENCY_TARGET,
            "%",
        ),
        processing_time: PerformanceMetric::lower_is_better(
            kpis.average_time,
            PROCESSING_TIME_TARGET,
            "jours",
        ),
        satisfaction: PerformanceMetric {
            synthetic: true,
            ..PerformanceMetric::higher_is_better(satisfaction_value, SATISFACTION_TARGET, "/5")
        },
    }
}

pub fn breakdowns(contracts: &[ContractFigures]) -> Breakdowns {
    let mut contracts_by_status = BTreeMap::new();
    let mut value_by_service = BTreeMap::new();
    let mut value_by_month = BTreeMap::new();

    for contract in contracts {
        let status = contract
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        *contracts_by_status.entry(status).or_insert(0) += 1;

        let service = contract
            .service
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Non renseigné")
            .to_string();
        *value_by_service.entry(service).or_insert(Decimal::ZERO) += contract.initial_amount;

        if let Some(start) = contract.start_date {
            let month = format!("{:04}-{:02}", start.year(), start.month());
            *value_by_month.entry(month).or_insert(Decimal::ZERO) += contract.initial_amount;
        }
    }

    Breakdowns {
        contracts_by_status,
        value_by_service,
        value_by_month,
    }
}

/// Full report: KPIs, performance metrics and breakdowns.
pub fn build_report(input: &ReportInput) -> DashboardReport {
    let kpis = compute_kpis(input);
    let performance = performance_metrics(&kpis);
    DashboardReport {
        breakdowns: breakdowns(&input.contracts),
        kpis,
        performance,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::contract_metrics::{evaluate_contract, ContractTerms};

    fn dec(v: &str) -> Decimal {
        v.parse().unwrap()
    }

    fn today() -> Date {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn contract(
        status: ContractStatus,
        amount: &str,
        start: (i32, u32, u32),
        duration: Option<i32>,
        paid: &[&str],
    ) -> ContractFigures {
        let start_date = NaiveDate::from_ymd_opt(start.0, start.1, start.2);
        let terms = ContractTerms {
            status: Some(status),
            start_date,
            duration_days: duration,
            initial_amount: dec(amount),
        };
        let metrics = evaluate_contract(&terms, paid.iter().map(|p| dec(p)), today());
        ContractFigures {
            status: Some(status),
            service: Some("Hydraulique".into()),
            start_date,
            duration_days: duration,
            initial_amount: dec(amount),
            metrics,
        }
    }

    fn sample() -> ReportInput {
        ReportInput {
            markets: vec![
                MarketFigures {
                    status: Some(MarketStatus::Published),
                    estimated_amount: dec("5000"),
                },
                MarketFigures {
                    status: Some(MarketStatus::Draft),
                    estimated_amount: dec("1000"),
                },
            ],
            contracts: vec![
                contract(ContractStatus::Active, "2000", (2024, 1, 1), Some(180), &["500"]),
                contract(ContractStatus::Completed, "1000", (2023, 6, 1), Some(60), &["1000"]),
                contract(ContractStatus::Completed, "500", (2023, 8, 1), Some(120), &[]),
                contract(ContractStatus::Suspended, "300", (2023, 12, 1), None, &[]),
            ],
            expense_amounts: vec![dec("200"), dec("100")],
            settlement_statuses: vec![
                Some(SettlementStatus::Pending),
                Some(SettlementStatus::Validated),
                Some(SettlementStatus::Pending),
            ],
        }
    }

    #[test]
    fn empty_input_has_zero_rates() {
        let kpis = compute_kpis(&ReportInput::default());
        assert_eq!(kpis.success_rate, 0.0);
        assert_eq!(kpis.average_time, 0.0);
        assert_eq!(kpis.total_value, Decimal::ZERO);

        let perf = performance_metrics(&kpis);
        assert_eq!(perf.budget_efficiency.value, 0.0);
        assert_eq!(perf.satisfaction.value, 3.0);
    }

    #[test]
    fn totals_and_counts() {
        let kpis = compute_kpis(&sample());

        assert_eq!(kpis.total_markets, 2);
        assert_eq!(kpis.active_markets, 1);
        assert_eq!(kpis.total_contracts, 4);
        assert_eq!(kpis.active_contracts, 1);
        assert_eq!(kpis.completed_contracts, 2);
        assert_eq!(kpis.suspended_contracts, 1);
        assert_eq!(kpis.total_value, dec("3800"));
        assert_eq!(kpis.total_paid, dec("1500"));
        assert_eq!(kpis.remaining_amount, dec("2300"));
        assert_eq!(kpis.total_revenue, dec("6000"));
        assert_eq!(kpis.total_expenses, dec("300"));
        assert_eq!(kpis.pending_settlements, 2);
    }

    #[test]
    fn net_profit_subtracts_expenses_and_contract_value_from_revenue() {
        let kpis = compute_kpis(&sample());
        assert_eq!(kpis.net_profit, dec("1900"));
    }

    #[test]
    fn success_rate_and_average_time() {
        let kpis = compute_kpis(&sample());
        assert_eq!(kpis.success_rate, 50.0);
        assert_eq!(kpis.average_time, 90.0);
    }

    #[test]
    fn success_rate_rounds_to_one_decimal() {
        let mut input = sample();
        input.contracts.truncate(3);
        assert_eq!(compute_kpis(&input).success_rate, 66.7);
    }

    #[test]
    fn metric_trends_follow_direction() {
        let perf = performance_metrics(&compute_kpis(&sample()));

        assert_eq!(perf.success_rate.trend, Trend::Down);
        assert_eq!(perf.processing_time.value, 90.0);
        assert_eq!(perf.processing_time.trend, Trend::Up);
        assert_eq!(perf.budget_efficiency.value, 39.5);
        assert_eq!(perf.budget_efficiency.trend, Trend::Down);
    }

    #[test]
    fn satisfaction_is_synthetic_and_clamped() {
        let perf = performance_metrics(&compute_kpis(&sample()));
        assert!(perf.satisfaction.synthetic);
        assert!(!perf.success_rate.synthetic);
        assert_eq!(perf.satisfaction.value, 5.0);
        assert_eq!(perf.satisfaction.unit, "/5");
        assert_eq!(perf.satisfaction.trend, Trend::Up);
    }

    #[test]
    fn breakdowns_group_by_status_service_and_month() {
        let b = breakdowns(&sample().contracts);

        assert_eq!(b.contracts_by_status["completed"], 2);
        assert_eq!(b.contracts_by_status["active"], 1);
        assert_eq!(b.value_by_service["Hydraulique"], dec("3800"));

        let months: Vec<_> = b.value_by_month.keys().cloned().collect();
        assert_eq!(months, vec!["2023-06", "2023-08", "2023-12", "2024-01"]);
        assert_eq!(b.value_by_month["2024-01"], dec("2000"));
    }

    #[test]
    fn overdue_and_near_deadline_counts_come_from_metrics() {
        let mut input = sample();
        input.contracts.push(contract(
            ContractStatus::Active,
            "100",
            (2023, 1, 1),
            Some(30),
            &[],
        ));
        input.contracts.push(contract(
            ContractStatus::Active,
            "100",
            (2024, 2, 1),
            Some(45),
            &[],
        ));

        let kpis = compute_kpis(&input);
        assert_eq!(kpis.overdue_contracts, 1);
        assert_eq!(kpis.near_deadline_contracts, 1);
    }
}
