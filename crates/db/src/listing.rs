//! Filter and sort adapters for list views.

use marches_core::filtering::{Filterable, Sortable};
use marches_core::types::{Amount, Date};

use crate::models::contract::ContractWithMetrics;
use crate::models::market::Market;

impl Filterable for Market {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.number.as_str()),
            Some(self.object.as_str()),
            self.awardee_name.as_deref(),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(&self.status)
    }

    fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }
}

impl Sortable for Market {
    fn start_date(&self) -> Option<Date> {
        self.expected_start_date
    }

    fn amount(&self) -> Amount {
        self.estimated_amount
    }

    fn status_label(&self) -> Option<&str> {
        Some(&self.status)
    }

    fn deadline(&self) -> Option<Date> {
        self.submission_deadline
    }
}

impl Filterable for ContractWithMetrics {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.contract.number.as_str()),
            Some(self.contract.subject.as_str()),
            self.contract.awardee.as_deref(),
        ]
    }

    fn status_label(&self) -> Option<&str> {
        Some(&self.contract.status)
    }

    fn service(&self) -> Option<&str> {
        self.contract.service.as_deref()
    }
}

impl Sortable for ContractWithMetrics {
    fn start_date(&self) -> Option<Date> {
        self.contract.start_date
    }

    fn amount(&self) -> Amount {
        self.contract.initial_amount
    }

    fn status_label(&self) -> Option<&str> {
        Some(&self.contract.status)
    }

    fn deadline(&self) -> Option<Date> {
        self.metrics.deadline_date
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use marches_core::filtering::{filter_and_sort, ListFilter, SortKey};
    use marches_core::types::DbId;
    use rust_decimal::Decimal;

    use crate::models::contract::Contract;

    use super::*;

    fn contract(number: &str, status: &str, amount: i64, start: Option<(i32, u32, u32)>) -> Contract {
        Contract {
            id: DbId::new_v4(),
            number: number.into(),
            market_id: None,
            subject: "Réhabilitation du canal principal".into(),
            awardee: Some("Atlas BTP".into()),
            initial_amount: Decimal::from(amount),
            currency: "MAD".into(),
            notification_date: None,
            start_date: start.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            duration_days: Some(90),
            status: status.into(),
            service: Some("SEHA".into()),
            contract_type: None,
            procurement_method: None,
            budget_source: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn enriched(c: Contract) -> ContractWithMetrics {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        ContractWithMetrics::evaluate(c, [], today)
    }

    #[test]
    fn contracts_filter_by_status_and_sort_by_deadline() {
        let rows = vec![
            enriched(contract("C-1", "active", 100, Some((2024, 2, 1)))),
            enriched(contract("C-2", "draft", 500, None)),
            enriched(contract("C-3", "active", 50, Some((2024, 1, 1)))),
        ];

        let filter = ListFilter::new(None, Some("active"), None);
        let out = filter_and_sort(rows, &filter, SortKey::Deadline);

        let numbers: Vec<&str> = out.iter().map(|c| c.contract.number.as_str()).collect();
        assert_eq!(numbers, vec!["C-3", "C-1"]);
    }

    #[test]
    fn enriched_contract_serializes_flat() {
        let row = enriched(contract("C-9", "active", 1000, Some((2024, 1, 1))));
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["number"], "C-9");
        assert_eq!(json["consumed_days"], 60);
        assert_eq!(json["payment_status"], "pending");
        assert_eq!(json["deadline_date"], "2024-03-31");
    }
}
