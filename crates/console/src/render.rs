//! Plain-text rendering of API views and session state.

use std::fmt::Write;

use marches_core::identity::ResolvedUser;
use marches_core::session::{SessionPhase, SessionSnapshot};

use crate::api::{ContractRow, MetricView, SummaryView};

const SUBJECT_WIDTH: usize = 40;

pub fn render_user(user: &ResolvedUser) -> String {
    let rights = if user.role.can_administer() {
        "lecture, écriture, administration"
    } else if user.role.can_edit() {
        "lecture, écriture"
    } else {
        "lecture"
    };
    format!(
        "Utilisateur : {}\nEmail       : {}\nRôle        : {}\nDroits      : {}\n",
        user.name,
        user.email.as_deref().unwrap_or("-"),
        user.role,
        rights,
    )
}

/// One line per state change, for `watch`.
pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let phase = match snapshot.phase {
        SessionPhase::Uninitialized => "uninitialized",
        SessionPhase::Loading => "loading",
        SessionPhase::Ready => "ready",
    };
    let mut line = format!("[{phase}]");
    match &snapshot.user {
        Some(user) => {
            let _ = write!(line, " {} ({})", user.name, user.role);
        }
        None => line.push_str(" signed out"),
    }
    if let Some(error) = &snapshot.error {
        let _ = write!(line, " error: {error}");
    }
    line
}

fn render_metric(out: &mut String, label: &str, metric: &MetricView) {
    let _ = writeln!(
        out,
        "  {label:<22} {:>8.1} {:<5} objectif {:>6.1}  {}{}",
        metric.value,
        metric.unit,
        metric.target,
        metric.trend,
        if metric.synthetic { "  (estimé)" } else { "" },
    );
}

pub fn render_summary(summary: &SummaryView) -> String {
    let k = &summary.kpis;
    let mut out = String::new();

    let _ = writeln!(out, "Marchés");
    let _ = writeln!(out, "  total {:>6}   actifs {:>6}", k.total_markets, k.active_markets);
    let _ = writeln!(out, "Contrats");
    let _ = writeln!(
        out,
        "  total {:>6}   actifs {:>6}   achevés {:>6}   suspendus {:>6}",
        k.total_contracts, k.active_contracts, k.completed_contracts, k.suspended_contracts,
    );
    let _ = writeln!(
        out,
        "  en retard {:>3}   échéance proche {:>3}   décomptes en attente {:>3}",
        k.overdue_contracts, k.near_deadline_contracts, k.pending_settlements,
    );
    let _ = writeln!(out, "Montants (MAD)");
    let _ = writeln!(out, "  valeur totale  {:>16.2}", k.total_value);
    let _ = writeln!(out, "  payé           {:>16.2}", k.total_paid);
    let _ = writeln!(out, "  reste à payer  {:>16.2}", k.remaining_amount);
    let _ = writeln!(out, "  dépenses       {:>16.2}", k.total_expenses);
    let _ = writeln!(out, "  résultat net   {:>16.2}", k.net_profit);

    let p = &summary.performance;
    let _ = writeln!(out, "Performance");
    render_metric(&mut out, "taux de réussite", &p.success_rate);
    render_metric(&mut out, "efficacité budgétaire", &p.budget_efficiency);
    render_metric(&mut out, "délai de traitement", &p.processing_time);
    render_metric(&mut out, "satisfaction", &p.satisfaction);
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width - 1).collect();
        format!("{cut}…")
    }
}

pub fn render_contracts(rows: &[ContractRow]) -> String {
    if rows.is_empty() {
        return "Aucun contrat\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:<SUBJECT_WIDTH$} {:<10} {:>14} {:>14} {:<10} {:>7}  {}",
        "Numéro", "Objet", "Statut", "Montant", "Payé", "Échéance", "Jours", "Paiement",
    );
    for row in rows {
        let deadline = row
            .deadline_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let flag = if row.is_overdue {
            "  EN RETARD"
        } else if row.is_near_deadline {
            "  PROCHE"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:<14} {:<SUBJECT_WIDTH$} {:<10} {:>14.2} {:>14.2} {:<10} {:>7}  {}{}",
            row.number,
            truncate(&row.subject, SUBJECT_WIDTH),
            row.status,
            row.initial_amount,
            row.total_paid,
            deadline,
            row.remaining_days,
            row.payment_status,
            flag,
        );
    }
    let _ = writeln!(out, "{} contrat(s)", rows.len());
    out
}
