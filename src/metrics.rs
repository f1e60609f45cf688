// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregations over validated records: monthly totals, category groupings,
//! budget utilization, goal progress, and the financial health score. Pure
//! projections, recomputed on every read; inputs are assumed clean and
//! already owner-scoped.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Budget, Goal, Investment, Transaction, TxKind};

/// `value` as a share of `total`, clamped to [0, 100]. A zero total is 0,
/// not a division error.
pub fn percentage(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    (value / total * 100.0).clamp(0.0, 100.0)
}

pub fn dec_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryGroup {
    pub count: usize,
    pub total: Decimal,
}

/// Partition transactions by category, accumulating count and summed amount.
pub fn group_by_category(transactions: &[Transaction]) -> BTreeMap<String, CategoryGroup> {
    let mut groups: BTreeMap<String, CategoryGroup> = BTreeMap::new();
    for t in transactions {
        let g = groups.entry(t.category.clone()).or_default();
        g.count += 1;
        g.total += t.amount;
    }
    groups
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthGroup {
    pub income: Decimal,
    pub expense: Decimal,
    pub count: usize,
}

/// Partition transactions by the `YYYY-MM` prefix of their date, summing
/// income and expense separately.
pub fn group_by_month(transactions: &[Transaction]) -> BTreeMap<String, MonthGroup> {
    let mut groups: BTreeMap<String, MonthGroup> = BTreeMap::new();
    for t in transactions {
        let g = groups.entry(t.month()).or_default();
        match t.kind {
            TxKind::Income => g.income += t.amount,
            TxKind::Expense => g.expense += t.amount,
        }
        g.count += 1;
    }
    groups
}

pub fn monthly_income(transactions: &[Transaction], month: &str) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == TxKind::Income && t.month() == month)
        .map(|t| t.amount)
        .sum()
}

pub fn monthly_expense(transactions: &[Transaction], month: &str) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == TxKind::Expense && t.month() == month)
        .map(|t| t.amount)
        .sum()
}

/// All-time income minus expense.
pub fn total_balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().fold(Decimal::ZERO, |acc, t| match t.kind {
        TxKind::Income => acc + t.amount,
        TxKind::Expense => acc - t.amount,
    })
}

pub fn total_savings(goals: &[Goal]) -> Decimal {
    goals.iter().map(|g| g.current_amount).sum()
}

/// Expense totals per category for one month; the derived `spent` behind
/// budget reports.
pub fn spent_by_category(transactions: &[Transaction], month: &str) -> BTreeMap<String, Decimal> {
    let mut spent: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions {
        if t.kind == TxKind::Expense && t.month() == month {
            *spent.entry(t.category.clone()).or_default() += t.amount;
        }
    }
    spent
}

/// Recompute one budget's spent figure from its matching category+month
/// expenses. The stored record never carries this number.
pub fn budget_spent(budget: &Budget, transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| {
            t.kind == TxKind::Expense && t.category == budget.category && t.month() == budget.month
        })
        .map(|t| t.amount)
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Success,
    Warning,
    Danger,
}

/// Utilization tiers: >=90% danger, >=70% warning, else success.
pub fn budget_status(utilization_pct: f64) -> BudgetStatus {
    if utilization_pct >= 90.0 {
        BudgetStatus::Danger
    } else if utilization_pct >= 70.0 {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Success
    }
}

/// The user-facing label. Exceeding the limit is its own label on top of the
/// danger tier.
pub fn budget_label(utilization_pct: f64) -> &'static str {
    if utilization_pct >= 100.0 {
        "Over budget"
    } else {
        match budget_status(utilization_pct) {
            BudgetStatus::Danger => "Critical",
            BudgetStatus::Warning => "Warning",
            BudgetStatus::Success => "On track",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInputs {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    /// None when the owner has no budgets at all; 0.0 means budgets exist
    /// and nothing was spent against them.
    pub budget_utilization: Option<f64>,
    pub goals_progress: f64,
}

/// Gather health-score inputs from the owner's records: all-time income and
/// expense, aggregate budget utilization (limits vs recomputed spends), and
/// aggregate goal progress.
pub fn health_inputs(
    transactions: &[Transaction],
    budgets: &[Budget],
    goals: &[Goal],
) -> HealthInputs {
    let income: Decimal = transactions
        .iter()
        .filter(|t| t.kind == TxKind::Income)
        .map(|t| t.amount)
        .sum();
    let expenses: Decimal = transactions
        .iter()
        .filter(|t| t.kind == TxKind::Expense)
        .map(|t| t.amount)
        .sum();

    let budget_total: Decimal = budgets.iter().map(|b| b.limit).sum();
    let budget_spent_total: Decimal = budgets
        .iter()
        .map(|b| budget_spent(b, transactions))
        .sum();
    let budget_utilization = if budget_total.is_zero() {
        None
    } else {
        Some(dec_f64(budget_spent_total) / dec_f64(budget_total) * 100.0)
    };

    let goals_total: Decimal = goals.iter().map(|g| g.target_amount).sum();
    let goals_current: Decimal = goals.iter().map(|g| g.current_amount).sum();
    let goals_progress = if goals_total.is_zero() {
        0.0
    } else {
        dec_f64(goals_current) / dec_f64(goals_total) * 100.0
    };

    HealthInputs {
        income: dec_f64(income),
        expenses: dec_f64(expenses),
        savings: dec_f64(income - expenses),
        budget_utilization,
        goals_progress,
    }
}

/// Financial health score on a 0-100 scale, base 50. Savings ratio adds up
/// to 20, budget adherence up to 15, goal progress up to 15; overspending
/// and a negative savings ratio each subtract 10.
pub fn health_score(inputs: &HealthInputs) -> u8 {
    let mut score: f64 = 50.0;

    let savings_ratio = if inputs.income > 0.0 {
        inputs.savings / inputs.income * 100.0
    } else {
        0.0
    };
    if savings_ratio >= 30.0 {
        score += 20.0;
    } else if savings_ratio >= 20.0 {
        score += 15.0;
    } else if savings_ratio >= 10.0 {
        score += 10.0;
    } else if savings_ratio >= 5.0 {
        score += 5.0;
    } else if savings_ratio < 0.0 {
        score -= 10.0;
    }

    if let Some(utilization) = inputs.budget_utilization {
        if utilization <= 80.0 {
            score += 15.0;
        } else if utilization <= 90.0 {
            score += 10.0;
        } else if utilization <= 100.0 {
            score += 5.0;
        } else {
            score -= 10.0;
        }
    }

    if inputs.goals_progress >= 75.0 {
        score += 15.0;
    } else if inputs.goals_progress >= 50.0 {
        score += 10.0;
    } else if inputs.goals_progress >= 25.0 {
        score += 5.0;
    }

    score.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub invested: Decimal,
    pub current: Decimal,
    pub profit_loss: Decimal,
}

pub fn portfolio_totals(investments: &[Investment]) -> PortfolioTotals {
    let mut totals = PortfolioTotals::default();
    for i in investments {
        totals.invested += i.invested();
        totals.current += i.current_total();
    }
    totals.profit_loss = totals.current - totals.invested;
    totals
}

/// Days from `today` until `date`; negative when the date is past.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}
