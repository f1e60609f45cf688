// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure financial projection math. Deterministic given inputs; non-positive
//! principal or tenure yields zeroed results instead of errors.

use serde::Serialize;

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiSchedule {
    pub emi: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// Equated monthly installment for a loan. Zero rate degenerates to straight
/// division of the principal over the tenure.
pub fn emi(principal: f64, annual_rate_pct: f64, tenure_months: u32) -> EmiSchedule {
    if principal <= 0.0 || tenure_months == 0 {
        return EmiSchedule {
            emi: 0.0,
            total_payment: 0.0,
            total_interest: 0.0,
        };
    }
    let n = tenure_months as f64;
    if annual_rate_pct <= 0.0 {
        return EmiSchedule {
            emi: principal / n,
            total_payment: principal,
            total_interest: 0.0,
        };
    }
    let r = annual_rate_pct / 12.0 / 100.0;
    let growth = (1.0 + r).powf(n);
    let emi = principal * r * growth / (growth - 1.0);
    let total_payment = emi * n;
    EmiSchedule {
        emi: round2(emi),
        total_payment: round2(total_payment),
        total_interest: round2(total_payment - principal),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipProjection {
    pub future_value: f64,
    pub invested: f64,
    pub returns: f64,
}

/// Systematic investment plan projection (annuity due). Outputs are rounded
/// to whole currency units.
pub fn sip(monthly_investment: f64, annual_return_pct: f64, years: f64) -> SipProjection {
    if monthly_investment <= 0.0 || years <= 0.0 {
        return SipProjection {
            future_value: 0.0,
            invested: 0.0,
            returns: 0.0,
        };
    }
    let months = years * 12.0;
    let invested = monthly_investment * months;
    let future_value = if annual_return_pct <= 0.0 {
        invested
    } else {
        let r = annual_return_pct / 12.0 / 100.0;
        monthly_investment * (((1.0 + r).powf(months) - 1.0) / r) * (1.0 + r)
    };
    SipProjection {
        future_value: future_value.round(),
        invested: invested.round(),
        returns: (future_value - invested).round(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundGrowth {
    pub amount: f64,
    pub interest: f64,
}

/// Compound interest with a configurable compounding frequency per year
/// (1 = yearly, 4 = quarterly, 12 = monthly).
pub fn compound_interest(
    principal: f64,
    annual_rate_pct: f64,
    years: f64,
    frequency: u32,
) -> CompoundGrowth {
    if principal <= 0.0 || years <= 0.0 || frequency == 0 {
        return CompoundGrowth {
            amount: 0.0,
            interest: 0.0,
        };
    }
    if annual_rate_pct <= 0.0 {
        return CompoundGrowth {
            amount: principal,
            interest: 0.0,
        };
    }
    let r = annual_rate_pct / 100.0;
    let n = frequency as f64;
    let amount = principal * (1.0 + r / n).powf(n * years);
    CompoundGrowth {
        amount: round2(amount),
        interest: round2(amount - principal),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LumpsumProjection {
    pub future_value: f64,
    pub returns: f64,
}

/// One-shot investment projection, rounded to whole currency units.
pub fn lumpsum(investment: f64, annual_rate_pct: f64, years: f64) -> LumpsumProjection {
    if investment <= 0.0 || years <= 0.0 {
        return LumpsumProjection {
            future_value: 0.0,
            returns: 0.0,
        };
    }
    let future_value = investment * (1.0 + annual_rate_pct / 100.0).powf(years);
    LumpsumProjection {
        future_value: future_value.round(),
        returns: (future_value - investment).round(),
    }
}
