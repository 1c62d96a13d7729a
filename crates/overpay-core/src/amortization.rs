//! Fixed-rate amortization with a constant monthly overpayment.
//!
//! The current schedule uses the closed-form level-payment formula. The
//! accelerated schedule is simulated month by month because the payoff date
//! is unknown in advance; the original term is a hard iteration cap, so the
//! simulation always terminates. All math in `rust_decimal::Decimal`.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::OverpayError;
use crate::types::{with_metadata, Availability, ComputationOutput, Money, Rate};
use crate::OverpayResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: u32 = 12;

/// Smallest monthly rate the level-payment formula resolves at 28 decimal
/// places; below it `(1+r)^n - 1` loses most of its significant digits.
pub const MIN_MONTHLY_RATE: Rate = dec!(0.0000000001);

/// Longest term accepted; bounds the simulation at 12,000 months.
pub const MAX_TERM_YEARS: u32 = 1000;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Loan parameters for one recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInput {
    /// Outstanding balance.
    pub balance: Money,
    /// Annual interest rate as a percentage (4.5 means 4.5%).
    pub annual_rate_percent: Decimal,
    /// Remaining term in whole years.
    pub remaining_term_years: u32,
    /// Extra amount paid every month on top of the required payment.
    #[serde(default)]
    pub overpayment: Money,
}

impl LoanInput {
    /// Annual percentage converted to a monthly decimal rate.
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
    }

    /// Original term in months; also the simulation's iteration cap.
    pub fn term_months(&self) -> u32 {
        self.remaining_term_years.saturating_mul(MONTHS_PER_YEAR)
    }

    /// A schedule can only be computed for a positive balance, rate and term,
    /// with the rate and term inside the range the engine resolves.
    pub fn is_computable(&self) -> bool {
        self.balance > Decimal::ZERO
            && self.annual_rate_percent > Decimal::ZERO
            && self.remaining_term_years > 0
            && self.out_of_range().is_none()
    }

    /// Why a positive input still cannot be scheduled.
    fn out_of_range(&self) -> Option<(&'static str, String)> {
        if self.remaining_term_years > MAX_TERM_YEARS {
            return Some((
                "remaining_term_years",
                format!("Remaining term exceeds {MAX_TERM_YEARS} years"),
            ));
        }
        if self.annual_rate_percent > Decimal::ZERO && self.monthly_rate() < MIN_MONTHLY_RATE {
            return Some((
                "annual_rate_percent",
                "Interest rate is too small to amortize".to_string(),
            ));
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Schedule without any overpayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSchedule {
    pub monthly_payment: Money,
    pub total_cost: Money,
    pub term_years: u32,
}

/// Schedule with the overpayment applied every month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceleratedSchedule {
    /// Required payment plus overpayment.
    pub monthly_payment: Money,
    pub total_cost: Money,
    /// Months until the balance is cleared (capped at the original term).
    pub term_months: u32,
    pub months_saved: u32,
    pub total_savings: Money,
    /// False when the cap was reached with a balance still outstanding.
    pub paid_off: bool,
}

/// Both schedules for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverpaymentAnalysis {
    pub current: Availability<CurrentSchedule>,
    pub accelerated: Availability<AcceleratedSchedule>,
}

/// One simulated month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

struct LevelPayment {
    payment: Money,
    /// The growth factor overflowed and the `balance * r` limit was used.
    saturated: bool,
}

struct SimulationSummary {
    months: u32,
    total_paid: Money,
    paid_off: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Level monthly payment and total cost over the full remaining term.
///
/// Returns `None` when the balance, rate or term is not positive or out of
/// range, or when the total overflows. The overpayment is ignored.
pub fn compute_current_schedule(input: &LoanInput) -> Option<CurrentSchedule> {
    current_terms(input).map(|(schedule, _)| schedule)
}

/// Payoff schedule when the overpayment is added to `current_payment` every
/// month.
///
/// `current_payment` must be the payment `compute_current_schedule` returned
/// for the same input. Returns `None` when no overpayment was requested or the
/// input is not computable.
pub fn compute_accelerated_schedule(
    input: &LoanInput,
    current_payment: Money,
) -> Option<AcceleratedSchedule> {
    if input.overpayment <= Decimal::ZERO || !input.is_computable() {
        return None;
    }

    let n = input.term_months();
    let monthly_payment = current_payment.checked_add(input.overpayment)?;
    let current_total = current_payment.checked_mul(Decimal::from(n))?;
    let summary = simulate(input, monthly_payment, |_| {})?;

    if !summary.paid_off {
        debug!(
            "overpayment of {} did not clear the balance within {} months",
            input.overpayment, n
        );
    }

    Some(AcceleratedSchedule {
        monthly_payment,
        total_cost: summary.total_paid,
        term_months: summary.months,
        months_saved: n - summary.months,
        // Overpaying never costs more; a negative difference is rounding.
        total_savings: (current_total - summary.total_paid).max(Decimal::ZERO),
        paid_off: summary.paid_off,
    })
}

/// Run both schedules and wrap them in the standard output envelope.
///
/// Missing or zero inputs produce `Unavailable` schedules rather than an
/// error; negative amounts are rejected.
pub fn analyze_overpayment(
    input: &LoanInput,
) -> OverpayResult<ComputationOutput<OverpaymentAnalysis>> {
    let start = Instant::now();
    validate_non_negative(input)?;

    let mut warnings: Vec<String> = Vec::new();
    let analysis = analyze(input, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization with monthly overpayment simulation",
        input,
        warnings,
        elapsed,
        analysis,
    ))
}

/// Both schedules without the envelope. Never fails: negative values are
/// reported as unavailable like zero ones.
pub fn analyze_schedules(input: &LoanInput) -> OverpaymentAnalysis {
    analyze(input, &mut Vec::new())
}

/// Month-by-month rows for the overpaid schedule, or the plain schedule when
/// the overpayment is zero.
pub fn build_schedule(input: &LoanInput) -> OverpayResult<Vec<ScheduleRow>> {
    validate_non_negative(input)?;
    require_computable(input)?;

    let too_large = || OverpayError::InvalidInput {
        field: "balance".into(),
        reason: "Loan is too large to amortize".into(),
    };
    let current = compute_current_schedule(input).ok_or_else(too_large)?;
    let payment = current
        .monthly_payment
        .checked_add(input.overpayment)
        .ok_or_else(too_large)?;

    let mut rows = Vec::new();
    simulate(input, payment, |row| rows.push(row)).ok_or_else(too_large)?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn analyze(input: &LoanInput, warnings: &mut Vec<String>) -> OverpaymentAnalysis {
    let unavailable = OverpaymentAnalysis {
        current: Availability::Unavailable,
        accelerated: Availability::Unavailable,
    };

    if let Some((_, reason)) = input.out_of_range() {
        warnings.push(reason);
        return unavailable;
    }

    let current = match current_terms(input) {
        Some((c, saturated)) => {
            if saturated {
                warnings.push(
                    "Payment growth factor exceeded numeric range; payment approximated by interest-only limit"
                        .into(),
                );
            }
            c
        }
        None if !input.is_computable() => return unavailable,
        None => {
            warn!("schedule overflowed for balance {}", input.balance);
            warnings.push("Loan values are too large to amortize".into());
            return unavailable;
        }
    };

    let accelerated = if input.overpayment.is_zero() {
        Availability::NotRequested
    } else {
        match compute_accelerated_schedule(input, current.monthly_payment) {
            Some(acc) => {
                if !acc.paid_off {
                    warnings.push(format!(
                        "Balance not cleared within the original {} month term",
                        input.term_months()
                    ));
                }
                Availability::Available(acc)
            }
            None => {
                if input.overpayment > Decimal::ZERO {
                    warnings.push("Overpaid schedule exceeds numeric range".into());
                }
                Availability::Unavailable
            }
        }
    };

    OverpaymentAnalysis {
        current: Availability::Available(current),
        accelerated,
    }
}

/// Current schedule plus whether its payment saturated.
fn current_terms(input: &LoanInput) -> Option<(CurrentSchedule, bool)> {
    if !input.is_computable() {
        debug!("current schedule unavailable for {:?}", input);
        return None;
    }

    let n = input.term_months();
    let level = level_payment(input.balance, input.monthly_rate(), n)?;
    let total_cost = level.payment.checked_mul(Decimal::from(n))?;

    Some((
        CurrentSchedule {
            monthly_payment: level.payment,
            total_cost,
            term_years: input.remaining_term_years,
        },
        level.saturated,
    ))
}

/// `balance * r(1+r)^n / ((1+r)^n - 1)`. When the growth factor overflows the
/// payment takes its limit `balance * r`. `None` when the rate vanishes at
/// this precision or the limit itself overflows.
fn level_payment(balance: Money, r: Rate, n: u32) -> Option<LevelPayment> {
    let interest_only = || {
        balance.checked_mul(r).map(|payment| LevelPayment {
            payment,
            saturated: true,
        })
    };

    let Some(factor) = (Decimal::ONE + r).checked_powu(u64::from(n)) else {
        return interest_only();
    };
    let denominator = factor - Decimal::ONE;
    if denominator <= Decimal::ZERO {
        return None;
    }

    let exact = r
        .checked_mul(factor)
        .and_then(|numerator| numerator.checked_div(denominator))
        .and_then(|k| balance.checked_mul(k));
    match exact {
        Some(payment) => Some(LevelPayment {
            payment,
            saturated: false,
        }),
        None => interest_only(),
    }
}

/// Apply `payment` each month until the balance clears or the original term
/// runs out. The final month is charged only what clears the loan. `None` if
/// any running amount overflows.
fn simulate(
    input: &LoanInput,
    payment: Money,
    mut on_month: impl FnMut(ScheduleRow),
) -> Option<SimulationSummary> {
    let r = input.monthly_rate();
    let cap = input.term_months();

    let mut remaining = input.balance;
    let mut total_paid = Decimal::ZERO;
    let mut months = 0u32;

    while remaining > Decimal::ZERO && months < cap {
        let interest = remaining.checked_mul(r)?;
        let owed = remaining.checked_add(interest)?;
        let (paid, principal) = if owed <= payment {
            (owed, remaining)
        } else {
            (payment, payment.checked_sub(interest)?)
        };

        // Final month lands exactly on zero.
        remaining = if paid == payment {
            remaining.checked_sub(principal)?
        } else {
            Decimal::ZERO
        };
        total_paid = total_paid.checked_add(paid)?;
        months += 1;

        on_month(ScheduleRow {
            month: months,
            payment: paid,
            interest,
            principal,
            closing_balance: remaining,
        });
    }

    Some(SimulationSummary {
        months,
        total_paid,
        paid_off: remaining <= Decimal::ZERO,
    })
}

fn validate_non_negative(input: &LoanInput) -> OverpayResult<()> {
    let checks = [
        ("balance", input.balance),
        ("annual_rate_percent", input.annual_rate_percent),
        ("overpayment", input.overpayment),
    ];
    for (field, value) in checks {
        if value < Decimal::ZERO {
            return Err(OverpayError::InvalidInput {
                field: field.into(),
                reason: "Must be non-negative".into(),
            });
        }
    }
    Ok(())
}

fn require_computable(input: &LoanInput) -> OverpayResult<()> {
    if input.balance.is_zero() {
        return Err(OverpayError::InvalidInput {
            field: "balance".into(),
            reason: "Balance must be greater than zero".into(),
        });
    }
    if input.annual_rate_percent.is_zero() {
        return Err(OverpayError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate must be greater than zero".into(),
        });
    }
    if input.remaining_term_years == 0 {
        return Err(OverpayError::InvalidInput {
            field: "remaining_term_years".into(),
            reason: "Remaining term must be at least one year".into(),
        });
    }
    if let Some((field, reason)) = input.out_of_range() {
        return Err(OverpayError::InvalidInput {
            field: field.into(),
            reason,
        });
    }
    Ok(())
}
