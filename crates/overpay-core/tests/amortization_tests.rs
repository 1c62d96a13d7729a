use overpay_core::amortization::{
    analyze_overpayment, analyze_schedules, compute_accelerated_schedule,
    compute_current_schedule, LoanInput, MAX_TERM_YEARS,
};
use overpay_core::display::{render, DisplayConfig};
use overpay_core::parse::{coerce_loan_input, RawLoanInput};
use overpay_core::Availability;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn reference_loan(overpayment: Decimal) -> LoanInput {
    // 200k over 25 years at 4%
    LoanInput {
        balance: dec!(200_000),
        annual_rate_percent: dec!(4),
        remaining_term_years: 25,
        overpayment,
    }
}

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{}: expected ~{}, got {} (diff = {})",
        msg,
        expected,
        actual,
        diff
    );
}

// ===========================================================================
// Current schedule
// ===========================================================================

#[test]
fn test_reference_loan_monthly_payment() {
    let current = compute_current_schedule(&reference_loan(Decimal::ZERO)).unwrap();
    assert_close(current.monthly_payment, dec!(1055.67), dec!(0.01), "payment");
    // 300 payments of ~1,055.67
    assert_close(current.total_cost, dec!(316_702.10), dec!(0.01), "total cost");
    assert_eq!(current.term_years, 25);
}

#[test]
fn test_current_schedule_is_idempotent() {
    let input = reference_loan(dec!(200));
    let first = compute_current_schedule(&input).unwrap();
    let second = compute_current_schedule(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.monthly_payment.serialize(), second.monthly_payment.serialize());
}

#[test]
fn test_zero_fields_each_force_unavailable() {
    let zero_balance = LoanInput {
        balance: Decimal::ZERO,
        ..reference_loan(dec!(200))
    };
    let zero_rate = LoanInput {
        annual_rate_percent: Decimal::ZERO,
        ..reference_loan(dec!(200))
    };
    let zero_term = LoanInput {
        remaining_term_years: 0,
        ..reference_loan(dec!(200))
    };

    for input in [zero_balance, zero_rate, zero_term] {
        assert_eq!(compute_current_schedule(&input), None);
        assert_eq!(compute_accelerated_schedule(&input, dec!(1055.67)), None);
        let out = analyze_overpayment(&input).unwrap();
        assert_eq!(out.result.current, Availability::Unavailable);
        assert_eq!(out.result.accelerated, Availability::Unavailable);
    }
}

// ===========================================================================
// Accelerated schedule
// ===========================================================================

#[test]
fn test_no_overpayment_means_no_accelerated_schedule() {
    let input = reference_loan(Decimal::ZERO);
    let current = compute_current_schedule(&input).unwrap();
    assert_eq!(compute_accelerated_schedule(&input, current.monthly_payment), None);
}

#[test]
fn test_reference_loan_with_200_overpayment() {
    let input = reference_loan(dec!(200));
    let current = compute_current_schedule(&input).unwrap();
    let acc = compute_accelerated_schedule(&input, current.monthly_payment).unwrap();

    assert_eq!(acc.monthly_payment, current.monthly_payment + dec!(200));
    assert!(acc.term_months < 300);
    assert_eq!(acc.term_months, 228);
    assert_eq!(acc.months_saved, 72);
    assert!(acc.total_savings > Decimal::ZERO);
    assert_close(acc.total_cost, dec!(285_635.03), dec!(0.01), "accelerated cost");
    assert_close(acc.total_savings, dec!(31_067.08), dec!(0.01), "savings");
    assert!(acc.paid_off);
}

#[test]
fn test_term_never_exceeds_cap_and_savings_non_negative() {
    let balances = [dec!(1_000), dec!(45_000), dec!(250_000), dec!(1_200_000)];
    let rates = [dec!(0.5), dec!(3.75), dec!(9), dec!(18)];
    let terms = [1u32, 5, 30];
    let overpayments = [dec!(0.01), dec!(50), dec!(5_000)];

    for balance in balances {
        for rate in rates {
            for years in terms {
                for overpayment in overpayments {
                    let input = LoanInput {
                        balance,
                        annual_rate_percent: rate,
                        remaining_term_years: years,
                        overpayment,
                    };
                    let current = compute_current_schedule(&input).unwrap();
                    let acc =
                        compute_accelerated_schedule(&input, current.monthly_payment).unwrap();
                    assert!(acc.term_months <= years * 12, "{input:?}");
                    assert_eq!(acc.months_saved, years * 12 - acc.term_months);
                    assert!(acc.total_savings >= Decimal::ZERO, "{input:?}: {acc:?}");
                }
            }
        }
    }
}

// ===========================================================================
// Extreme inputs
// ===========================================================================

fn form(balance: &str, rate: &str, term: &str, overpayment: &str) -> RawLoanInput {
    RawLoanInput {
        balance: balance.into(),
        interest_rate: rate.into(),
        remaining_term: term.into(),
        overpayment: overpayment.into(),
    }
}

#[test]
fn test_decimal_max_overpayment_leaves_accelerated_unavailable() {
    let raw = form("£200,000", "4%", "25 years", "£79228162514264337593543950335");
    let analysis = analyze_schedules(&coerce_loan_input(&raw));
    assert!(analysis.current.is_available());
    assert_eq!(analysis.accelerated, Availability::Unavailable);

    let fields = render(&analysis, &DisplayConfig::default());
    assert_eq!(fields.current_monthly_payment, "£1,055.67");
    assert_eq!(fields.total_savings, "-");
}

#[test]
fn test_decimal_max_balance_is_unavailable() {
    let raw = form("£79228162514264337593543950335", "4%", "25 years", "£200");
    let out = analyze_overpayment(&coerce_loan_input(&raw)).unwrap();
    assert_eq!(out.result.current, Availability::Unavailable);
    assert_eq!(out.result.accelerated, Availability::Unavailable);
    assert!(!out.warnings.is_empty());
}

#[test]
fn test_huge_term_is_rejected_without_iterating() {
    let raw = form("£200,000", "4%", "4294967295 years", "£200");
    let input = coerce_loan_input(&raw);
    assert_eq!(input.remaining_term_years, u32::MAX);

    let out = analyze_overpayment(&input).unwrap();
    assert_eq!(out.result.current, Availability::Unavailable);
    assert_eq!(out.result.accelerated, Availability::Unavailable);
}

#[test]
fn test_longest_accepted_term_still_computes() {
    let input = LoanInput {
        remaining_term_years: MAX_TERM_YEARS,
        ..reference_loan(dec!(200))
    };
    let acc = analyze_schedules(&input).accelerated.as_option().cloned().unwrap();
    assert!(acc.paid_off);
    assert!(acc.total_savings > Decimal::ZERO);
}

#[test]
fn test_rate_rounding_to_zero_is_unavailable_not_free() {
    let raw = form("£200,000", "0.00000000000000000000000001%", "25 years", "£200");
    let analysis = analyze_schedules(&coerce_loan_input(&raw));
    assert_eq!(analysis.current, Availability::Unavailable);
    assert_eq!(analysis.accelerated, Availability::Unavailable);
}

#[test]
fn test_tiny_rates_on_large_balances_never_report_negative_savings() {
    let balances = [dec!(1), dec!(200_000), dec!(79_228_162_514_264)];
    let rates = [dec!(0.00000012), dec!(0.000001), dec!(0.001)];
    let overpayments = [dec!(0.01), dec!(200), dec!(1_000_000)];

    for balance in balances {
        for rate in rates {
            for overpayment in overpayments {
                let input = LoanInput {
                    balance,
                    annual_rate_percent: rate,
                    remaining_term_years: 30,
                    overpayment,
                };
                match analyze_schedules(&input).accelerated {
                    Availability::Available(acc) => {
                        assert!(acc.term_months <= 360, "{input:?}");
                        assert!(acc.total_savings >= Decimal::ZERO, "{input:?}: {acc:?}");
                    }
                    Availability::Unavailable => {}
                    Availability::NotRequested => panic!("overpayment ignored for {input:?}"),
                }
            }
        }
    }
}

// ===========================================================================
// End to end: raw form text to rendered fields
// ===========================================================================

#[test]
fn test_form_text_to_rendered_fields() {
    let raw = RawLoanInput {
        balance: "£200,000".into(),
        interest_rate: "4%".into(),
        remaining_term: "25 years".into(),
        overpayment: "£200".into(),
    };
    let out = analyze_overpayment(&coerce_loan_input(&raw)).unwrap();
    let fields = render(&out.result, &DisplayConfig::default());

    assert_eq!(fields.current_monthly_payment, "£1,055.67");
    assert_eq!(fields.current_total_cost, "£316,702.10");
    assert_eq!(fields.current_remaining_term, "25 years");
    assert_eq!(fields.new_monthly_payment, "£1,255.67");
    assert_eq!(fields.new_remaining_term, "19 years, 0 months");
    assert_eq!(fields.total_time_saved, "6 years, 0 months");
}

#[test]
fn test_zero_balance_renders_placeholders() {
    let raw = RawLoanInput {
        balance: "£0".into(),
        interest_rate: "4%".into(),
        remaining_term: "25 years".into(),
        overpayment: "£200".into(),
    };
    let out = analyze_overpayment(&coerce_loan_input(&raw)).unwrap();
    let fields = render(&out.result, &DisplayConfig::default());
    assert_eq!(fields.current_monthly_payment, "-");
    assert_eq!(fields.new_total_cost, "-");
    assert_eq!(fields.total_savings, "-");
}

#[test]
fn test_envelope_echoes_input() {
    let out = analyze_overpayment(&reference_loan(dec!(200))).unwrap();
    assert_eq!(out.assumptions["remaining_term_years"], 25);
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert!(out.methodology.contains("amortization"));
}
