//! Drives a full session from fixture files: a config with starting inputs
//! and a scripted stdin.

use std::fs;
use std::path::{Path, PathBuf};

use fincalc_cli::config::Config;
use fincalc_cli::session::Session;
use fincalc_core::calculations::common::to_cents;
use fincalc_core::{CalculatorTab, CompoundingFrequency};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn run_script(session: &mut Session) -> String {
    let script = fs::read_to_string(fixture("session_script.txt")).expect("script fixture");
    let mut output = Vec::new();
    session
        .run(script.as_bytes(), &mut output)
        .expect("session should run to completion");
    String::from_utf8(output).expect("output is utf-8")
}

#[test]
fn config_fixture_seeds_every_tab() {
    let config = Config::load(&fixture("starting_inputs.toml")).expect("config fixture loads");
    let session = Session::new(&config);

    assert_eq!(session.loan().inputs.principal, 250000.0);
    assert_eq!(to_cents(session.loan().result.monthly_payment), Some(dec!(1498.88)));

    // Unlisted interest fields keep their defaults.
    assert_eq!(session.interest().inputs.principal, 10000.0);
    assert_eq!(
        session.interest().inputs.frequency,
        CompoundingFrequency::Quarterly
    );

    assert_eq!(session.mortgage().inputs.down_payment, 100000.0);
    assert_eq!(session.mortgage().payment.loan_amount, 300000.0);
}

#[test]
fn missing_config_file_is_a_read_error() {
    let err = Config::load(&fixture("does_not_exist.toml")).unwrap_err();

    assert!(err.to_string().contains("does_not_exist.toml"));
}

#[test]
fn scripted_session_updates_each_tab() {
    let mut session = Session::default();
    let output = run_script(&mut session);

    assert_eq!(
        session.basic().history().lines(),
        vec!["5 + 3 = 8", "10 × 2 = 20"]
    );
    assert_eq!(session.loan().result.monthly_payment, 1000.0);
    assert_eq!(session.mortgage().inputs.down_payment_percent, 30.0);
    assert_eq!(session.active_tab(), CalculatorTab::Mortgage);

    assert!(output.contains("Monthly payment:  $1,000.00"));
    assert!(output.contains("Down payment:     $90,000 (30.0%)"));
}

#[test]
fn scripted_session_reports_errors_and_stops_at_quit() {
    let mut session = Session::default();
    let output = run_script(&mut session);

    assert!(output.contains("30 year fixed at 4.5% APR"));
    // `show` follows `quit` and never runs, so the rejected command is the
    // last thing written.
    assert!(
        output
            .trim_end()
            .ends_with("error: unknown command 'nonsense' (type 'help' for a list)")
    );
}
