//! Calculation logic for the four calculators.
//!
//! The basic calculator is the only stateful component; the loan, compound
//! interest and mortgage calculators are pure functions of their inputs and
//! are recomputed wholesale whenever an input changes.

pub mod basic;
pub mod common;
pub mod interest;
pub mod loan;
pub mod mortgage;

pub use basic::{BasicCalculator, CalculatorMode, Key, KeyParseError};
pub use interest::{InterestInputs, InterestResult};
pub use loan::{LoanError, LoanInputs, LoanResult};
pub use mortgage::{
    MORTGAGE_TERM_OPTIONS, MortgageEdit, MortgageInputs, MortgagePayment, PaymentComponent,
};
