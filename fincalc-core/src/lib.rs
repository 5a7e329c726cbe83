pub mod calculations;
pub mod format;
pub mod input;
pub mod models;

pub use calculations::{
    BasicCalculator, CalculatorMode, InterestInputs, InterestResult, Key, KeyParseError,
    LoanError, LoanInputs, LoanResult, MortgageEdit, MortgageInputs, MortgagePayment,
};
pub use models::*;
