mod calculator_tab;
mod compounding_frequency;
mod history;
mod operator;

pub use calculator_tab::{CalculatorTab, TabParseError};
pub use compounding_frequency::{CompoundingFrequency, FrequencyParseError};
pub use history::{History, HistoryEntry};
pub use operator::{Operator, apply_symbol};
