use std::fmt;

/// A basic calculator arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn all() -> &'static [Operator] {
        &[
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
        ]
    }

    /// The symbol shown on the keypad and written into history entries.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }

    /// Parses a keypad symbol. ASCII stand-ins (`*`, `x`, `/`) are accepted
    /// for multiplication and division.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "×" | "*" | "x" | "X" => Some(Self::Multiply),
            "÷" | "/" => Some(Self::Divide),
            _ => None,
        }
    }

    /// Applies the operator with IEEE-754 semantics.
    ///
    /// Division by zero is not special-cased: `1 ÷ 0` is `Infinity` and
    /// `0 ÷ 0` is `NaN`.
    pub fn apply(
        self,
        a: f64,
        b: f64,
    ) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Applies the operator named by `symbol`, returning `b` unchanged when the
/// symbol is not a known operator.
pub fn apply_symbol(
    a: f64,
    b: f64,
    symbol: &str,
) -> f64 {
    match Operator::parse(symbol) {
        Some(op) => op.apply(a, b),
        None => b,
    }
}
