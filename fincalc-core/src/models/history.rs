use std::fmt;

use crate::format::format_number;
use crate::models::Operator;

/// One completed basic-calculator operation.
///
/// Renders as `"<lhs> <op> <rhs> = <result>"`, using the same number
/// rendering as the calculator display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryEntry {
    pub lhs: f64,
    pub operator: Operator,
    pub rhs: f64,
    pub result: f64,
}

impl fmt::Display for HistoryEntry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            format_number(self.lhs),
            self.operator,
            format_number(self.rhs),
            format_number(self.result)
        )
    }
}

/// Append-only record of completed operations, oldest first.
///
/// Entries are never reordered or deduplicated; the only way to remove them
/// is [`History::clear`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(
        &mut self,
        entry: HistoryEntry,
    ) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Formatted entries in chronological order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
