//! Fan-in results, kept in declared order

use crate::models::result::SimulatedResult;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotOutcome {
    Done { result: SimulatedResult },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub label: String,
    #[serde(flatten)]
    pub outcome: SlotOutcome,
}

impl Slot {
    pub fn result(&self) -> Option<&SimulatedResult> {
        match &self.outcome {
            SlotOutcome::Done { result } => Some(result),
            SlotOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, SlotOutcome::Failed { .. })
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            SlotOutcome::Done { result } => write!(f, "{}", result),
            SlotOutcome::Failed { error } => write!(f, "[failed] {}: {}", self.label, error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CombinedResult {
    pub slots: Vec<Slot>,
    pub elapsed_ms: u64,
}

impl CombinedResult {
    pub fn labels(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.label.as_str()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.label == label)
    }

    /// Longest realized delay among the slots that finished.
    pub fn slowest_ms(&self) -> u64 {
        self.slots
            .iter()
            .filter_map(Slot::result)
            .map(|result| result.delay_ms)
            .max()
            .unwrap_or(0)
    }

    /// What the same operations would have cost one after another.
    pub fn sequential_ms(&self) -> u64 {
        self.slots
            .iter()
            .filter_map(Slot::result)
            .map(|result| result.delay_ms)
            .sum()
    }

    pub fn failures(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_failed()).count()
    }
}

impl fmt::Display for CombinedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, slot) in self.slots.iter().enumerate() {
            writeln!(f, "{}. {}", position + 1, slot)?;
        }
        Ok(())
    }
}
