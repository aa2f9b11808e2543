//! Results produced by simulated operations

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A tiny record type, used to show fan-out over differently typed results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.age)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Integer(i64),
    Person(Person),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Payload::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_person(&self) -> Option<&Person> {
        match self {
            Payload::Person(person) => Some(person),
            _ => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            Payload::Integer(value) => write!(f, "{}", value),
            Payload::Person(person) => write!(f, "{}", person),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Interrupted,
}

/// What a simulated operation reports once it stops waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatedResult {
    pub label: String,
    pub payload: Payload,
    /// Time actually spent suspended; shorter than planned when interrupted.
    pub delay_ms: u64,
    pub outcome: Outcome,
}

impl SimulatedResult {
    pub fn completed(label: impl Into<String>, payload: Payload, delay: Duration) -> Self {
        Self {
            label: label.into(),
            payload,
            delay_ms: delay.as_millis() as u64,
            outcome: Outcome::Completed,
        }
    }

    pub fn interrupted(label: impl Into<String>, waited: Duration) -> Self {
        Self {
            label: label.into(),
            payload: Payload::Text("Error: Interrupted".to_string()),
            delay_ms: waited.as_millis() as u64,
            outcome: Outcome::Interrupted,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == Outcome::Completed
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl fmt::Display for SimulatedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Completed => write!(f, "{}: {}", self.label, self.payload),
            Outcome::Interrupted => write!(f, "{}: interrupted", self.label),
        }
    }
}
