//! Three independent steps with different result types, then one dependent step

use crate::config::DemoConfig;
use crate::core::combiner::{FailurePolicy, FanOut};
use crate::error::DemoError;
use crate::models::{
    timed, CombinedResult, ComparisonReport, DelaySpec, Payload, Person, SimulatedResult,
    TimingSample,
};
use crate::services::simulator::TaskSimulator;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const TEXT_STEP: &str = "text";
pub const NUMBER_STEP: &str = "number";
pub const PERSON_STEP: &str = "person";

pub async fn modify_text(
    simulator: &TaskSimulator,
    delay: &DelaySpec,
    input: String,
    token: &CancellationToken,
) -> SimulatedResult {
    println!("Doing some action returning text: {}", input);
    simulator
        .produce(TEXT_STEP, delay, token, move |_| {
            Payload::Text(format!("{} was modified", input))
        })
        .await
}

pub async fn add_hundred(
    simulator: &TaskSimulator,
    delay: &DelaySpec,
    input: i64,
    token: &CancellationToken,
) -> SimulatedResult {
    println!("Doing some action returning integer: {}", input);
    simulator
        .produce(NUMBER_STEP, delay, token, move |_| Payload::Integer(input + 100))
        .await
}

pub async fn load_person(
    simulator: &TaskSimulator,
    delay: &DelaySpec,
    token: &CancellationToken,
) -> SimulatedResult {
    println!("Doing some action returning person");
    simulator
        .produce(PERSON_STEP, delay, token, |_| {
            Payload::Person(Person {
                name: "John".to_string(),
                age: 25,
            })
        })
        .await
}

/// Inputs of the dependent step, with fallbacks for interrupted steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInputs {
    pub text: String,
    pub number: i64,
    pub person: Option<Person>,
}

impl StepInputs {
    pub fn from_results(
        text: &SimulatedResult,
        number: &SimulatedResult,
        person: &SimulatedResult,
        original: i64,
    ) -> Self {
        Self {
            text: completed(text)
                .and_then(Payload::as_text)
                .unwrap_or("error")
                .to_string(),
            number: completed(number)
                .and_then(Payload::as_integer)
                .unwrap_or(original),
            person: completed(person).and_then(Payload::as_person).cloned(),
        }
    }

    pub fn from_combined(combined: &CombinedResult, original: i64) -> Self {
        let payload = |label: &str| {
            combined
                .get(label)
                .and_then(|slot| slot.result())
                .and_then(completed)
        };
        Self {
            text: payload(TEXT_STEP)
                .and_then(Payload::as_text)
                .unwrap_or("error")
                .to_string(),
            number: payload(NUMBER_STEP)
                .and_then(Payload::as_integer)
                .unwrap_or(original),
            person: payload(PERSON_STEP).and_then(Payload::as_person).cloned(),
        }
    }

    pub fn summary(&self) -> String {
        let person = self
            .person
            .as_ref()
            .map(|person| person.to_string())
            .unwrap_or_else(|| "unknown person".to_string());
        format!("{}, {}, {}", person, self.text, self.number)
    }
}

fn completed(result: &SimulatedResult) -> Option<&Payload> {
    result.is_completed().then_some(&result.payload)
}

/// The step that needs all three results.
pub async fn finish(
    simulator: &TaskSimulator,
    delay: &DelaySpec,
    inputs: &StepInputs,
    token: &CancellationToken,
) -> SimulatedResult {
    println!("Doing some action after other actions done:");
    let summary = inputs.summary();
    let result = simulator
        .produce("combine", delay, token, move |_| Payload::Text(summary))
        .await;
    if result.is_completed() {
        println!("{}", result.payload);
    }
    result
}

pub async fn run(config: &DemoConfig) -> Result<(), DemoError> {
    let simulator = TaskSimulator::new(&config.simulator);
    let delay = config.nonblocking.step_delay;
    let token = CancellationToken::new();

    println!("\n=== Lightweight task demo ===\n");
    println!("\n===== 1. Running the steps one after another =====\n");
    let (_, sequential) = timed(async {
        let text = modify_text(&simulator, &delay, "A String".to_string(), &token).await;
        let number = add_hundred(&simulator, &delay, 0, &token).await;
        let person = load_person(&simulator, &delay, &token).await;
        let inputs = StepInputs::from_results(&text, &number, &person, 0);
        finish(&simulator, &delay, &inputs, &token).await
    })
    .await;
    println!("Sequential time: {}ms", sequential.millis());

    println!("\n===== 2. Running the steps concurrently =====\n");
    let start = Instant::now();
    let mut fan_out = FanOut::new(FailurePolicy::Abort, &token);
    {
        let simulator = simulator.clone();
        fan_out.spawn(TEXT_STEP, move |token| async move {
            Ok(modify_text(&simulator, &delay, "A String".to_string(), &token).await)
        });
    }
    {
        let simulator = simulator.clone();
        fan_out.spawn(NUMBER_STEP, move |token| async move {
            Ok(add_hundred(&simulator, &delay, 0, &token).await)
        });
    }
    {
        let simulator = simulator.clone();
        fan_out.spawn(PERSON_STEP, move |token| async move {
            Ok(load_person(&simulator, &delay, &token).await)
        });
    }
    let combined = fan_out.join().await?;
    let inputs = StepInputs::from_combined(&combined, 0);
    finish(&simulator, &delay, &inputs, &token).await;
    let concurrent = TimingSample::since(start);
    println!("Time taken with lightweight tasks: {}ms", concurrent.millis());

    let report = ComparisonReport::new("Dependent steps", 3, sequential, concurrent);
    println!("\n===== Performance comparison =====");
    println!("{}", config.report_format.render(&report)?);
    Ok(())
}
