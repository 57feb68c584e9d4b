//! Scripted runs of a dismissable presentation over a simulated sheet.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, ensure, Context, Result};
use clap::ValueEnum;
use futures::{future::BoxFuture, FutureExt, StreamExt};
use presentation::{hidden_channel, DismissablePresentation, PresentationError};
use serde::Serialize;
use shared::{
    domain::{FinishCause, Outcome, Phase, PresentationId},
    error::FailureReport,
};
use tracing::debug;

use crate::config::Settings;

const FINISH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Present, then dismiss through the coordinator.
    Dismiss,
    /// Present, then the sheet disappears on its own.
    Hidden,
    /// The present procedure fails.
    PresentFailure,
    /// The sheet is torn down before present runs.
    StaleUnit,
    /// Every scenario above.
    All,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Dismiss,
        Scenario::Hidden,
        Scenario::PresentFailure,
        Scenario::StaleUnit,
    ];

    /// Concrete scenarios for a selection. Empty or containing `all` means every one.
    pub fn resolve(selection: &[Scenario]) -> Vec<Scenario> {
        if selection.is_empty() || selection.contains(&Scenario::All) {
            return Scenario::ALL.to_vec();
        }
        selection.to_vec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Present,
    Dismiss,
    Hidden,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub outcome: Option<Outcome>,
    pub failure: Option<FailureReport>,
    pub phase: Phase,
    pub can_present: bool,
    pub can_dismiss: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub presentation: PresentationId,
    pub steps: Vec<StepReport>,
    pub finish_cause: Option<FinishCause>,
    pub present_calls: usize,
    pub dismiss_calls: usize,
}

#[derive(Debug)]
pub struct Sheet {
    title: String,
}

type SimulatedFuture = BoxFuture<'static, Result<()>>;

fn simulated(
    delay: Duration,
    calls: Arc<AtomicUsize>,
    failure: Option<&'static str>,
) -> impl Fn(Arc<Sheet>, bool) -> SimulatedFuture + Send + Sync + 'static {
    move |sheet, animated| {
        calls.fetch_add(1, Ordering::SeqCst);
        debug!(title = %sheet.title, animated, "simulated procedure running");
        async move {
            if animated {
                tokio::time::sleep(delay).await;
            }
            match failure {
                Some(message) => Err(anyhow!(message)),
                None => Ok(()),
            }
        }
        .boxed()
    }
}

fn record(
    step: Step,
    result: Result<Outcome, PresentationError>,
    presentation: &DismissablePresentation<Sheet>,
) -> StepReport {
    let (outcome, failure) = match result {
        Ok(outcome) => (Some(outcome), None),
        Err(err) => (None, Some(FailureReport::from(&err))),
    };
    StepReport {
        step,
        outcome,
        failure,
        phase: presentation.phase(),
        can_present: presentation.can_present(),
        can_dismiss: presentation.can_dismiss(),
    }
}

pub async fn run_scenario(scenario: Scenario, settings: &Settings) -> Result<ScenarioReport> {
    ensure!(scenario != Scenario::All, "`all` must be resolved before running");
    let sheet = Arc::new(Sheet {
        title: format!("{scenario:?} sheet"),
    });
    let present_calls = Arc::new(AtomicUsize::new(0));
    let dismiss_calls = Arc::new(AtomicUsize::new(0));
    let present_failure =
        (scenario == Scenario::PresentFailure).then_some("simulated present failure");

    let (trigger, hidden_events) = hidden_channel();
    let presentation = DismissablePresentation::new(
        &sheet,
        simulated(settings.present_delay(), present_calls.clone(), present_failure),
        simulated(settings.dismiss_delay(), dismiss_calls.clone(), None),
        hidden_events,
    )?;
    let mut finished = presentation.finished();
    debug!(?scenario, presentation = %presentation.id(), "scenario started");

    if scenario == Scenario::StaleUnit {
        drop(sheet);
    }

    let mut steps = Vec::new();
    let result = presentation.present().execute(settings.animated).await;
    steps.push(record(Step::Present, result, &presentation));

    let finish_cause = if scenario == Scenario::Hidden {
        tokio::time::sleep(settings.hidden_delay()).await;
        trigger.fire();
        let cause = tokio::time::timeout(FINISH_TIMEOUT, finished.next())
            .await
            .context("hidden event was not observed")?;
        steps.push(record(Step::Hidden, Ok(Outcome::Completed), &presentation));
        cause
    } else {
        None
    };

    let result = presentation.dismiss().execute(settings.animated).await;
    steps.push(record(Step::Dismiss, result, &presentation));

    Ok(ScenarioReport {
        scenario,
        presentation: presentation.id(),
        steps,
        finish_cause: finish_cause.or_else(|| presentation.finish_cause()),
        present_calls: present_calls.load(Ordering::SeqCst),
        dismiss_calls: dismiss_calls.load(Ordering::SeqCst),
    })
}

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod tests;
