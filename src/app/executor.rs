use crate::app::context::Session;
use crate::app::error::Result;
use crate::app::job::{Scenario, Suite};
use crate::app::operation::Performable;
use crate::reporter::{TestCase, TestReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Instant;

pub struct Executor<'a> {
    session: &'a mut Session,
    screenshots_on_failure: bool,
    stop: Arc<AtomicBool>,
}

impl<'a> Executor<'a> {
    pub fn new(session: &'a mut Session, screenshots_on_failure: bool, stop: Arc<AtomicBool>) -> Self {
        Self {
            session,
            screenshots_on_failure,
            stop,
        }
    }

    /// Stops early when a stop was requested between scenarios, or with the
    /// error of a scenario that lost the browser session.
    pub fn run(&mut self, suite: &Suite, report: &mut TestReport) -> Result<()> {
        info!("Starting test suite with {} tests", suite.len());
        for (index, scenario) in suite.scenarios.iter().enumerate() {
            if self.stop.load(Ordering::Relaxed) {
                warn!(
                    "Stop requested, skipping the remaining {} tests",
                    suite.len() - index
                );
                break;
            }
            if index > 0 {
                sleep(self.session.between_tests());
            }

            let (case, outcome) = self.run_scenario(scenario);
            report.add_test_case(case)?;
            if let Err(e) = outcome {
                if e.is_fatal() {
                    error!("Browser session lost, aborting the run: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    pub fn run_scenario(&mut self, scenario: &Scenario) -> (TestCase, Result<()>) {
        let mut case = TestCase::new(&scenario.name(), &scenario.description());
        info!("Running test: {}", case.name());
        let now = Instant::now();

        let outcome = case.start().and_then(|_| {
            let session = &mut *self.session;
            for step in scenario.plan() {
                case.track_step(step.name, &step.description, || {
                    step.operations
                        .iter()
                        .try_for_each(|operation| operation.perform(session))
                })?;
            }
            Ok(())
        });

        match &outcome {
            Ok(()) => {
                if let Err(e) = case.complete(true, None) {
                    case.fail(&e.to_string());
                }
                info!("Test passed: {} ({:?})", case.name(), now.elapsed());
            }
            Err(e) => {
                if self.screenshots_on_failure {
                    match self.session.take_screenshot(case.name()) {
                        Ok(path) => case.attach(path),
                        Err(screenshot_error) => {
                            warn!("Could not capture failure screenshot: {}", screenshot_error)
                        }
                    }
                }
                if !e.is_fatal() {
                    if let Err(reset_error) = self.session.reset_windows() {
                        warn!("Could not close leftover windows: {}", reset_error);
                    }
                }
                if case.complete(false, Some(e.to_string())).is_err() {
                    case.fail(&e.to_string());
                }
                error!("Test failed: {} - {}", case.name(), e);
            }
        }
        (case, outcome)
    }
}
