use crate::app::error::{Error, Result};
use chrono::{DateTime, Local};
use serde_derive::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    NotStarted,
    Running,
    Passed,
    Failed,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Passed | Status::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::NotStarted => "NOT STARTED",
            Status::Running => "RUNNING",
            Status::Passed => "PASSED",
            Status::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TestStep {
    name: String,
    description: String,
    status: Status,
    start: DateTime<Local>,
    end: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl TestStep {
    fn begin(name: &str, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            status: Status::Running,
            start: Local::now(),
            end: None,
            error_message: None,
        }
    }

    fn close(&mut self, status: Status, error_message: Option<String>) {
        self.status = status;
        self.end = Some(Local::now());
        self.error_message = error_message;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn start(&self) -> DateTime<Local> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Local>> {
        self.end
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn duration(&self) -> Duration {
        span(Some(self.start), self.end)
    }
}

/// `NotStarted -> Running -> {Passed, Failed}`; steps can only be tracked
/// while the case is running.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    uuid: uuid::Uuid,
    name: String,
    description: String,
    status: Status,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    steps: Vec<TestStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<PathBuf>,
}

impl TestCase {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            uuid: uuid::Uuid::new_v4(),
            name: name.to_owned(),
            description: description.to_owned(),
            status: Status::NotStarted,
            start: None,
            end: None,
            steps: Vec::new(),
            error_message: None,
            attachments: Vec::new(),
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.status != Status::NotStarted {
            return Err(Error::Lifecycle(format!(
                "test case '{}' is already {}",
                self.name,
                self.status.label()
            )));
        }
        self.status = Status::Running;
        self.start = Some(Local::now());
        Ok(())
    }

    pub fn complete(&mut self, success: bool, error_message: Option<String>) -> Result<()> {
        if self.status != Status::Running {
            return Err(Error::Lifecycle(format!(
                "cannot complete test case '{}' while it is {}",
                self.name,
                self.status.label()
            )));
        }
        self.status = if success { Status::Passed } else { Status::Failed };
        self.end = Some(Local::now());
        self.error_message = error_message;
        Ok(())
    }

    pub fn fail(&mut self, message: &str) {
        let now = Local::now();
        match self.status {
            Status::NotStarted => {
                self.start = Some(now);
                self.end = Some(now);
            }
            Status::Running => self.end = Some(now),
            Status::Passed | Status::Failed => {}
        }
        self.status = Status::Failed;
        self.error_message = Some(message.to_owned());
    }

    /// Runs `action` as a named step, closed as failed if it panics.
    pub fn track_step<T, F>(&mut self, name: &str, description: &str, action: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if self.status != Status::Running {
            return Err(Error::Lifecycle(format!(
                "cannot track step '{}' on test case '{}' while it is {}",
                name,
                self.name,
                self.status.label()
            )));
        }
        trace!("Step '{}' started", name);
        let mut guard = StepGuard {
            case: self,
            step: Some(TestStep::begin(name, description)),
        };
        let result = action();
        match &result {
            Ok(_) => guard.finish(Status::Passed, None),
            Err(e) => guard.finish(Status::Failed, Some(e.to_string())),
        }
        result
    }

    pub fn attach(&mut self, path: PathBuf) {
        self.attachments.push(path);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn start_time(&self) -> Option<DateTime<Local>> {
        self.start
    }

    pub fn end_time(&self) -> Option<DateTime<Local>> {
        self.end
    }

    pub fn steps(&self) -> &[TestStep] {
        &self.steps
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }

    pub fn duration(&self) -> Duration {
        span(self.start, self.end)
    }
}

struct StepGuard<'a> {
    case: &'a mut TestCase,
    step: Option<TestStep>,
}

impl StepGuard<'_> {
    fn finish(&mut self, status: Status, error_message: Option<String>) {
        if let Some(mut step) = self.step.take() {
            step.close(status, error_message);
            debug!("Step '{}' {}", step.name, status.label());
            self.case.steps.push(step);
        }
    }
}

impl Drop for StepGuard<'_> {
    fn drop(&mut self) {
        self.finish(Status::Failed, Some("step aborted".to_owned()));
    }
}

pub(crate) fn span(start: Option<DateTime<Local>>, end: Option<DateTime<Local>>) -> Duration {
    match (start, end) {
        (Some(start), Some(end)) => (end - start).to_std().unwrap_or_default(),
        _ => Duration::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn running(name: &str) -> TestCase {
        let mut case = TestCase::new(name, "");
        case.start().unwrap();
        case
    }

    #[test]
    fn test_start_then_complete_passes() {
        let mut case = running("Login Test");
        case.complete(true, None).unwrap();

        assert_eq!(case.status(), Status::Passed);
        assert!(case.end_time().unwrap() >= case.start_time().unwrap());
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut case = running("Login Test");

        assert!(matches!(case.start(), Err(Error::Lifecycle(_))));
        assert_eq!(case.status(), Status::Running);
    }

    #[test]
    fn test_complete_before_start_is_rejected() {
        let mut case = TestCase::new("Login Test", "");

        assert!(matches!(case.complete(true, None), Err(Error::Lifecycle(_))));
        assert_eq!(case.status(), Status::NotStarted);
        assert!(case.start_time().is_none());
        assert!(case.end_time().is_none());
    }

    #[test]
    fn test_fail_forces_terminal_state() {
        let mut never_started = TestCase::new("a", "");
        never_started.fail("driver crashed");
        assert_eq!(never_started.status(), Status::Failed);
        assert_eq!(never_started.error_message(), Some("driver crashed"));
        assert_eq!(never_started.start_time(), never_started.end_time());

        let mut passed = running("b");
        passed.complete(true, None).unwrap();
        let end = passed.end_time();
        passed.fail("late failure");
        assert_eq!(passed.status(), Status::Failed);
        assert_eq!(passed.end_time(), end);
    }

    #[test]
    fn test_steps_keep_execution_order_and_nest_in_case() {
        let mut case = running("Purchase");
        for name in &["Login", "Select Package", "Pay"] {
            case.track_step(name, "", || Ok(())).unwrap();
        }
        case.complete(true, None).unwrap();

        let names: Vec<&str> = case.steps().iter().map(TestStep::name).collect();
        assert_eq!(names, vec!["Login", "Select Package", "Pay"]);
        for step in case.steps() {
            assert!(step.start() >= case.start_time().unwrap());
            assert!(step.end().unwrap() <= case.end_time().unwrap());
            assert!(step.end().unwrap() >= step.start());
        }
    }

    #[test]
    fn test_failed_step_is_closed_and_error_returned() {
        let mut case = running("Purchase");
        let result: Result<()> = case.track_step("Pay", "Click pay", || {
            Err(Error::Assertion("no popup".to_owned()))
        });

        assert!(matches!(result, Err(Error::Assertion(_))));
        assert_eq!(case.steps().len(), 1);
        assert_eq!(case.steps()[0].status(), Status::Failed);
        assert_eq!(
            case.steps()[0].error_message(),
            Some("Assertion failed: no popup")
        );
    }

    #[test]
    fn test_step_value_is_passed_through() {
        let mut case = running("Account");
        let account = case
            .track_step("Input Account", "", || Ok("abc12345".to_owned()))
            .unwrap();

        assert_eq!(account, "abc12345");
        assert_eq!(case.steps()[0].status(), Status::Passed);
    }

    #[test]
    fn test_step_on_idle_case_is_rejected_without_running_action() {
        let mut case = TestCase::new("Idle", "");
        let mut ran = false;
        let result = case.track_step("Login", "", || {
            ran = true;
            Ok(())
        });

        assert!(matches!(result, Err(Error::Lifecycle(_))));
        assert!(!ran);
        assert!(case.steps().is_empty());
    }

    #[test]
    fn test_panicking_step_is_still_closed() {
        let mut case = running("Panics");
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _: Result<()> = case.track_step("Boom", "", || panic!("element vanished"));
        }));

        assert!(outcome.is_err());
        assert_eq!(case.steps().len(), 1);
        assert_eq!(case.steps()[0].status(), Status::Failed);
        assert!(case.steps()[0].end().is_some());
    }
}
