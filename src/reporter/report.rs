use crate::app::error::{Error, Result};
use crate::reporter::html;
use crate::reporter::model::{span, Status, TestCase};
use chrono::{DateTime, Local};
use serde_derive::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const HTML_REPORT_FILE: &str = "test_report.html";
pub const JSON_REPORT_FILE: &str = "test_report.json";

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub success_rate: f64,
    #[serde(with = "crate::reporter::serialize::seconds")]
    pub duration: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    name: String,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    test_cases: Vec<TestCase>,
}

impl TestReport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            start: None,
            end: None,
            test_cases: Vec::new(),
        }
    }

    pub fn start(&mut self) -> Result<()> {
        if self.start.is_some() {
            return Err(Error::Lifecycle(format!(
                "report '{}' already started",
                self.name
            )));
        }
        self.start = Some(Local::now());
        Ok(())
    }

    pub fn complete(&mut self) -> Result<()> {
        match (self.start, self.end) {
            (Some(_), None) => {
                self.end = Some(Local::now());
                Ok(())
            }
            (None, _) => Err(Error::Lifecycle(format!(
                "report '{}' completed before it was started",
                self.name
            ))),
            (Some(_), Some(_)) => Err(Error::Lifecycle(format!(
                "report '{}' already completed",
                self.name
            ))),
        }
    }

    pub fn add_test_case(&mut self, test_case: TestCase) -> Result<()> {
        if self.start.is_none() || self.end.is_some() {
            return Err(Error::Lifecycle(format!(
                "report '{}' is not running, cannot add '{}'",
                self.name,
                test_case.name()
            )));
        }
        if !test_case.status().is_terminal() {
            return Err(Error::Lifecycle(format!(
                "test case '{}' is {} and cannot be reported",
                test_case.name(),
                test_case.status().label()
            )));
        }
        self.test_cases.push(test_case);
        Ok(())
    }

    pub fn get_summary(&self) -> Summary {
        let total = self.test_cases.len();
        let passed = self
            .test_cases
            .iter()
            .filter(|case| case.status() == Status::Passed)
            .count();
        let failed = total - passed;
        let success_rate = if total > 0 {
            passed as f64 * 100.0 / total as f64
        } else {
            0.0
        };
        Summary {
            total,
            passed,
            failed,
            success_rate,
            duration: span(self.start, self.end),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> Option<DateTime<Local>> {
        self.start
    }

    pub fn end_time(&self) -> Option<DateTime<Local>> {
        self.end
    }

    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    pub fn generate_html_report(&self) -> Result<String> {
        html::render(self)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let html_path = dir.join(HTML_REPORT_FILE);
        fs::write(&html_path, self.generate_html_report()?)?;
        fs::write(dir.join(JSON_REPORT_FILE), self.to_json()?)?;
        info!("Report saved to {}", html_path.display());
        Ok(html_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn finished(name: &str, success: bool, error: Option<&str>) -> TestCase {
        let mut case = TestCase::new(name, "");
        case.start().unwrap();
        case.track_step("Enter credentials", "Type phone and password", || Ok(()))
            .unwrap();
        case.complete(success, error.map(str::to_owned)).unwrap();
        case
    }

    fn parse_count(html: &str, class: &str) -> usize {
        let re = Regex::new(&format!(r#"<span class="{}">(\d+)</span>"#, class)).unwrap();
        re.captures(html).unwrap()[1].parse().unwrap()
    }

    #[test]
    fn test_login_scenario_passes() {
        let mut report = TestReport::new("Checkout");
        report.start().unwrap();
        report
            .add_test_case(finished("Login Test", true, None))
            .unwrap();
        report.complete().unwrap();

        let summary = report.get_summary();
        assert_eq!((summary.total, summary.passed, summary.failed), (1, 1, 0));
        assert_eq!(summary.success_rate, 100.0);
    }

    #[test]
    fn test_login_scenario_fails_with_message() {
        let mut report = TestReport::new("Checkout");
        report.start().unwrap();
        report
            .add_test_case(finished("Login Test", false, Some("timeout")))
            .unwrap();
        report.complete().unwrap();

        let summary = report.get_summary();
        assert_eq!((summary.total, summary.passed, summary.failed), (1, 0, 1));
        assert!(report.generate_html_report().unwrap().contains("timeout"));
    }

    #[test]
    fn test_rejects_case_that_is_not_finished() {
        let mut report = TestReport::new("Checkout");
        report.start().unwrap();
        let mut running = TestCase::new("Running", "");
        running.start().unwrap();

        assert!(matches!(
            report.add_test_case(TestCase::new("Idle", "")),
            Err(Error::Lifecycle(_))
        ));
        assert!(matches!(
            report.add_test_case(running),
            Err(Error::Lifecycle(_))
        ));
        assert!(report.test_cases().is_empty());
    }

    #[test]
    fn test_lifecycle_order_is_enforced() {
        let mut report = TestReport::new("Checkout");
        assert!(report.complete().is_err());
        assert!(report
            .add_test_case(finished("Early", true, None))
            .is_err());
        report.start().unwrap();
        assert!(report.start().is_err());
        report.complete().unwrap();
        assert!(report.complete().is_err());
        assert!(report.add_test_case(finished("Late", true, None)).is_err());
    }

    #[test]
    fn test_html_counts_match_summary() {
        let mut report = TestReport::new("Checkout");
        report.start().unwrap();
        for i in 0..5 {
            report
                .add_test_case(finished(&format!("case {}", i), i % 2 == 0, Some("boom")))
                .unwrap();
        }
        report.complete().unwrap();

        let html = report.generate_html_report().unwrap();
        let summary = report.get_summary();
        assert_eq!(parse_count(&html, "total"), 5);
        assert_eq!(parse_count(&html, "passed"), summary.passed);
        assert_eq!(parse_count(&html, "failed"), summary.failed);
        assert_eq!(summary.passed, 3);
    }

    #[test]
    fn test_html_rendering_is_idempotent() {
        let mut report = TestReport::new("Checkout");
        report.start().unwrap();
        report.add_test_case(finished("a", true, None)).unwrap();
        report.add_test_case(finished("b", false, Some("x"))).unwrap();
        report.complete().unwrap();

        assert_eq!(
            report.generate_html_report().unwrap(),
            report.generate_html_report().unwrap()
        );
    }

    #[test]
    fn test_case_interval_nests_in_report() {
        let mut report = TestReport::new("Checkout");
        report.start().unwrap();
        report.add_test_case(finished("a", true, None)).unwrap();
        report.complete().unwrap();

        let case = &report.test_cases()[0];
        assert!(case.start_time().unwrap() >= report.start_time().unwrap());
        assert!(case.end_time().unwrap() <= report.end_time().unwrap());
    }

    #[test]
    fn test_save_writes_html_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = TestReport::new("Checkout");
        report.start().unwrap();
        report.add_test_case(finished("Login Test", true, None)).unwrap();
        report.complete().unwrap();

        let html_path = report.save(dir.path()).unwrap();
        assert!(html_path.ends_with(HTML_REPORT_FILE));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(JSON_REPORT_FILE)).unwrap())
                .unwrap();
        assert_eq!(json["testCases"][0]["name"], "Login Test");
        assert_eq!(json["testCases"][0]["status"], "PASSED");
        assert_eq!(json["testCases"][0]["steps"][0]["name"], "Enter credentials");
    }
}
