use crate::app::error::Result;
use crate::reporter::model::{TestCase, TestStep};
use crate::reporter::report::TestReport;
use chrono::{DateTime, Local};
use serde_derive::Serialize;
use std::path::Path;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ name | escape }}</title>
<style>
body { font-family: sans-serif; margin: 2em; }
.summary span { font-weight: bold; }
.case { border: 1px solid #ccc; margin: 1em 0; padding: 0.5em 1em; }
.case.PASSED { border-left: 6px solid #2e7d32; }
.case.FAILED { border-left: 6px solid #c62828; }
.error { color: #c62828; white-space: pre-wrap; }
table { border-collapse: collapse; width: 100%; }
td, th { border: 1px solid #ddd; padding: 4px 8px; text-align: left; }
</style>
</head>
<body>
<h1>{{ name | escape }}</h1>
<p>Started: {{ start }} &middot; Finished: {{ end }} &middot; Duration: {{ duration }}</p>
<div class="summary">
<p>Total: <span class="total">{{ total }}</span></p>
<p>Passed: <span class="passed">{{ passed }}</span></p>
<p>Failed: <span class="failed">{{ failed }}</span></p>
<p>Success rate: <span class="rate">{{ success_rate }}</span></p>
</div>
{% for case in cases %}<div class="case {{ case.status }}">
<h2>{{ case.name | escape }} &mdash; {{ case.status }} ({{ case.duration }})</h2>
<p>{{ case.description | escape }}</p>
{% if case.error %}<p class="error">{{ case.error | escape }}</p>
{% endif %}{% for shot in case.screenshots %}<p><a href="{{ shot | escape }}">screenshot</a></p>
{% endfor %}<table>
<tr><th>#</th><th>Step</th><th>Description</th><th>Status</th><th>Duration</th><th>Error</th></tr>
{% for step in case.steps %}<tr><td>{{ forloop.index }}</td><td>{{ step.name | escape }}</td><td>{{ step.description | escape }}</td><td>{{ step.status }}</td><td>{{ step.duration }}</td><td class="error">{{ step.error | escape }}</td></tr>
{% endfor %}</table>
</div>
{% endfor %}</body>
</html>
"#;

#[derive(Serialize)]
struct ReportView {
    name: String,
    start: String,
    end: String,
    duration: String,
    total: usize,
    passed: usize,
    failed: usize,
    success_rate: String,
    cases: Vec<CaseView>,
}

#[derive(Serialize)]
struct CaseView {
    name: String,
    description: String,
    status: &'static str,
    duration: String,
    error: Option<String>,
    screenshots: Vec<String>,
    steps: Vec<StepView>,
}

#[derive(Serialize)]
struct StepView {
    name: String,
    description: String,
    status: &'static str,
    duration: String,
    error: String,
}

fn timestamp(time: Option<DateTime<Local>>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_owned())
}

/// Screenshots sit in a folder next to the report, so the link keeps the
/// last two path components.
fn relative_link(path: &Path) -> String {
    let mut parts: Vec<String> = path
        .components()
        .rev()
        .take(2)
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.reverse();
    parts.join("/")
}

fn seconds(duration: std::time::Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

impl From<&TestStep> for StepView {
    fn from(step: &TestStep) -> Self {
        Self {
            name: step.name().to_owned(),
            description: step.description().to_owned(),
            status: step.status().label(),
            duration: seconds(step.duration()),
            error: step.error_message().unwrap_or_default().to_owned(),
        }
    }
}

impl From<&TestCase> for CaseView {
    fn from(case: &TestCase) -> Self {
        Self {
            name: case.name().to_owned(),
            description: case.description().to_owned(),
            status: case.status().label(),
            duration: seconds(case.duration()),
            error: case.error_message().map(str::to_owned),
            screenshots: case
                .attachments()
                .iter()
                .map(|path| relative_link(path))
                .collect(),
            steps: case.steps().iter().map(StepView::from).collect(),
        }
    }
}

pub fn render(report: &TestReport) -> Result<String> {
    let summary = report.get_summary();
    let view = ReportView {
        name: report.name().to_owned(),
        start: timestamp(report.start_time()),
        end: timestamp(report.end_time()),
        duration: seconds(summary.duration),
        total: summary.total,
        passed: summary.passed,
        failed: summary.failed,
        success_rate: format!("{:.1}%", summary.success_rate),
        cases: report.test_cases().iter().map(CaseView::from).collect(),
    };
    let globals = liquid::to_object(&view)?;
    let template = liquid::ParserBuilder::with_stdlib().build()?.parse(TEMPLATE)?;
    Ok(template.render(&globals)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::error::Error;

    #[test]
    fn test_steps_are_nested_under_their_case() {
        let mut report = TestReport::new("Checkout");
        report.start().unwrap();
        let mut case = TestCase::new("Purchase", "Balance payment");
        case.start().unwrap();
        case.track_step("Login", "Login with balance", || Ok(())).unwrap();
        let _ = case.track_step::<(), _>("Pay", "Click pay", || {
            Err(Error::Assertion("popup missing".to_owned()))
        });
        case.complete(false, Some("popup missing".to_owned())).unwrap();
        report.add_test_case(case).unwrap();
        report.complete().unwrap();

        let html = render(&report).unwrap();
        let case_at = html.find("<h2>Purchase").unwrap();
        let login_at = html.find("<td>Login</td>").unwrap();
        let pay_at = html.find("<td>Pay</td>").unwrap();
        assert!(case_at < login_at && login_at < pay_at);
        let pay_row = &html[pay_at..];
        let row_end = pay_row.find("</tr>").unwrap();
        assert!(pay_row[..row_end].contains("<td>FAILED</td>"));
        let login_row = &html[login_at..pay_at];
        assert!(login_row.contains("<td>PASSED</td>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut report = TestReport::new("<script>");
        report.start().unwrap();
        let mut case = TestCase::new("a & b", "");
        case.start().unwrap();
        case.complete(false, Some("<b>bad</b>".to_owned())).unwrap();
        report.add_test_case(case).unwrap();
        report.complete().unwrap();

        let html = render(&report).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("a &amp; b"));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
    }

    #[test]
    fn test_screenshot_links_are_relative() {
        let path = Path::new("reports/Test_Execution_20240101_120000/screenshots/a.png");

        assert_eq!(relative_link(path), "screenshots/a.png");
    }

    #[test]
    fn test_empty_report_renders_zero_counts() {
        let report = TestReport::new("Empty");
        let html = render(&report).unwrap();

        assert!(html.contains(r#"<span class="total">0</span>"#));
        assert!(html.contains("Started: -"));
    }
}
