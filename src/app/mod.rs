pub(crate) mod assert;
pub(crate) mod context;
pub(crate) mod error;
pub(crate) mod executor;
pub(crate) mod job;
pub(crate) mod operation;

use crate::app::context::Session;
use crate::app::error::{Error, Result};
use crate::app::executor::Executor;
use crate::app::job::Suite;
use crate::configuration::constants::common::{EXECUTION_DIR_PREFIX, SCREENSHOTS_DIR};
use crate::configuration::manifest::Manifest;
use crate::reporter::{Summary, TestReport};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct App {
    manifest: Manifest,
    stop: Arc<AtomicBool>,
}

impl App {
    pub fn new(manifest: Manifest, stop: Arc<AtomicBool>) -> Self {
        App { manifest, stop }
    }

    pub fn run(&self, suite: &Suite) -> Result<Summary> {
        if self.stop.load(Ordering::Relaxed) {
            return Err(Error::Interrupted);
        }
        info!("Starting suite '{}' against {}", suite.name, self.manifest.base_url());
        let dir = self.execution_dir();
        let session = Session::connect(&self.manifest)?;
        self.run_with(session, suite, &dir)
    }

    fn execution_dir(&self) -> PathBuf {
        self.manifest
            .report
            .dir
            .join(format!("{}{}", EXECUTION_DIR_PREFIX, crate::stamp!()))
    }

    fn run_with(&self, mut session: Session, suite: &Suite, dir: &Path) -> Result<Summary> {
        info!("Registered {} tests", suite.len());
        session.set_screenshot_dir(dir.join(SCREENSHOTS_DIR));
        let mut report = TestReport::new(&suite.name);
        report.start()?;

        let outcome = Executor::new(
            &mut session,
            self.manifest.report.screenshots_on_failure,
            self.stop.clone(),
        )
        .run(suite, &mut report);

        report.complete()?;
        let summary = report.get_summary();
        info!("Test suite completed:");
        info!("  Total tests: {}", summary.total);
        info!("  Passed: {}", summary.passed);
        info!("  Failed: {}", summary.failed);
        info!("  Success rate: {:.1}%", summary.success_rate);
        info!("  Duration: {:?}", summary.duration);
        let html = report.save(dir)?;
        info!("Report generated: {}", html.display());

        if let Err(e) = session.dispose() {
            warn!("Error closing browser session: {}", e);
        }
        outcome.map(|_| summary)
    }
}
