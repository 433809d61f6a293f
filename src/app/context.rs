use crate::app::error::{Error, Result};
use crate::configuration::manifest::{Account, Accounts, Manifest, Pauses, Timeouts};
use crate::connection::wait::Wait;
use crate::connection::webdriver::WebDriverBrowser;
use crate::connection::{Browser, ElementState};
use crate::site::catalog::{Funding, Page};
use crate::site::locators::Target;
use derivative::*;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Short,
    Medium,
    Long,
}

/// The one browser session of a run. Every flow borrows it explicitly; it is
/// quit exactly once, by [`Session::dispose`] or on drop.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Session {
    #[derivative(Debug = "ignore")]
    browser: Box<dyn Browser>,
    base_url: String,
    accounts: Accounts,
    timeouts: Timeouts,
    pauses: Pauses,
    screenshot_dir: Option<PathBuf>,
    logged_in_as: Option<Funding>,
    windows_before_click: Option<usize>,
    disposed: bool,
}

impl Session {
    pub fn new(browser: Box<dyn Browser>, manifest: &Manifest) -> Self {
        Self {
            browser,
            base_url: manifest.base_url(),
            accounts: manifest.accounts.clone(),
            timeouts: manifest.timeouts.clone(),
            pauses: manifest.pauses.clone(),
            screenshot_dir: None,
            logged_in_as: None,
            windows_before_click: None,
            disposed: false,
        }
    }

    pub fn connect(manifest: &Manifest) -> Result<Self> {
        let browser = WebDriverBrowser::connect(&manifest.browser)?;
        Ok(Self::new(Box::new(browser), manifest))
    }

    pub fn set_screenshot_dir(&mut self, dir: PathBuf) {
        self.screenshot_dir = Some(dir);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub fn between_tests(&self) -> Duration {
        self.pauses.between_tests
    }

    pub fn account(&self, funding: Funding) -> Account {
        self.accounts.get(funding).clone()
    }

    pub fn logged_in_as(&self) -> Option<Funding> {
        self.logged_in_as
    }

    pub fn set_logged_in_as(&mut self, funding: Option<Funding>) {
        self.logged_in_as = funding;
    }

    fn wait(&self) -> Wait {
        Wait::new(self.timeouts.element, self.timeouts.poll)
    }

    fn find_matching<P>(&mut self, target: Target, condition: &str, accept: P) -> Result<ElementState>
    where
        P: Fn(&ElementState) -> bool,
    {
        let wait = self.wait();
        let locator = target.locator();
        let browser = &mut self.browser;
        wait.until(&format!("{} of {}", condition, target), || {
            Ok(browser.probe(&locator)?.filter(|state| accept(state)))
        })
    }

    pub fn find_present(&mut self, target: Target) -> Result<ElementState> {
        self.find_matching(target, "presence", |_| true)
    }

    pub fn find_visible(&mut self, target: Target) -> Result<ElementState> {
        self.find_matching(target, "visibility", |state| state.displayed)
    }

    pub fn find_clickable(&mut self, target: Target) -> Result<ElementState> {
        self.find_matching(target, "clickability", ElementState::clickable)
    }

    /// Presence probe bounded by `timeout`; only a timeout reads as absent.
    pub fn is_present(&mut self, target: Target, timeout: Duration) -> Result<bool> {
        let wait = self.wait().with_timeout(timeout);
        let locator = target.locator();
        let browser = &mut self.browser;
        match wait.until(&format!("presence of {}", target), || browser.probe(&locator)) {
            Ok(_) => Ok(true),
            Err(Error::Timeout { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn click(&mut self, target: Target) -> Result<()> {
        self.find_clickable(target)?;
        match self.browser.click(&target.locator()) {
            Ok(()) => Ok(()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("Regular click on {} failed ({}), trying JavaScript click", target, e);
                self.browser.js_click(&target.locator())
            }
        }
    }

    pub fn click_opening_window(&mut self, target: Target) -> Result<()> {
        self.windows_before_click = Some(self.browser.window_count()?);
        self.click(target)
    }

    pub fn js_click(&mut self, target: Target) -> Result<()> {
        self.find_present(target)?;
        self.browser.js_click(&target.locator())
    }

    pub fn input_text(&mut self, target: Target, text: &str) -> Result<()> {
        self.find_visible(target)?;
        self.browser.clear_and_type(&target.locator(), text)
    }

    pub fn text(&mut self, target: Target) -> Result<String> {
        self.find_visible(target).map(|state| state.text)
    }

    pub fn select_by_value(&mut self, target: Target, value: &str) -> Result<()> {
        self.find_present(target)?;
        self.browser.select_by_value(&target.locator(), value)
    }

    pub fn current_url(&mut self) -> Result<String> {
        self.browser.current_url()
    }

    pub fn wait_for_url_contains(&mut self, fragment: &str, timeout: Duration) -> Result<String> {
        let wait = self.wait().with_timeout(timeout);
        let browser = &mut self.browser;
        wait.until(&format!("URL containing '{}'", fragment), || {
            let url = browser.current_url()?;
            Ok(if url.contains(fragment) { Some(url) } else { None })
        })
    }

    pub fn wait_for_page_load(&mut self) -> Result<()> {
        let wait = self.wait();
        let browser = &mut self.browser;
        wait.until("document ready state", || {
            Ok(if browser.ready_state()? == "complete" {
                Some(())
            } else {
                None
            })
        })
    }

    pub fn open(&mut self, page: Page) -> Result<()> {
        let url = page.url(&self.base_url);
        debug!("Navigating to {}", url);
        self.browser.goto(&url)?;
        self.wait_for_page_load()
    }

    /// Waits for the window count to grow past what it was before the last
    /// [`Session::click_opening_window`] and moves to the newest window.
    pub fn switch_to_newest_window(&mut self) -> Result<()> {
        let before = self.windows_before_click.take().unwrap_or(1);
        let wait = self.wait();
        let browser = &mut self.browser;
        let count = wait.until("a new browser window", || {
            let count = browser.window_count()?;
            Ok(if count > before { Some(count) } else { None })
        })?;
        self.browser.switch_to_window(count - 1)
    }

    pub fn close_window_to_main(&mut self) -> Result<()> {
        if self.browser.window_count()? > 1 {
            self.browser.close_window()?;
        }
        self.browser.switch_to_window(0)
    }

    pub fn reset_windows(&mut self) -> Result<()> {
        self.windows_before_click = None;
        self.browser.close_windows_except_main()
    }

    pub fn take_screenshot(&mut self, name: &str) -> Result<PathBuf> {
        let dir = self
            .screenshot_dir
            .clone()
            .ok_or_else(|| Error::Usage("no screenshot directory configured".to_owned()))?;
        std::fs::create_dir_all(&dir)?;
        let file_name: String = name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        let path = dir.join(format!("{}_{}.png", file_name, crate::stamp!()));
        self.browser.screenshot(&path)?;
        info!("Screenshot saved: {}", path.display());
        Ok(path)
    }

    pub fn pause(&self, settle: Settle) {
        let duration = match settle {
            Settle::Short => self.pauses.short,
            Settle::Medium => self.pauses.medium,
            Settle::Long => self.pauses.long,
        };
        sleep(duration);
    }

    pub fn dispose(mut self) -> Result<()> {
        self.disposed = true;
        self.browser.quit()?;
        info!("Browser session closed");
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.disposed {
            if let Err(e) = self.browser.quit() {
                warn!("Error closing browser session: {}", e);
            }
        }
    }
}
