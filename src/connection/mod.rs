pub mod wait;
pub mod webdriver;

#[cfg(test)]
pub mod fake;

use crate::app::error::Result;
use crate::site::locators::Locator;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementState {
    pub displayed: bool,
    pub enabled: bool,
    pub text: String,
}

impl ElementState {
    pub fn clickable(&self) -> bool {
        self.displayed && self.enabled
    }
}

/// Blocking primitives of a WebDriver session. None of them wait: polling
/// lives in [`wait::Wait`] so every lookup shares one timeout policy.
pub trait Browser {
    fn goto(&mut self, url: &str) -> Result<()>;
    fn current_url(&mut self) -> Result<String>;
    fn ready_state(&mut self) -> Result<String>;
    /// `Ok(None)` when nothing matches the locator right now.
    fn probe(&mut self, locator: &Locator) -> Result<Option<ElementState>>;
    fn click(&mut self, locator: &Locator) -> Result<()>;
    fn js_click(&mut self, locator: &Locator) -> Result<()>;
    fn clear_and_type(&mut self, locator: &Locator, text: &str) -> Result<()>;
    fn select_by_value(&mut self, locator: &Locator, value: &str) -> Result<()>;
    fn window_count(&mut self) -> Result<usize>;
    fn switch_to_window(&mut self, index: usize) -> Result<()>;
    fn close_window(&mut self) -> Result<()>;
    fn screenshot(&mut self, path: &Path) -> Result<()>;
    fn quit(&mut self) -> Result<()>;

    fn close_windows_except_main(&mut self) -> Result<()> {
        loop {
            let count = self.window_count()?;
            if count <= 1 {
                break;
            }
            self.switch_to_window(count - 1)?;
            self.close_window()?;
        }
        self.switch_to_window(0)
    }
}
