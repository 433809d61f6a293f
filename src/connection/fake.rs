use crate::app::error::{Error, Result};
use crate::connection::{Browser, ElementState};
use crate::site::locators::Locator;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum Effect {
    Navigate(String),
    Show(Locator, String),
    OpenWindow(String),
    LoseSession,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub windows: Vec<String>,
    pub current: usize,
    pub elements: HashMap<String, ElementState>,
    pub on_click: HashMap<String, Vec<Effect>>,
    pub broken_clicks: HashSet<String>,
    pub redirects: HashMap<String, String>,
    pub journal: Vec<String>,
    pub lost: bool,
    pub quit: bool,
}

impl FakeState {
    fn url(&self) -> String {
        self.windows.get(self.current).cloned().unwrap_or_default()
    }

    fn alive(&self) -> Result<()> {
        if self.lost {
            Err(Error::Session("invalid session id".to_owned()))
        } else {
            Ok(())
        }
    }

    fn require(&self, locator: &Locator) -> Result<()> {
        self.alive()?;
        if self.elements.contains_key(&locator.to_string()) {
            Ok(())
        } else {
            Err(Error::WebDriver(format!("no such element: {}", locator)))
        }
    }

    fn apply(&mut self, locator: &Locator) {
        let effects = self
            .on_click
            .get(&locator.to_string())
            .cloned()
            .unwrap_or_default();
        for effect in effects {
            match effect {
                Effect::Navigate(url) => self.windows[self.current] = url,
                Effect::Show(target, text) => {
                    self.elements.insert(
                        target.to_string(),
                        ElementState {
                            displayed: true,
                            enabled: true,
                            text,
                        },
                    );
                }
                Effect::OpenWindow(url) => self.windows.push(url),
                Effect::LoseSession => self.lost = true,
            }
        }
    }
}

/// Scripted in-memory page. Clones share state, so a test keeps one handle
/// while the session owns the other.
#[derive(Clone, Default)]
pub struct FakeBrowser {
    state: Rc<RefCell<FakeState>>,
}

impl FakeBrowser {
    pub fn new(url: &str) -> Self {
        let browser = Self::default();
        browser.state.borrow_mut().windows.push(url.to_owned());
        browser
    }

    pub fn element(&self, locator: &Locator, text: &str) -> &Self {
        self.state.borrow_mut().elements.insert(
            locator.to_string(),
            ElementState {
                displayed: true,
                enabled: true,
                text: text.to_owned(),
            },
        );
        self
    }

    pub fn hidden(&self, locator: &Locator) -> &Self {
        self.state
            .borrow_mut()
            .elements
            .insert(locator.to_string(), ElementState::default());
        self
    }

    pub fn on_click(&self, locator: &Locator, effect: Effect) -> &Self {
        self.state
            .borrow_mut()
            .on_click
            .entry(locator.to_string())
            .or_default()
            .push(effect);
        self
    }

    pub fn redirect(&self, from: &str, to: &str) -> &Self {
        self.state
            .borrow_mut()
            .redirects
            .insert(from.to_owned(), to.to_owned());
        self
    }

    pub fn break_regular_click(&self, locator: &Locator) -> &Self {
        self.state
            .borrow_mut()
            .broken_clicks
            .insert(locator.to_string());
        self
    }

    pub fn open_window(&self, url: &str) -> &Self {
        self.state.borrow_mut().windows.push(url.to_owned());
        self
    }

    pub fn open_windows(&self) -> usize {
        self.state.borrow().windows.len()
    }

    pub fn journal(&self) -> Vec<String> {
        self.state.borrow().journal.clone()
    }

    pub fn current_window(&self) -> usize {
        self.state.borrow().current
    }

    pub fn is_quit(&self) -> bool {
        self.state.borrow().quit
    }

    fn record(&self, entry: String) {
        self.state.borrow_mut().journal.push(entry);
    }
}

impl Browser for FakeBrowser {
    fn goto(&mut self, url: &str) -> Result<()> {
        self.state.borrow().alive()?;
        self.record(format!("goto {}", url));
        let mut state = self.state.borrow_mut();
        let current = state.current;
        let landed = state.redirects.get(url).cloned().unwrap_or_else(|| url.to_owned());
        state.windows[current] = landed;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String> {
        let state = self.state.borrow();
        state.alive()?;
        Ok(state.url())
    }

    fn ready_state(&mut self) -> Result<String> {
        Ok("complete".to_owned())
    }

    fn probe(&mut self, locator: &Locator) -> Result<Option<ElementState>> {
        let state = self.state.borrow();
        state.alive()?;
        Ok(state.elements.get(&locator.to_string()).cloned())
    }

    fn click(&mut self, locator: &Locator) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.require(locator)?;
        if state.broken_clicks.contains(&locator.to_string()) {
            return Err(Error::WebDriver(format!(
                "element click intercepted: {}",
                locator
            )));
        }
        state.journal.push(format!("click {}", locator));
        state.apply(locator);
        Ok(())
    }

    fn js_click(&mut self, locator: &Locator) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.require(locator)?;
        state.journal.push(format!("js_click {}", locator));
        state.apply(locator);
        Ok(())
    }

    fn clear_and_type(&mut self, locator: &Locator, text: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.require(locator)?;
        state.journal.push(format!("type {} {}", locator, text));
        Ok(())
    }

    fn select_by_value(&mut self, locator: &Locator, value: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.require(locator)?;
        state.journal.push(format!("select {} {}", locator, value));
        Ok(())
    }

    fn window_count(&mut self) -> Result<usize> {
        let state = self.state.borrow();
        state.alive()?;
        Ok(state.windows.len())
    }

    fn switch_to_window(&mut self, index: usize) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if index >= state.windows.len() {
            return Err(Error::WebDriver(format!("no window with index {}", index)));
        }
        state.current = index;
        Ok(())
    }

    fn close_window(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let current = state.current;
        state.windows.remove(current);
        state.journal.push(format!("close window {}", current));
        Ok(())
    }

    fn screenshot(&mut self, path: &Path) -> Result<()> {
        self.state.borrow().alive()?;
        std::fs::write(path, b"\x89PNG")?;
        self.record(format!("screenshot {}", path.display()));
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        self.state.borrow_mut().quit = true;
        Ok(())
    }
}
