use crate::app::error::{Error, Result};
use crate::configuration::manifest::{BrowserKind, BrowserSettings};
use crate::connection::{Browser, ElementState};
use crate::site::locators::{Locator, Strategy};
use std::path::Path;
use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;
use thirtyfour::{Capabilities, ChromiumLikeCapabilities};
use tokio::runtime::Runtime;

const SESSION_LOST_MARKERS: [&str; 4] = [
    "invalid session id",
    "session deleted",
    "error sending request",
    "Connection refused",
];

/// [`Browser`] backed by a remote WebDriver server (chromedriver,
/// geckodriver, msedgedriver). The async client runs on a private
/// current-thread runtime and every call blocks until it resolves.
pub struct WebDriverBrowser {
    runtime: Runtime,
    driver: Option<WebDriver>,
}

fn command_error(e: WebDriverError) -> Error {
    let message = e.to_string();
    if SESSION_LOST_MARKERS.iter().any(|m| message.contains(m)) {
        Error::Session(message)
    } else {
        Error::WebDriver(message)
    }
}

fn by(locator: &Locator) -> By {
    match locator.strategy {
        Strategy::Id => By::Id(locator.value.as_str()),
        Strategy::XPath => By::XPath(locator.value.as_str()),
    }
}

fn capabilities(settings: &BrowserSettings) -> WebDriverResult<Capabilities> {
    let window_size = format!(
        "--window-size={},{}",
        settings.window.width, settings.window.height
    );
    let caps = match settings.kind {
        BrowserKind::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            if settings.headless {
                caps.add_arg("--headless")?;
            }
            for arg in [
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--disable-blink-features=AutomationControlled",
                window_size.as_str(),
            ]
            .iter()
            {
                caps.add_arg(arg)?;
            }
            caps.add_experimental_option("excludeSwitches", vec!["enable-automation"])?;
            caps.add_experimental_option("useAutomationExtension", false)?;
            caps.into()
        }
        BrowserKind::Edge => {
            let mut caps = DesiredCapabilities::edge();
            if settings.headless {
                caps.add_arg("--headless")?;
            }
            for arg in ["--no-sandbox", "--disable-dev-shm-usage", window_size.as_str()].iter() {
                caps.add_arg(arg)?;
            }
            caps.into()
        }
        BrowserKind::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if settings.headless {
                caps.set_headless()?;
            }
            caps.into()
        }
    };
    Ok(caps)
}

async fn configure(driver: &WebDriver, settings: &BrowserSettings) -> WebDriverResult<()> {
    if settings.window.maximize {
        driver.maximize_window().await?;
    }
    driver.set_page_load_timeout(settings.page_load_timeout).await?;
    driver.set_script_timeout(settings.script_timeout).await?;
    if settings.kind == BrowserKind::Chrome {
        driver
            .execute(
                "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})",
                Vec::new(),
            )
            .await?;
    }
    Ok(())
}

async fn probe_first(driver: &WebDriver, by: By) -> WebDriverResult<Option<ElementState>> {
    let element = match driver.find_all(by).await?.into_iter().next() {
        Some(element) => element,
        None => return Ok(None),
    };
    Ok(Some(ElementState {
        displayed: element.is_displayed().await?,
        enabled: element.is_enabled().await?,
        text: element.text().await?,
    }))
}

async fn click(driver: &WebDriver, by: By) -> WebDriverResult<()> {
    driver.find(by).await?.click().await
}

async fn js_click(driver: &WebDriver, by: By) -> WebDriverResult<()> {
    let element = driver.find(by).await?;
    driver
        .execute("arguments[0].click();", vec![element.to_json()?])
        .await?;
    Ok(())
}

async fn clear_and_type(driver: &WebDriver, by: By, text: &str) -> WebDriverResult<()> {
    let element = driver.find(by).await?;
    element.clear().await?;
    element.send_keys(text).await
}

async fn select_by_value(driver: &WebDriver, by: By, value: &str) -> WebDriverResult<()> {
    let element = driver.find(by).await?;
    SelectElement::new(&element).await?.select_by_value(value).await
}

impl WebDriverBrowser {
    pub fn connect(settings: &BrowserSettings) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let caps = capabilities(settings).map_err(|e| Error::Session(e.to_string()))?;
        let driver = runtime
            .block_on(WebDriver::new(settings.webdriver_url.as_str(), caps))
            .map_err(|e| Error::Session(format!("{} ({})", e, settings.webdriver_url)))?;
        let configured = runtime.block_on(configure(&driver, settings));
        let browser = Self {
            runtime,
            driver: Some(driver),
        };
        configured.map_err(|e| Error::Session(e.to_string()))?;
        info!(
            "Successfully created {:?} WebDriver session via {}",
            settings.kind, settings.webdriver_url
        );
        Ok(browser)
    }

    fn driver(&self) -> Result<&WebDriver> {
        self.driver
            .as_ref()
            .ok_or_else(|| Error::Session("browser session already closed".to_owned()))
    }
}

impl Browser for WebDriverBrowser {
    fn goto(&mut self, url: &str) -> Result<()> {
        let driver = self.driver()?;
        self.runtime.block_on(driver.goto(url)).map_err(command_error)
    }

    fn current_url(&mut self) -> Result<String> {
        let driver = self.driver()?;
        self.runtime
            .block_on(driver.current_url())
            .map(|url| url.to_string())
            .map_err(command_error)
    }

    fn ready_state(&mut self) -> Result<String> {
        let driver = self.driver()?;
        let ret = self
            .runtime
            .block_on(driver.execute("return document.readyState;", Vec::new()))
            .map_err(command_error)?;
        Ok(ret.json().as_str().unwrap_or_default().to_owned())
    }

    fn probe(&mut self, locator: &Locator) -> Result<Option<ElementState>> {
        let driver = self.driver()?;
        self.runtime
            .block_on(probe_first(driver, by(locator)))
            .map_err(command_error)
    }

    fn click(&mut self, locator: &Locator) -> Result<()> {
        let driver = self.driver()?;
        self.runtime
            .block_on(click(driver, by(locator)))
            .map_err(command_error)
    }

    fn js_click(&mut self, locator: &Locator) -> Result<()> {
        let driver = self.driver()?;
        self.runtime
            .block_on(js_click(driver, by(locator)))
            .map_err(command_error)
    }

    fn clear_and_type(&mut self, locator: &Locator, text: &str) -> Result<()> {
        let driver = self.driver()?;
        self.runtime
            .block_on(clear_and_type(driver, by(locator), text))
            .map_err(command_error)
    }

    fn select_by_value(&mut self, locator: &Locator, value: &str) -> Result<()> {
        let driver = self.driver()?;
        self.runtime
            .block_on(select_by_value(driver, by(locator), value))
            .map_err(command_error)
    }

    fn window_count(&mut self) -> Result<usize> {
        let driver = self.driver()?;
        self.runtime
            .block_on(driver.windows())
            .map(|handles| handles.len())
            .map_err(command_error)
    }

    fn switch_to_window(&mut self, index: usize) -> Result<()> {
        let driver = self.driver()?;
        let handles = self.runtime.block_on(driver.windows()).map_err(command_error)?;
        let handle = handles.get(index).cloned().ok_or_else(|| {
            Error::WebDriver(format!(
                "no window with index {} ({} open)",
                index,
                handles.len()
            ))
        })?;
        self.runtime
            .block_on(driver.switch_to_window(handle))
            .map_err(command_error)
    }

    fn close_window(&mut self) -> Result<()> {
        let driver = self.driver()?;
        self.runtime
            .block_on(driver.close_window())
            .map_err(command_error)
    }

    fn screenshot(&mut self, path: &Path) -> Result<()> {
        let driver = self.driver()?;
        self.runtime
            .block_on(driver.screenshot(path))
            .map_err(command_error)
    }

    fn quit(&mut self) -> Result<()> {
        match self.driver.take() {
            Some(driver) => self
                .runtime
                .block_on(driver.quit())
                .map_err(command_error),
            None => Ok(()),
        }
    }
}

impl Drop for WebDriverBrowser {
    fn drop(&mut self) {
        if let Err(e) = self.quit() {
            warn!("Error quitting WebDriver: {}", e);
        }
    }
}
