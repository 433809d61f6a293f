use crate::app::error::{Error, Result};
use crate::configuration::constants::common::{DEFAULT_REPORT_DIR, DEFAULT_WEBDRIVER_URL};
use crate::site::catalog::{Environment, Funding};
use config::{Config, File};
use derivative::*;
use serde_derive::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Edge,
}

impl Default for BrowserKind {
    fn default() -> Self {
        BrowserKind::Chrome
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "chrome" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            "edge" => Ok(BrowserKind::Edge),
            _ => Err(Error::Usage(format!("Unsupported browser: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub maximize: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            maximize: true,
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub kind: BrowserKind,
    pub headless: bool,
    pub webdriver_url: String,
    pub window: WindowSettings,
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub page_load_timeout: Duration,
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub script_timeout: Duration,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            kind: BrowserKind::default(),
            headless: false,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_owned(),
            window: WindowSettings::default(),
            page_load_timeout: Duration::from_secs(30),
            script_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub element: Duration,
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub poll: Duration,
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub presence: Duration,
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub url_change: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            element: Duration::from_secs(20),
            poll: Duration::from_millis(500),
            presence: Duration::from_secs(5),
            url_change: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Pauses {
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub short: Duration,
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub medium: Duration,
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub long: Duration,
    #[serde(deserialize_with = "crate::configuration::deserialize::duration::deserialize")]
    pub between_tests: Duration,
}

impl Default for Pauses {
    fn default() -> Self {
        Self {
            short: Duration::from_secs(1),
            medium: Duration::from_secs(2),
            long: Duration::from_secs(5),
            between_tests: Duration::from_secs(3),
        }
    }
}

impl Pauses {
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            short: Duration::default(),
            medium: Duration::default(),
            long: Duration::default(),
            between_tests: Duration::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub dir: PathBuf,
    pub screenshots_on_failure: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_REPORT_DIR),
            screenshots_on_failure: true,
        }
    }
}

#[derive(Clone, Deserialize, Derivative)]
#[derivative(Debug)]
pub struct Account {
    pub phone: String,
    #[derivative(Debug = "ignore")]
    pub password: String,
    #[serde(default)]
    pub balance: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Accounts {
    pub funded: Account,
    pub unfunded: Account,
}

impl Default for Accounts {
    fn default() -> Self {
        Self {
            funded: Account {
                phone: "15332595364".to_owned(),
                password: "Test@123".to_owned(),
                balance: "1000.00".to_owned(),
            },
            unfunded: Account {
                phone: "15658873355".to_owned(),
                password: "Test@123".to_owned(),
                balance: "0.00".to_owned(),
            },
        }
    }
}

impl Accounts {
    pub fn get(&self, funding: Funding) -> &Account {
        match funding {
            Funding::Funded => &self.funded,
            Funding::Unfunded => &self.unfunded,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub name: String,
    pub environment: Environment,
    pub base_url: Option<String>,
    pub browser: BrowserSettings,
    pub timeouts: Timeouts,
    pub pauses: Pauses,
    pub report: ReportSettings,
    pub accounts: Accounts,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            name: "Payment UI Test Suite".to_owned(),
            environment: Environment::default(),
            base_url: None,
            browser: BrowserSettings::default(),
            timeouts: Timeouts::default(),
            pauses: Pauses::default(),
            report: ReportSettings::default(),
            accounts: Accounts::default(),
        }
    }
}

impl Manifest {
    pub fn from(file: PathBuf) -> Result<Self> {
        let config = Config::builder().add_source(File::from(file)).build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn load(file: Option<PathBuf>) -> Result<Self> {
        match file {
            Some(file) => Self::from(file),
            None => Ok(Self::default()),
        }
    }

    /// Explicit `base_url` wins over the environment's default host.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => self.environment.default_base_url().to_owned(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let manifest = Manifest::load(None).unwrap();

        assert_eq!(manifest.environment, Environment::Test);
        assert_eq!(
            manifest.base_url(),
            "https://test-ip-tianqi.cd.xiaoxigroup.net"
        );
        assert_eq!(manifest.timeouts.element, Duration::from_secs(20));
        assert_eq!(manifest.timeouts.poll, Duration::from_millis(500));
        assert_eq!(manifest.browser.webdriver_url, "http://localhost:9515");
        assert_eq!(manifest.accounts.get(Funding::Funded).phone, "15332595364");
        assert_eq!(manifest.accounts.get(Funding::Unfunded).balance, "0.00");
    }

    #[test]
    fn test_yaml_manifest_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "name: nightly\nenvironment: staging\nbrowser:\n  kind: firefox\n  headless: true\ntimeouts:\n  element: 5s\n"
        )
        .unwrap();

        let manifest = Manifest::from(file.path().to_path_buf()).unwrap();

        assert_eq!(manifest.name, "nightly");
        assert_eq!(manifest.environment, Environment::Staging);
        assert_eq!(manifest.browser.kind, BrowserKind::Firefox);
        assert!(manifest.browser.headless);
        assert_eq!(manifest.timeouts.element, Duration::from_secs(5));
        assert_eq!(manifest.timeouts.poll, Duration::from_millis(500));
        assert_eq!(manifest.accounts.funded.password, "Test@123");
    }

    #[test]
    fn test_base_url_override_is_trimmed() {
        let manifest = Manifest {
            base_url: Some("http://localhost:8080/".to_owned()),
            ..Manifest::default()
        };

        assert_eq!(manifest.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_unknown_browser_is_rejected() {
        assert_eq!("Edge".parse::<BrowserKind>().unwrap(), BrowserKind::Edge);
        assert!(matches!("safari".parse::<BrowserKind>(), Err(Error::Usage(_))));
    }
}
