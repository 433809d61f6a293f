use crate::app::error::Error;
use crate::configuration::constants::cargo_env::CARGO_PKG_NAME;
use crate::configuration::manifest::BrowserKind;
use crate::site::catalog::{Environment, Package};
use clap::arg_enum;
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;

arg_enum! {
    #[derive(Debug)]
    pub enum LogLevel {
        Off, Error, Warn, Info, Debug, Trace,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteChoice {
    Single,
    PackagePayments,
    PersonalCenter,
    NoBalance,
    Complete,
    All,
}

impl SuiteChoice {
    pub const MENU: [SuiteChoice; 6] = [
        SuiteChoice::Single,
        SuiteChoice::PackagePayments,
        SuiteChoice::PersonalCenter,
        SuiteChoice::NoBalance,
        SuiteChoice::Complete,
        SuiteChoice::All,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SuiteChoice::Single => "Run single test (Dynamic Supreme + Balance)",
            SuiteChoice::PackagePayments => "Run all payment methods for a package",
            SuiteChoice::PersonalCenter => "Run personal center payments for a package",
            SuiteChoice::NoBalance => "Run no balance scenarios",
            SuiteChoice::Complete => "Run complete test suite",
            SuiteChoice::All => "Run all of the above",
        }
    }

    pub fn takes_package(self) -> bool {
        matches!(
            self,
            SuiteChoice::PackagePayments | SuiteChoice::PersonalCenter
        )
    }

    pub fn from_menu(input: &str) -> Option<SuiteChoice> {
        match input.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= SuiteChoice::MENU.len() => Some(SuiteChoice::MENU[n - 1]),
            _ => None,
        }
    }
}

impl FromStr for SuiteChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(SuiteChoice::Single),
            "package-payments" => Ok(SuiteChoice::PackagePayments),
            "personal-center" => Ok(SuiteChoice::PersonalCenter),
            "no-balance" => Ok(SuiteChoice::NoBalance),
            "complete" => Ok(SuiteChoice::Complete),
            "all" => Ok(SuiteChoice::All),
            _ => Err(Error::Usage(format!("Unknown suite: {}", s))),
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = CARGO_PKG_NAME)]
pub struct Opt {
    /// Set a custom configuration file. Supported: YAML, JSON, TOML, HJSON
    #[structopt(parse(from_os_str))]
    pub file: Option<PathBuf>,

    /// Sets a logging level
    #[structopt(case_insensitive = true, long, short = "L", possible_values = &LogLevel::variants(), env = "LOG_LEVEL")]
    pub logging: Option<LogLevel>,

    /// File to which application will write logs
    #[structopt(long, short = "O", env = "LOG_OUTPUT_FILE")]
    pub log_output_file: Option<PathBuf>,

    /// Target environment: test, staging or prod
    #[structopt(long, short = "e")]
    pub environment: Option<Environment>,

    /// Browser to drive: chrome, firefox or edge
    #[structopt(long, short = "b")]
    pub browser: Option<BrowserKind>,

    /// Run the browser without a window
    #[structopt(long)]
    pub headless: bool,

    /// Suite to run without the interactive menu: single, package-payments,
    /// personal-center, no-balance, complete or all
    #[structopt(long, short = "s")]
    pub suite: Option<SuiteChoice>,

    /// Package for the package-payments and personal-center suites
    #[structopt(long, short = "p")]
    pub package: Option<Package>,
}

impl Into<LevelFilter> for LogLevel {
    fn into(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
