// #![forbid(unsafe_code)]
// #![deny(non_upper_case_globals)]
// #![deny(non_camel_case_types)]
// #![deny(non_snake_case)]
// #![deny(unused_mut)]
// #![deny(unused_variables)]
// #![deny(dead_code)]
// #![deny(unused_imports)]
//#![deny(missing_docs)]
//#![deny(warnings)]

extern crate chrono;
extern crate derivative;
extern crate lazy_static;
extern crate serde_derive;
extern crate uuid;

#[macro_use]
extern crate log;

mod app;
mod configuration;
mod connection;
mod reporter;
mod site;
mod time;

use log::LevelFilter;
use signal_hook::consts::SIGINT;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::exit;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use structopt::StructOpt;

use self::app::error::{Error, Result};
use self::app::job::Suite;
use self::app::App;
use self::site::catalog::Package;
use self::{
    configuration::command_line::{LogLevel, Opt, SuiteChoice},
    configuration::manifest::Manifest,
};

const EXIT_PASSED: i32 = 0;
const EXIT_FAILED: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    let mut options = Opt::from_args();

    init_logging(
        options.logging.take().unwrap_or(LogLevel::Info).into(),
        &options.log_output_file,
    );

    // First SIGINT finishes the current test, a second one terminates.
    let stop = Arc::new(AtomicBool::new(false));
    let registered = signal_hook::flag::register_conditional_shutdown(SIGINT, EXIT_ERROR, stop.clone())
        .and_then(|_| signal_hook::flag::register(SIGINT, stop.clone()));
    if let Err(e) = registered {
        warn!("Cannot register SIGINT handler: {}", e);
    }

    let manifest = match load_manifest(&options) {
        Ok(manifest) => manifest,
        Err(e) => {
            error!("Failed to load manifest file configuration {}", e);
            exit(EXIT_ERROR);
        }
    };
    debug!("Initiated configuration {:#?}", manifest);

    let app = App::new(manifest, stop.clone());
    let code = match options.suite {
        Some(choice) => run_choice(&app, choice, options.package),
        None => run_menu(&app, options.package, &stop),
    };
    exit(code);
}

fn load_manifest(options: &Opt) -> Result<Manifest> {
    let mut manifest = Manifest::load(options.file.clone())?;
    if let Some(environment) = options.environment {
        manifest.environment = environment;
    }
    if let Some(kind) = options.browser {
        manifest.browser.kind = kind;
    }
    if options.headless {
        manifest.browser.headless = true;
    }
    Ok(manifest)
}

fn suites(choice: SuiteChoice, package: Option<Package>) -> Vec<Suite> {
    match choice {
        SuiteChoice::Single => vec![Suite::single()],
        SuiteChoice::PackagePayments => vec![Suite::package_payments(
            package.unwrap_or(Package::DynamicSupreme),
        )],
        SuiteChoice::PersonalCenter => vec![Suite::personal_center(
            package.unwrap_or(Package::StaticIp),
        )],
        SuiteChoice::NoBalance => vec![Suite::no_balance()],
        SuiteChoice::Complete => vec![Suite::complete()],
        SuiteChoice::All => SuiteChoice::MENU[..5]
            .iter()
            .flat_map(|choice| suites(*choice, package))
            .collect(),
    }
}

fn run_choice(app: &App, choice: SuiteChoice, package: Option<Package>) -> i32 {
    if package.is_some() && !choice.takes_package() {
        warn!("--package is ignored by the {:?} suite", choice);
    }
    let mut code = EXIT_PASSED;
    for suite in suites(choice, package) {
        match app.run(&suite) {
            Ok(summary) if summary.failed == 0 => {}
            Ok(_) => code = code.max(EXIT_FAILED),
            Err(Error::Interrupted) => {
                warn!("Stop requested, suite '{}' not started", suite.name);
                return EXIT_ERROR;
            }
            Err(e) => {
                error!("Suite '{}' aborted: {}", suite.name, e);
                return EXIT_ERROR;
            }
        }
    }
    code
}

fn print_menu() {
    println!("{}", "=".repeat(60));
    println!("PAYMENT UI TEST SUITE");
    println!("{}", "=".repeat(60));
    for (index, choice) in SuiteChoice::MENU.iter().enumerate() {
        println!("{}. {}", index + 1, choice.title());
    }
    println!("0. Exit");
}

fn run_menu(app: &App, package: Option<Package>, stop: &AtomicBool) -> i32 {
    print_menu();
    let stdin = io::stdin();
    let mut code = EXIT_PASSED;
    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        print!("\nEnter your choice (0-6): ");
        if let Err(e) = io::stdout().flush() {
            warn!("Cannot flush stdout: {}", e);
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!("Cannot read menu choice: {}", e);
                return EXIT_ERROR;
            }
        }
        if line.trim() == "0" {
            println!("Exiting...");
            break;
        }
        match SuiteChoice::from_menu(&line) {
            Some(choice) => code = code.max(run_choice(app, choice, package)),
            None => println!("Invalid choice. Please enter a number between 0 and 6."),
        }
    }
    code
}

fn init_logging(level: LevelFilter, output: &Option<PathBuf>) {
    let mut dispatcher = fern::Dispatch::new()
        // Perform allocation-free log formatting
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}:{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record
                    .line()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "".to_owned()),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(log_file) = output {
        match fern::log_file(log_file) {
            Ok(file) => dispatcher = dispatcher.chain(file),
            Err(e) => eprintln!("Cannot open log file {}: {}", log_file.display(), e),
        }
    }
    if let Err(e) = dispatcher.apply() {
        eprintln!("Logger already initialized: {}", e);
    }
    info!("Logging level {} enabled", level);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_all_runs_every_menu_suite() {
        let all = suites(SuiteChoice::All, None);
        let names: Vec<&str> = all.iter().map(|suite| suite.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "Single Test",
                "Package Payment Tests - Dynamic Supreme",
                "Personal Center Tests - Static IP",
                "No Balance Tests",
                "Complete Test Suite",
            ]
        );
    }

    #[test]
    fn test_stopped_run_skips_remaining_suites() {
        let mut manifest = Manifest::default();
        manifest.browser.webdriver_url = "http://127.0.0.1:9".to_owned();
        let app = App::new(manifest, Arc::new(AtomicBool::new(true)));

        assert_eq!(run_choice(&app, SuiteChoice::All, None), EXIT_ERROR);
    }

    #[test]
    fn test_package_option_picks_suite_package() {
        let suites = suites(SuiteChoice::PersonalCenter, Some(Package::DynamicDedicated));

        assert_eq!(suites[0].name, "Personal Center Tests - Dynamic Dedicated");
    }
}
