use crate::app::assert::{Assertable, Expectation};
use crate::app::context::{Session, Settle};
use crate::app::error::Result;
use crate::site::catalog::{Funding, Page};
use crate::site::locators::Target;
use crate::site::pages;
use rand::distributions::Alphanumeric;
use rand::Rng;

const ACCOUNT_NAME_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Login(Funding),
    Open(Page),
    Click(Target),
    ClickOpeningWindow(Target),
    /// Clicks the first target when it shows up within the presence probe,
    /// the second one otherwise.
    ClickWithFallback(Target, Target),
    Select(Target, &'static str),
    TypeRandomAccount(Target),
    Pause(Settle),
    SwitchToNewestWindow,
    CloseWindowToMain,
    Expect(Expectation),
}

pub trait Performable {
    fn perform(&self, session: &mut Session) -> Result<()>;
}

pub fn random_account_name() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .map(|c| c.to_ascii_lowercase())
        .take(ACCOUNT_NAME_LEN)
        .collect()
}

impl Performable for Operation {
    fn perform(&self, session: &mut Session) -> Result<()> {
        trace!("Performing {:?}", self);
        match self {
            Operation::Login(funding) => pages::login(session, *funding),
            Operation::Open(page) => session.open(*page),
            Operation::Click(target) => session.click(*target),
            Operation::ClickOpeningWindow(target) => session.click_opening_window(*target),
            Operation::ClickWithFallback(primary, fallback) => {
                let presence = session.timeouts().presence;
                if session.is_present(*primary, presence)? {
                    session.click(*primary)
                } else {
                    info!("{} not found, using fallback {}", primary, fallback);
                    session.click(*fallback)
                }
            }
            Operation::Select(target, value) => session.select_by_value(*target, value),
            Operation::TypeRandomAccount(target) => {
                let name = random_account_name();
                info!("Using account name {}", name);
                session.input_text(*target, &name)
            }
            Operation::Pause(settle) => {
                session.pause(*settle);
                Ok(())
            }
            Operation::SwitchToNewestWindow => session.switch_to_newest_window(),
            Operation::CloseWindowToMain => session.close_window_to_main(),
            Operation::Expect(expectation) => expectation.assert(session),
        }
    }
}
