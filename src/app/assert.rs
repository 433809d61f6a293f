use crate::app::context::Session;
use crate::app::error::{Error, Result};
use crate::site::locators::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    UrlContains(&'static str),
    Visible(Target),
}

pub trait Assertable {
    fn assert(&self, session: &mut Session) -> Result<()>;
}

impl Assertable for Expectation {
    fn assert(&self, session: &mut Session) -> Result<()> {
        trace!("Checking expectation {:?}", self);
        match *self {
            Expectation::UrlContains(fragment) => {
                let timeout = session.timeouts().url_change;
                match session.wait_for_url_contains(fragment, timeout) {
                    Ok(url) => {
                        debug!("URL {} contains '{}'", url, fragment);
                        Ok(())
                    }
                    Err(Error::Timeout { .. }) => Err(Error::Assertion(format!(
                        "expected URL containing '{}', got {}",
                        fragment,
                        session.current_url()?
                    ))),
                    Err(e) => Err(e),
                }
            }
            Expectation::Visible(target) => {
                let state = session.find_visible(target)?;
                debug!("{} is visible: '{}'", target, state.text);
                Ok(())
            }
        }
    }
}
