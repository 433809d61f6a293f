use crate::app::context::{Session, Settle};
use crate::app::error::{Error, Result};
use crate::site::catalog::{Funding, Page};
use crate::site::locators::Target;

fn shows_logged_in_page(url: &str, base_url: &str) -> bool {
    url.contains(Page::PackageOrder.path()) || url.trim_end_matches('/') == base_url
}

/// Logs in with the account of `funding`. A session already logged in as
/// that account is reused; one logged in as anybody else is logged out first.
pub fn login(session: &mut Session, funding: Funding) -> Result<()> {
    let account = session.account(funding);
    session.open(Page::Login)?;
    session.pause(Settle::Medium);

    let url = session.current_url()?;
    if shows_logged_in_page(&url, session.base_url()) {
        if session.logged_in_as() == Some(funding) {
            info!("Already logged in as {}", account.phone);
            return Ok(());
        }
        logout(session)?;
    }

    info!(
        "Logging in as {} ({}, balance {})",
        account.phone,
        funding.describe(),
        account.balance
    );
    session.input_text(Target::PhoneInput, &account.phone)?;
    session.input_text(Target::PasswordInput, &account.password)?;
    session.js_click(Target::LoginButton)?;

    let url_change = session.timeouts().url_change;
    match session.wait_for_url_contains(Page::PackageOrder.path(), url_change) {
        Ok(_) => {
            session.set_logged_in_as(Some(funding));
            session.pause(Settle::Short);
            info!("Login successful");
            Ok(())
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(_) => {
            let presence = session.timeouts().presence;
            if session.is_present(Target::LoginError, presence)? {
                let message = session.text(Target::LoginError)?;
                Err(Error::Login(format!("Login failed: {}", message)))
            } else {
                Err(Error::Login(
                    "Login failed - no redirect to expected page".to_owned(),
                ))
            }
        }
    }
}

pub fn logout(session: &mut Session) -> Result<()> {
    info!("Logging out current account");
    session.js_click(Target::LogoutLink)?;
    let url_change = session.timeouts().url_change;
    session.wait_for_url_contains(Page::Login.path(), url_change)?;
    session.set_logged_in_as(None);
    session.pause(Settle::Short);
    Ok(())
}
