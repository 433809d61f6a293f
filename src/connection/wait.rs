use crate::app::error::{Error, Result};
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Bounded polling: the probe runs at least once, then every `poll` until it
/// yields a value or `timeout` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wait {
    pub timeout: Duration,
    pub poll: Duration,
}

impl Wait {
    pub fn new(timeout: Duration, poll: Duration) -> Self {
        Self { timeout, poll }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn until<T, F>(&self, what: &str, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Result<Option<T>>,
    {
        let started = Instant::now();
        loop {
            if let Some(value) = probe()? {
                return Ok(value);
            }
            let elapsed = started.elapsed();
            if elapsed >= self.timeout {
                trace!("Gave up on {} after {:?}", what, elapsed);
                return Err(Error::Timeout {
                    what: what.to_owned(),
                    after: self.timeout,
                });
            }
            sleep(self.poll.min(self.timeout - elapsed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_as_soon_as_probe_yields() {
        let wait = Wait::new(Duration::from_secs(1), Duration::from_millis(1));
        let mut calls = 0;
        let value = wait
            .until("third probe", || {
                calls += 1;
                Ok(if calls == 3 { Some(calls) } else { None })
            })
            .unwrap();

        assert_eq!(value, 3);
    }

    #[test]
    fn test_zero_timeout_probes_once() {
        let wait = Wait::new(Duration::from_secs(0), Duration::from_millis(500));
        let mut calls = 0;
        let result: Result<()> = wait.until("nothing", || {
            calls += 1;
            Ok(None)
        });

        assert_eq!(calls, 1);
        match result {
            Err(Error::Timeout { what, after }) => {
                assert_eq!(what, "nothing");
                assert_eq!(after, Duration::from_secs(0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_probe_errors_are_not_retried() {
        let wait = Wait::new(Duration::from_secs(1), Duration::from_millis(1));
        let mut calls = 0;
        let result: Result<()> = wait.until("broken", || {
            calls += 1;
            Err(Error::WebDriver("stale element".to_owned()))
        });

        assert!(matches!(result, Err(Error::WebDriver(_))));
        assert_eq!(calls, 1);
    }
}
