//! Startup supervision
//!
//! Bring-up failures are returned as values. The supervisor decides, from
//! the configured policy, whether the caller should wait and try the stage
//! again or give up and halt.

use crate::config::ConfigError;
use crate::traits::{DisplayError, TouchError};

/// Bring-up stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupStage {
    Config,
    Display,
    Touch,
    Serial,
    DrawBuffer,
}

/// Fatal initialization failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// Configuration did not parse or validate
    Config(ConfigError),
    /// Display controller did not come up
    Display(DisplayError),
    /// Touch controller did not come up
    Touch(TouchError),
    /// Serial link could not be opened
    Serial,
    /// Draw buffer could not be allocated
    Allocation,
}

impl StartupError {
    /// Stage that produced the error
    pub fn stage(&self) -> StartupStage {
        match self {
            StartupError::Config(_) => StartupStage::Config,
            StartupError::Display(_) => StartupStage::Display,
            StartupError::Touch(_) => StartupStage::Touch,
            StartupError::Serial => StartupStage::Serial,
            StartupError::Allocation => StartupStage::DrawBuffer,
        }
    }
}

impl From<ConfigError> for StartupError {
    fn from(e: ConfigError) -> Self {
        StartupError::Config(e)
    }
}

impl From<DisplayError> for StartupError {
    fn from(e: DisplayError) -> Self {
        StartupError::Display(e)
    }
}

impl From<TouchError> for StartupError {
    fn from(e: TouchError) -> Self {
        StartupError::Touch(e)
    }
}

/// What to do when a stage fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailurePolicy {
    /// Stop on the first failure
    #[default]
    Halt,
    /// Retry a failing stage up to `attempts` more times
    Retry { attempts: u8, delay_ms: u32 },
}

/// Supervisor verdict for a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    /// Wait this many milliseconds, then run the stage again
    Retry(u32),
    /// Give up
    Halt,
}

/// Applies a [`FailurePolicy`] to bring-up failures
///
/// Retries are budgeted per stage: a stage that succeeds resets the count.
#[derive(Debug, Clone)]
pub struct StartupSupervisor {
    policy: FailurePolicy,
    retries: u8,
    last_error: Option<StartupError>,
}

impl StartupSupervisor {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            retries: 0,
            last_error: None,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Retries spent on the current stage
    pub fn retries(&self) -> u8 {
        self.retries
    }

    pub fn last_error(&self) -> Option<StartupError> {
        self.last_error
    }

    /// Record a failure and decide what happens next
    pub fn on_failure(&mut self, error: StartupError) -> Decision {
        self.last_error = Some(error);
        match self.policy {
            FailurePolicy::Retry { attempts, delay_ms } if self.retries < attempts => {
                self.retries += 1;
                Decision::Retry(delay_ms)
            }
            _ => Decision::Halt,
        }
    }

    /// Record that the current stage came up
    pub fn on_success(&mut self) {
        self.retries = 0;
    }

    /// Run a stage until it succeeds or the policy says halt
    ///
    /// # Arguments
    /// - `stage`: Attempts the stage once
    /// - `wait`: Blocks for the given number of milliseconds between attempts
    pub fn run<T, F, W>(&mut self, mut stage: F, mut wait: W) -> Result<T, StartupError>
    where
        F: FnMut() -> Result<T, StartupError>,
        W: FnMut(u32),
    {
        loop {
            match stage() {
                Ok(value) => {
                    self.on_success();
                    return Ok(value);
                }
                Err(e) => match self.on_failure(e) {
                    Decision::Retry(delay_ms) => wait(delay_ms),
                    Decision::Halt => return Err(e),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[test]
    fn test_halt_policy() {
        let mut sup = StartupSupervisor::new(FailurePolicy::Halt);
        let err = StartupError::Display(DisplayError::Communication);
        assert_eq!(sup.on_failure(err), Decision::Halt);
        assert_eq!(sup.last_error(), Some(err));
    }

    #[test]
    fn test_retry_budget() {
        let mut sup = StartupSupervisor::new(FailurePolicy::Retry {
            attempts: 2,
            delay_ms: 250,
        });
        let err = StartupError::Touch(TouchError::Bus);

        assert_eq!(sup.on_failure(err), Decision::Retry(250));
        assert_eq!(sup.on_failure(err), Decision::Retry(250));
        assert_eq!(sup.on_failure(err), Decision::Halt);
    }

    #[test]
    fn test_success_resets_budget() {
        let mut sup = StartupSupervisor::new(FailurePolicy::Retry {
            attempts: 1,
            delay_ms: 10,
        });
        let err = StartupError::Serial;

        assert_eq!(sup.on_failure(err), Decision::Retry(10));
        sup.on_success();
        assert_eq!(sup.retries(), 0);
        assert_eq!(sup.on_failure(err), Decision::Retry(10));
    }

    #[test]
    fn test_run_retries_then_succeeds() {
        let mut sup = StartupSupervisor::new(FailurePolicy::Retry {
            attempts: 3,
            delay_ms: 100,
        });
        let mut calls = 0;
        let mut waits = Vec::new();

        let result = sup.run(
            || {
                calls += 1;
                if calls < 3 {
                    Err(StartupError::Touch(TouchError::Bus))
                } else {
                    Ok(calls)
                }
            },
            |ms| waits.push(ms),
        );

        assert_eq!(result, Ok(3));
        assert_eq!(waits, [100, 100]);
        assert_eq!(sup.retries(), 0);
    }

    #[test]
    fn test_run_halts_with_last_error() {
        let mut sup = StartupSupervisor::new(FailurePolicy::Halt);
        let result: Result<(), _> = sup.run(|| Err(StartupError::Allocation), |_| {});
        let err = result.unwrap_err();
        assert_eq!(err, StartupError::Allocation);
        assert_eq!(err.stage(), StartupStage::DrawBuffer);
    }
}
