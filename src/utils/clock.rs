use chrono::{Local, NaiveDateTime};

/// Represents an entity responsible for providing dates across application. This can allow it to
/// be used for testing
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    /// Current moment on the local calendar.
    fn time(&self) -> NaiveDateTime;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that always reports the same moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn time(&self) -> NaiveDateTime {
        self.0
    }
}
