//! Process-wide "current time" provider.
//!
//! The provider is installed once at start-up; later calls to [`init`] are
//! ignored. Until then [`now`] reads the system clock.

use chrono::{DateTime, Utc};
use std::sync::OnceLock;

pub type Clock = fn() -> DateTime<Utc>;

static CLOCK: OnceLock<Clock> = OnceLock::new();

/// Installs `clock`. Returns `false` if a clock was already installed.
pub fn init(clock: Clock) -> bool {
    CLOCK.set(clock).is_ok()
}

pub fn now() -> DateTime<Utc> {
    CLOCK.get().map_or_else(Utc::now, |clock| clock())
}
