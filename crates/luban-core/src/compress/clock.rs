//! Wall-clock timing that also works on `wasm32-unknown-unknown`, where
//! `std::time::Instant::now` panics.

use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
pub(crate) struct Stopwatch(std::time::Instant);

#[cfg(not(target_arch = "wasm32"))]
impl Stopwatch {
    pub(crate) fn start() -> Self {
        Self(std::time::Instant::now())
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) struct Stopwatch(f64);

#[cfg(target_arch = "wasm32")]
impl Stopwatch {
    pub(crate) fn start() -> Self {
        Self(js_sys::Date::now())
    }

    pub(crate) fn elapsed(&self) -> Duration {
        let millis = (js_sys::Date::now() - self.0).max(0.0);
        Duration::from_secs_f64(millis / 1000.0)
    }
}
