//! Sustained-press detection

use std::time::{Duration, Instant};

/// How long a press must be held to count as a long press
pub const LONG_PRESS: Duration = Duration::from_millis(500);

/// A press on one image that has not been released yet
#[derive(Debug, Clone)]
pub struct PressGesture {
    url: String,
    started: Instant,
    fired: bool,
}

impl PressGesture {
    #[must_use]
    pub const fn start(url: String, at: Instant) -> Self {
        Self {
            url,
            started: at,
            fired: false,
        }
    }

    /// Url of the pressed image
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the press has been held long enough at `now`
    #[must_use]
    pub fn is_long(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= LONG_PRESS
    }

    /// Timer tick while still pressed. Yields the url once, the first time
    /// the press is long enough.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        if self.fired || !self.is_long(now) {
            return None;
        }
        self.fired = true;
        Some(&self.url)
    }

    /// Ends the press. Yields the url for a long press that no tick has
    /// reported yet.
    #[must_use]
    pub fn release(self, now: Instant) -> Option<String> {
        (!self.fired && self.is_long(now)).then_some(self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://blob.test/a";

    #[test]
    fn poll_fires_once_after_threshold() {
        let start = Instant::now();
        let mut press = PressGesture::start(URL.to_string(), start);

        assert_eq!(press.poll(start + Duration::from_millis(499)), None);
        assert_eq!(press.poll(start + LONG_PRESS), Some(URL));
        assert_eq!(press.poll(start + Duration::from_secs(2)), None);
        assert_eq!(press.release(start + Duration::from_secs(3)), None);
    }

    #[test]
    fn short_release_is_a_click() {
        let start = Instant::now();
        let press = PressGesture::start(URL.to_string(), start);
        assert!(!press.is_long(start + Duration::from_millis(120)));
        assert_eq!(press.release(start + Duration::from_millis(120)), None);
    }

    #[test]
    fn long_release_without_tick_reports_url() {
        let start = Instant::now();
        let press = PressGesture::start(URL.to_string(), start);
        assert_eq!(
            press.release(start + Duration::from_millis(800)),
            Some(URL.to_string())
        );
    }

    #[test]
    fn clock_going_backwards_is_not_long() {
        let start = Instant::now() + Duration::from_secs(1);
        let press = PressGesture::start(URL.to_string(), start);
        assert!(!press.is_long(Instant::now()));
        assert_eq!(press.url(), URL);
    }
}
