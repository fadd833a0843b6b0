//! Autocomplete: debounced, de-duplicated suggestion queries and the
//! suggestion list with keyboard-style navigation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chuva_weather::Place;
use parking_lot::Mutex;

/// Decides which keystrokes become geocoding requests.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    min_chars: usize,
    generation: AtomicU64,
    last_query: Mutex<Option<String>>,
}

impl Debouncer {
    pub fn new(delay: Duration, min_chars: usize) -> Self {
        Self {
            delay,
            min_chars,
            generation: AtomicU64::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// Input too short to look up. Cancels any pending query.
    pub fn is_too_short(&self, text: &str) -> bool {
        text.trim().chars().count() < self.min_chars
    }

    /// Cancel whatever is waiting.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Wait out the debounce delay for one keystroke.
    ///
    /// Returns the trimmed query when no newer input arrived meanwhile and it
    /// differs from the last query issued.
    pub async fn settle(&self, text: &str) -> Option<String> {
        let query = text.trim().to_string();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if query.chars().count() < self.min_chars {
            return None;
        }

        tokio::time::sleep(self.delay).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::trace!("[ac] superseded: {}", query);
            return None;
        }

        let mut last = self.last_query.lock();
        if last.as_deref() == Some(query.as_str()) {
            tracing::debug!("[ac] duplicate query skipped: {}", query);
            return None;
        }
        *last = Some(query.clone());
        Some(query)
    }
}

/// Suggestions currently offered, with an optional highlighted row.
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    places: Vec<Place>,
    active: Option<usize>,
}

impl SuggestionList {
    pub fn show(&mut self, places: Vec<Place>) {
        self.places = places;
        self.active = None;
    }

    pub fn hide(&mut self) {
        self.places.clear();
        self.active = None;
    }

    /// Empty lists are never shown.
    pub fn is_visible(&self) -> bool {
        !self.places.is_empty()
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Highlight the next row, wrapping to the top.
    pub fn move_down(&mut self) {
        let len = self.places.len();
        if len == 0 {
            return;
        }
        self.active = Some(match self.active {
            Some(i) => (i + 1) % len,
            None => 0,
        });
    }

    /// Highlight the previous row, wrapping to the bottom.
    pub fn move_up(&mut self) {
        let len = self.places.len();
        if len == 0 {
            return;
        }
        self.active = Some(match self.active {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        });
    }

    /// Take the highlighted place and close the list.
    pub fn choose(&mut self) -> Option<Place> {
        let place = self.active.and_then(|i| self.places.get(i).cloned())?;
        self.hide();
        Some(place)
    }
}
