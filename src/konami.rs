pub const KONAMI_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

/// Prefix matcher over keydown keys.
///
/// A mismatch always restarts from the beginning, even when the mismatching
/// key could itself start the sequence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KonamiDetector {
    index: usize,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys matched so far.
    pub fn progress(&self) -> usize {
        self.index
    }

    /// Feeds one key; returns true when it completes the sequence.
    pub fn feed(&mut self, key: &str) -> bool {
        if KONAMI_SEQUENCE.get(self.index) != Some(&key) {
            self.index = 0;
            return false;
        }
        self.index += 1;
        if self.index == KONAMI_SEQUENCE.len() {
            self.index = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_sequence_fires_once_and_resets() {
        let mut detector = KonamiDetector::new();
        let fired = KONAMI_SEQUENCE
            .iter()
            .filter(|key| detector.feed(key))
            .count();
        assert_eq!(fired, 1);
        assert_eq!(detector.progress(), 0);
    }

    #[test]
    fn mismatch_restarts_without_resync() {
        let mut detector = KonamiDetector::new();
        for key in ["ArrowUp", "ArrowUp", "ArrowDown"] {
            assert!(!detector.feed(key));
        }
        assert_eq!(detector.progress(), 3);
        assert!(!detector.feed("x"));
        assert_eq!(detector.progress(), 0);

        // A third ArrowUp mismatches ArrowDown and does not count as a new start.
        detector.feed("ArrowUp");
        detector.feed("ArrowUp");
        detector.feed("ArrowUp");
        assert_eq!(detector.progress(), 0);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let mut detector = KonamiDetector::new();
        for key in &KONAMI_SEQUENCE[..8] {
            detector.feed(key);
        }
        assert!(!detector.feed("B"));
        assert_eq!(detector.progress(), 0);
    }
}
