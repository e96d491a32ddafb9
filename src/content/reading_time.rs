//! Reading-time estimation

use serde::Serialize;
use std::fmt;

/// Assumed reading speed when the site does not configure one
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// Count whitespace-delimited words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated reading duration of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ReadingTime {
    pub words: usize,
    /// Whole minutes, never below 1
    pub minutes: usize,
}

impl fmt::Display for ReadingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min read", self.minutes)
    }
}

/// Turns text into a [`ReadingTime`] at a fixed reading speed
#[derive(Debug, Clone, Copy)]
pub struct ReadingTimeEstimator {
    words_per_minute: usize,
}

impl ReadingTimeEstimator {
    /// A speed of zero is clamped to one word per minute
    pub fn new(words_per_minute: usize) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
        }
    }

    pub fn words_per_minute(&self) -> usize {
        self.words_per_minute
    }

    /// Estimate how long `text` takes to read, rounded up to whole minutes
    pub fn estimate(&self, text: &str) -> ReadingTime {
        let words = word_count(text);
        let minutes = words.div_ceil(self.words_per_minute).max(1);
        ReadingTime { words, minutes }
    }
}

impl Default for ReadingTimeEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_word_count_splits_on_any_whitespace() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("one two\nthree\tfour  five"), 5);
    }

    #[test]
    fn test_empty_body_reads_in_one_minute() {
        let estimator = ReadingTimeEstimator::default();
        let rt = estimator.estimate("");
        assert_eq!(rt.words, 0);
        assert_eq!(rt.minutes, 1);
        assert_eq!(rt.to_string(), "1 min read");
    }

    #[test]
    fn test_short_bodies_floor_at_one_minute() {
        let estimator = ReadingTimeEstimator::default();
        for n in [1, 50, 199, 200] {
            assert_eq!(estimator.estimate(&words(n)).minutes, 1, "{} words", n);
        }
    }

    #[test]
    fn test_rounds_up_to_next_minute() {
        let estimator = ReadingTimeEstimator::default();
        assert_eq!(estimator.estimate(&words(201)).minutes, 2);
        assert_eq!(estimator.estimate(&words(400)).minutes, 2);
        assert_eq!(estimator.estimate(&words(401)).minutes, 3);
        assert_eq!(estimator.estimate(&words(600)).to_string(), "3 min read");
    }

    #[test]
    fn test_monotonic_in_word_count() {
        let estimator = ReadingTimeEstimator::new(7);
        let mut previous = estimator.estimate("");
        for n in 1..100 {
            let current = estimator.estimate(&words(n));
            assert!(previous.minutes <= current.minutes, "{} words", n);
            previous = current;
        }
    }

    #[test]
    fn test_zero_speed_is_clamped() {
        let estimator = ReadingTimeEstimator::new(0);
        assert_eq!(estimator.words_per_minute(), 1);
        assert_eq!(estimator.estimate(&words(3)).minutes, 3);
    }
}
