//! Cycling typewriter headline
//!
//! Types a phrase, pauses, deletes it, moves on to the next one, forever.

use std::time::Duration;

pub const PHRASES: [&str; 5] = [
    "Stunning Covers",
    "Professional Images",
    "Beautiful Designs",
    "Eye-Catching Visuals",
    "Amazing Graphics",
];

pub const TYPING_DELAY: Duration = Duration::from_millis(100);
pub const DELETING_DELAY: Duration = Duration::from_millis(50);
pub const WORD_PAUSE: Duration = Duration::from_millis(2000);

/// One rendered frame and how long to wait before the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<String>,
    phrase: usize,
    chars: usize,
    deleting: bool,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::cycle(PHRASES.iter().map(|p| p.to_string()).collect())
    }
}

impl Typewriter {
    /// None when there is nothing to type
    pub fn new(phrases: Vec<String>) -> Option<Self> {
        if phrases.is_empty() {
            return None;
        }
        Some(Self::cycle(phrases))
    }

    fn cycle(phrases: Vec<String>) -> Self {
        Self {
            phrases,
            phrase: 0,
            chars: 0,
            deleting: false,
        }
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    /// Advance one character forward or back
    pub fn tick(&mut self) -> Frame {
        let current = &self.phrases[self.phrase];
        let len = current.chars().count();

        if self.deleting {
            self.chars = self.chars.saturating_sub(1);
        } else {
            self.chars = (self.chars + 1).min(len);
        }
        let text: String = current.chars().take(self.chars).collect();

        if !self.deleting && self.chars == len {
            self.deleting = true;
            return Frame {
                text,
                delay: WORD_PAUSE,
            };
        }

        if self.deleting && self.chars == 0 {
            self.deleting = false;
            self.phrase = (self.phrase + 1) % self.phrases.len();
        }

        Frame {
            text,
            delay: if self.deleting {
                DELETING_DELAY
            } else {
                TYPING_DELAY
            },
        }
    }
}

impl Iterator for Typewriter {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        Some(self.tick())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle_of_one_phrase() {
        let mut tw = Typewriter::new(vec!["abc".to_string(), "de".to_string()]).unwrap();

        assert_eq!(tw.tick(), Frame { text: "a".into(), delay: TYPING_DELAY });
        assert_eq!(tw.tick(), Frame { text: "ab".into(), delay: TYPING_DELAY });
        assert_eq!(tw.tick(), Frame { text: "abc".into(), delay: WORD_PAUSE });
        assert_eq!(tw.tick(), Frame { text: "ab".into(), delay: DELETING_DELAY });
        assert_eq!(tw.tick(), Frame { text: "a".into(), delay: DELETING_DELAY });

        let last = tw.tick();
        assert_eq!(last.text, "");
        assert_eq!(last.delay, TYPING_DELAY);
        assert_eq!(tw.phrase_index(), 1);

        assert_eq!(tw.tick().text, "d");
    }

    #[test]
    fn test_wraps_around() {
        let tw = Typewriter::new(vec!["x".to_string(), "y".to_string()]).unwrap();
        // x: type, delete; y: type, delete; back to x
        let texts: Vec<String> = tw.take(5).map(|f| f.text).collect();
        assert_eq!(texts, vec!["x", "", "y", "", "x"]);
    }

    #[test]
    fn test_no_phrases() {
        assert!(Typewriter::new(Vec::new()).is_none());
    }

    #[test]
    fn test_default_phrases() {
        let mut tw = Typewriter::default();
        let frames: Vec<Frame> = (0..PHRASES[0].len()).map(|_| tw.tick()).collect();
        assert_eq!(frames.last().unwrap().text, "Stunning Covers");
        assert_eq!(frames.last().unwrap().delay, WORD_PAUSE);
    }
}
