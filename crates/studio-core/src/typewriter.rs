use crate::constants::{DELETE_LETTER_MS, NEXT_WORD_MS, TYPE_LETTER_MS, WORD_HOLD_MS};

/// Text to display and how long to wait before the next step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypewriterStep {
    pub text: String,
    pub delay_ms: u32,
}

/// Types each word letter by letter, holds, deletes it, then moves on.
#[derive(Clone, Debug)]
pub struct Typewriter {
    words: Vec<Vec<char>>,
    word_index: usize,
    letter_index: usize,
    deleting: bool,
}

impl Typewriter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().chars().collect())
                .collect(),
            word_index: 0,
            letter_index: 0,
            deleting: false,
        }
    }

    pub fn step(&mut self) -> TypewriterStep {
        let Some(word) = self.words.get(self.word_index) else {
            return TypewriterStep {
                text: String::new(),
                delay_ms: WORD_HOLD_MS,
            };
        };
        if self.deleting {
            self.letter_index = self.letter_index.saturating_sub(1);
        } else {
            self.letter_index = (self.letter_index + 1).min(word.len());
        }
        let text: String = word[..self.letter_index].iter().collect();
        let word_len = word.len();

        let mut delay_ms = if self.deleting {
            DELETE_LETTER_MS
        } else {
            TYPE_LETTER_MS
        };
        if !self.deleting && self.letter_index == word_len {
            delay_ms = WORD_HOLD_MS;
            self.deleting = true;
        } else if self.deleting && self.letter_index == 0 {
            delay_ms = NEXT_WORD_MS;
            self.deleting = false;
            self.word_index = (self.word_index + 1) % self.words.len();
        }
        TypewriterStep { text, delay_ms }
    }
}
