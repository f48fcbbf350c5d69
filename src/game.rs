// Word-game state: the list of target words and the cursor into it.
// The per-frame pipeline only ever reads the current word; the list is
// mutated through load_data/new_word/shuffle alone.

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::error::Error;

/// Where the words come from. The game does not care whether that is a file,
/// a test fixture, or something fancier.
pub trait WordSource {
    fn words(&self) -> Result<Vec<String>, Error>;
}

/// One word per line; blank lines and surrounding whitespace are dropped.
pub struct FileWordSource {
    path: PathBuf,
}

impl FileWordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WordSource for FileWordSource {
    fn words(&self) -> Result<Vec<String>, Error> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| Error::WordSource(format!("{}: {e}", self.path.display())))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

impl WordSource for Vec<String> {
    fn words(&self) -> Result<Vec<String>, Error> {
        Ok(self.clone())
    }
}

impl WordSource for &[&str] {
    fn words(&self) -> Result<Vec<String>, Error> {
        Ok(self.iter().map(|s| s.to_string()).collect())
    }
}

// Deterministic xorshift32. Good enough to mix a word list, and a fixed
// seed reproduces the same session order.
#[inline]
fn xorshift(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Owns the word list and the current word. One instance per session, so
/// independent sessions (and tests) never interfere.
#[derive(Default)]
pub struct WordGame {
    words: Vec<String>,
    current: usize,
}

impl WordGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull the word list from the source and point at its first entry.
    /// An empty source is reported and leaves any previous list untouched.
    pub fn load_data(&mut self, source: &dyn WordSource) -> Result<(), Error> {
        let words = source.words()?;
        if words.is_empty() {
            return Err(Error::EmptyWordList);
        }
        info!("loaded {} words", words.len());
        self.words = words;
        self.current = 0;
        Ok(())
    }

    /// Advance to the next word, wrapping to the first after the last.
    pub fn new_word(&mut self) -> Result<&str, Error> {
        if self.words.is_empty() {
            return Err(Error::NoWordsLoaded);
        }
        self.current = (self.current + 1) % self.words.len();
        Ok(&self.words[self.current])
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.current).map(String::as_str)
    }

    /// Deterministic Fisher-Yates over the list; the cursor returns to the
    /// first entry. Same seed, same order.
    pub fn shuffle(&mut self, seed: u32) {
        let mut state = seed | 1;
        for i in (1..self.words.len()).rev() {
            let j = xorshift(&mut state) as usize % (i + 1);
            self.words.swap(i, j);
        }
        self.current = 0;
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_words() -> Vec<String> {
        vec!["cat".to_string(), "boat".to_string(), "tree".to_string()]
    }

    #[test]
    fn test_load_selects_the_first_word() {
        let mut game = WordGame::new();
        game.load_data(&three_words()).unwrap();
        assert_eq!(game.current_word(), Some("cat"));
        assert_eq!(game.len(), 3);
    }

    #[test]
    fn test_new_word_wraps_cyclically() {
        let mut game = WordGame::new();
        game.load_data(&three_words()).unwrap();
        assert_eq!(game.new_word().unwrap(), "boat");
        assert_eq!(game.new_word().unwrap(), "tree");
        assert_eq!(game.new_word().unwrap(), "cat"); // wrapped
        assert_eq!(game.current_word(), Some("cat"));
    }

    #[test]
    fn test_advancing_list_len_times_is_identity() {
        let mut game = WordGame::new();
        game.load_data(&three_words()).unwrap();
        let start = game.current_word().unwrap().to_string();
        for _ in 0..game.len() {
            game.new_word().unwrap();
        }
        assert_eq!(game.current_word(), Some(start.as_str()));
    }

    #[test]
    fn test_empty_source_is_rejected_and_state_kept() {
        let mut game = WordGame::new();
        game.load_data(&three_words()).unwrap();
        let err = game.load_data(&Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyWordList));
        // prior list survives the failed reload
        assert_eq!(game.current_word(), Some("cat"));
    }

    #[test]
    fn test_new_word_without_data_is_rejected() {
        let mut game = WordGame::new();
        let err = game.new_word().unwrap_err();
        assert!(matches!(err, Error::NoWordsLoaded));
    }

    #[test]
    fn test_shuffle_is_deterministic_and_complete() {
        let mut a = WordGame::new();
        let mut b = WordGame::new();
        let words: Vec<String> = (0..16).map(|i| format!("w{i}")).collect();
        a.load_data(&words).unwrap();
        b.load_data(&words).unwrap();
        a.shuffle(0xC0FFEE);
        b.shuffle(0xC0FFEE);

        let order_a: Vec<_> = (0..a.len())
            .map(|_| a.new_word().unwrap().to_string())
            .collect();
        let order_b: Vec<_> = (0..b.len())
            .map(|_| b.new_word().unwrap().to_string())
            .collect();
        assert_eq!(order_a, order_b);

        // still a permutation of the same words
        let mut sorted = order_a.clone();
        sorted.sort();
        let mut expected = words.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_slice_source_loads() {
        let mut game = WordGame::new();
        let src: &[&str] = &["sun", "moon"];
        game.load_data(&src).unwrap();
        assert_eq!(game.current_word(), Some("sun"));
    }
}
