//! The bowl: the full word pool of the match and the working copy consumed
//! during a round.
//!
//! A drawn word sits in an "in play" slot until it is either confirmed (the
//! team guessed it, the word leaves the round) or put back (the turn ended,
//! the word returns to the end of the working bowl). The remaining count
//! includes the word in play, so it only ever goes down within a round.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct Bowl {
    full: Vec<String>,
    working: VecDeque<String>,
    in_play: Option<String>,
}

impl Bowl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full pool. The working bowl stays empty until `refill`.
    pub fn fill(&mut self, words: Vec<String>) {
        self.full = words;
        self.working.clear();
        self.in_play = None;
    }

    /// Start a round: the working bowl becomes a shuffled copy of the full pool.
    pub fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut words = self.full.clone();
        words.shuffle(rng);
        self.working = words.into();
        self.in_play = None;
    }

    /// Take the head of the working bowl into play. If a word is already in
    /// play it is returned again instead of drawing a new one.
    pub fn draw(&mut self) -> Option<&str> {
        if self.in_play.is_none() {
            self.in_play = self.working.pop_front();
        }
        self.in_play.as_deref()
    }

    pub fn in_play(&self) -> Option<&str> {
        self.in_play.as_deref()
    }

    /// Consume the word in play. Returns false if nothing was in play.
    pub fn confirm(&mut self) -> bool {
        self.in_play.take().is_some()
    }

    /// Return the word in play to the end of the working bowl.
    pub fn put_back(&mut self) {
        if let Some(word) = self.in_play.take() {
            self.working.push_back(word);
        }
    }

    pub fn remaining(&self) -> usize {
        self.working.len() + usize::from(self.in_play.is_some())
    }

    pub fn total(&self) -> usize {
        self.full.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
