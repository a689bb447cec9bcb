//! QML identifier synthesis
//!
//! Moodle has no identifiers QML could reuse, so the QML writer makes them up:
//! `Q<n>` for a question, `O<n>` for its outcome (same digits) and `C<n>` for
//! each choice. One [`IdAllocator`] lives for one document and never hands out
//! the same identifier twice.
//!
//! With [`IdStrategy::Digest`] the number is the first four bytes of the
//! SHA-256 of the source text, so the same text gives the same identifier in
//! every run. Repeated text (or a hash collision) moves on to the next free
//! number. With [`IdStrategy::Counter`] numbers simply count up from 1.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::types::IdStrategy;

/// Identifiers of one QML question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionIds {
    pub question: String,
    pub outcome: String,
}

/// Numbers already used in one prefix namespace
#[derive(Debug, Default)]
struct Namespace {
    used: HashSet<u64>,
    next: u64,
}

impl Namespace {
    fn allocate(&mut self, strategy: IdStrategy, text: &str) -> u64 {
        let mut number = match strategy {
            IdStrategy::Digest => digest_number(text),
            IdStrategy::Counter => self.next + 1,
        };
        while !self.used.insert(number) {
            number = number.wrapping_add(1);
        }
        self.next = self.next.max(number);
        number
    }
}

/// Per-document identifier allocator
#[derive(Debug)]
pub struct IdAllocator {
    strategy: IdStrategy,
    questions: Namespace,
    choices: Namespace,
}

impl IdAllocator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            questions: Namespace::default(),
            choices: Namespace::default(),
        }
    }

    /// Question and outcome identifiers, keyed off the display name
    pub fn question_ids(&mut self, name: &str) -> QuestionIds {
        let number = self.questions.allocate(self.strategy, name);
        QuestionIds {
            question: format!("Q{}", number),
            outcome: format!("O{}", number),
        }
    }

    /// Choice identifier, keyed off the choice text
    pub fn choice_id(&mut self, text: &str) -> String {
        format!("C{}", self.choices.allocate(self.strategy, text))
    }
}

fn digest_number(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    u64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}
