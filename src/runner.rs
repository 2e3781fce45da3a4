//! Per-module question cycling.
//!
//! A runner presents question `i`, evaluates one submission, then waits for
//! the advance event carrying its ticket before presenting `(i + 1) % N`.
//! There is no finished state; the catalog repeats forever.

use crate::catalog::{self, Answer, Question, Response};
use crate::models::ModuleKind;
use crate::utils::TextInput;
use std::time::Duration;

impl ModuleKind {
    pub fn title(self) -> &'static str {
        match self {
            ModuleKind::Math => "Math Adventure",
            ModuleKind::English => "English & Spelling",
            ModuleKind::Quiz => "Quick Quiz",
        }
    }

    /// How long the result stays on screen before the next question.
    pub fn result_delay(self) -> Duration {
        match self {
            ModuleKind::Math => Duration::from_millis(900),
            ModuleKind::English => Duration::from_millis(700),
            ModuleKind::Quiz => Duration::from_millis(900),
        }
    }

    pub fn is_free_text(self) -> bool {
        matches!(self, ModuleKind::English)
    }

    fn entry_narration(self, question: &Question) -> String {
        match self {
            ModuleKind::Math => format!("Question: {}", question.prompt),
            ModuleKind::English => match question.detail {
                Some(detail) => format!("{} {}", question.prompt, detail),
                None => question.prompt.to_string(),
            },
            ModuleKind::Quiz => format!("Quiz: {}", question.prompt),
        }
    }

    fn result_text(self, correct: bool, answer: &Answer) -> (String, String) {
        let (label, narration) = match (self, correct) {
            (ModuleKind::Math, true) => ("✔ Correct", "Correct! Well done."),
            (ModuleKind::Math, false) => ("✘ Try again", "Not quite, try the next one."),
            (ModuleKind::English, true) => ("Great job!", "Great job!"),
            (ModuleKind::English, false) => {
                let text = format!("The correct answer is {}", answer);
                return (text.clone(), text);
            }
            (ModuleKind::Quiz, true) => ("Great!", "Nice! You earned a star."),
            (ModuleKind::Quiz, false) => ("Not quite", "Almost. Keep trying!"),
        };
        (label.to_string(), narration.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Presenting,
    Evaluating { correct: bool, label: String },
}

/// Outcome of a submission, for the caller to award stars and emit feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub module: ModuleKind,
    pub correct: bool,
    pub label: String,
    pub narration: String,
    pub delay: Duration,
    pub ticket: u64,
}

#[derive(Debug)]
pub struct ModuleRunner {
    kind: ModuleKind,
    questions: &'static [Question],
    index: usize,
    phase: Phase,
    ticket: u64,
    pub selected_choice: usize,
    pub input: TextInput,
}

impl ModuleRunner {
    pub fn new(kind: ModuleKind) -> Self {
        Self::starting_at(kind, 0)
    }

    /// A runner whose tickets continue after `last_ticket`, so events issued
    /// by an earlier runner can never match this one.
    pub fn starting_at(kind: ModuleKind, last_ticket: u64) -> Self {
        Self {
            kind,
            questions: catalog::questions(kind),
            index: 0,
            phase: Phase::Presenting,
            ticket: last_ticket,
            selected_choice: 0,
            input: TextInput::new(),
        }
    }

    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current(&self) -> &'static Question {
        &self.questions[self.index]
    }

    /// The most recently issued ticket.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_evaluating(&self) -> bool {
        matches!(self.phase, Phase::Evaluating { .. })
    }

    pub fn result_label(&self) -> Option<&str> {
        match &self.phase {
            Phase::Evaluating { label, .. } => Some(label),
            Phase::Presenting => None,
        }
    }

    pub fn entry_narration(&self) -> String {
        self.kind.entry_narration(self.current())
    }

    /// Evaluate `response` against the current question.
    /// Returns `None` while a previous result is still showing.
    pub fn submit(&mut self, response: &Response) -> Option<Evaluation> {
        if self.is_evaluating() {
            return None;
        }

        let question = self.current();
        let correct = question.is_correct(response);
        let (label, narration) = self.kind.result_text(correct, &question.answer);

        self.ticket += 1;
        self.phase = Phase::Evaluating {
            correct,
            label: label.clone(),
        };

        Some(Evaluation {
            module: self.kind,
            correct,
            label,
            narration,
            delay: self.kind.result_delay(),
            ticket: self.ticket,
        })
    }

    /// Submit whatever the learner has selected or typed.
    pub fn submit_current(&mut self) -> Option<Evaluation> {
        if self.is_evaluating() {
            return None;
        }

        let response = if self.kind.is_free_text() {
            Response::Text(self.input.take())
        } else {
            let choice = *self.current().choices.get(self.selected_choice)?;
            Response::Choice(choice)
        };
        self.submit(&response)
    }

    /// Pick the `n`-th choice (zero-based) and submit it.
    pub fn pick(&mut self, n: usize) -> Option<Evaluation> {
        if self.kind.is_free_text() || n >= self.current().choices.len() {
            return None;
        }
        self.selected_choice = n;
        self.submit_current()
    }

    /// Move to the next question if `ticket` belongs to the pending evaluation.
    pub fn advance(&mut self, ticket: u64) -> bool {
        if !self.is_evaluating() || ticket != self.ticket {
            return false;
        }
        self.index = (self.index + 1) % self.questions.len();
        self.phase = Phase::Presenting;
        self.selected_choice = 0;
        true
    }

    /// Move the choice cursor over a two-column grid.
    pub fn move_selection(&mut self, dx: isize, dy: isize) {
        let count = self.current().choices.len();
        if count == 0 {
            return;
        }
        let target = self.selected_choice as isize + dx + dy * 2;
        if (0..count as isize).contains(&target) {
            self.selected_choice = target as usize;
        }
    }
}
