use crate::models::ModuleKind;
use std::fmt;

/// A selectable value in a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Number(i64),
    Text(&'static str),
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Number(n) => write!(f, "{}", n),
            Choice::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// A choice that must equal this value exactly.
    Exact(Choice),
    /// A typed word, compared trimmed and case-insensitively.
    FreeText(&'static str),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Exact(choice) => write!(f, "{}", choice),
            Answer::FreeText(word) => f.write_str(word),
        }
    }
}

/// What the learner submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Choice(Choice),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub prompt: &'static str,
    pub detail: Option<&'static str>,
    pub choices: &'static [Choice],
    pub answer: Answer,
}

impl Question {
    pub fn is_correct(&self, response: &Response) -> bool {
        match (&self.answer, response) {
            (Answer::Exact(expected), Response::Choice(given)) => expected == given,
            (Answer::FreeText(expected), Response::Text(given)) => {
                given.trim().to_lowercase() == expected.to_lowercase()
            }
            _ => false,
        }
    }
}

pub static MATH: [Question; 3] = [
    Question {
        id: 1,
        prompt: "7 + 5 = ?",
        detail: None,
        choices: &[
            Choice::Number(10),
            Choice::Number(11),
            Choice::Number(12),
            Choice::Number(13),
        ],
        answer: Answer::Exact(Choice::Number(12)),
    },
    Question {
        id: 2,
        prompt: "9 - 4 = ?",
        detail: None,
        choices: &[
            Choice::Number(3),
            Choice::Number(4),
            Choice::Number(5),
            Choice::Number(6),
        ],
        answer: Answer::Exact(Choice::Number(5)),
    },
    Question {
        id: 3,
        prompt: "3 x 4 = ?",
        detail: None,
        choices: &[
            Choice::Number(7),
            Choice::Number(11),
            Choice::Number(12),
            Choice::Number(14),
        ],
        answer: Answer::Exact(Choice::Number(12)),
    },
];

pub static ENGLISH: [Question; 3] = [
    Question {
        id: 1,
        prompt: "Choose the correct spelling:",
        detail: Some("A. recieve  B. receive  C. recive"),
        choices: &[],
        answer: Answer::FreeText("receive"),
    },
    Question {
        id: 2,
        prompt: "Pick the noun:",
        detail: Some("Run, happiness, quickly"),
        choices: &[],
        answer: Answer::FreeText("happiness"),
    },
    Question {
        id: 3,
        prompt: "Complete: The cat ___ on the mat.",
        detail: Some("(is / are / am)"),
        choices: &[],
        answer: Answer::FreeText("is"),
    },
];

pub static QUIZ: [Question; 2] = [
    Question {
        id: 1,
        prompt: "Which is a mammal?",
        detail: None,
        choices: &[
            Choice::Text("Shark"),
            Choice::Text("Frog"),
            Choice::Text("Dog"),
            Choice::Text("Turtle"),
        ],
        answer: Answer::Exact(Choice::Text("Dog")),
    },
    Question {
        id: 2,
        prompt: "5 + 6 = ?",
        detail: None,
        choices: &[
            Choice::Number(10),
            Choice::Number(11),
            Choice::Number(12),
            Choice::Number(9),
        ],
        answer: Answer::Exact(Choice::Number(11)),
    },
];

pub fn questions(module: ModuleKind) -> &'static [Question] {
    match module {
        ModuleKind::Math => &MATH,
        ModuleKind::English => &ENGLISH,
        ModuleKind::Quiz => &QUIZ,
    }
}
