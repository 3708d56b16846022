//! The fixed Stage One question set.

use serde::{Deserialize, Serialize};

/// Identifier of a questionnaire step. Serialized with the answer-file keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKey {
    #[serde(rename = "idea")]
    Idea,
    #[serde(rename = "q11")]
    Inspiration,
    #[serde(rename = "q12")]
    Beneficiaries,
    #[serde(rename = "q13")]
    Problem,
    #[serde(rename = "q14")]
    Technology,
    #[serde(rename = "q15")]
    Impact,
    #[serde(rename = "q16")]
    Concerns,
    #[serde(rename = "q17")]
    Background,
    #[serde(rename = "q18")]
    Feedback,
}

impl QuestionKey {
    /// All keys in presentation order.
    pub const ALL: [QuestionKey; 9] = [
        QuestionKey::Idea,
        QuestionKey::Inspiration,
        QuestionKey::Beneficiaries,
        QuestionKey::Problem,
        QuestionKey::Technology,
        QuestionKey::Impact,
        QuestionKey::Concerns,
        QuestionKey::Background,
        QuestionKey::Feedback,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKey::Idea => "idea",
            QuestionKey::Inspiration => "q11",
            QuestionKey::Beneficiaries => "q12",
            QuestionKey::Problem => "q13",
            QuestionKey::Technology => "q14",
            QuestionKey::Impact => "q15",
            QuestionKey::Concerns => "q16",
            QuestionKey::Background => "q17",
            QuestionKey::Feedback => "q18",
        }
    }

    /// Position of this key in the question sequence.
    pub fn index(self) -> usize {
        QuestionKey::ALL
            .iter()
            .position(|&k| k == self)
            .unwrap_or(0)
    }
}

impl std::fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single question shown by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub key: QuestionKey,
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
}

/// Stage One questions, one per [`QuestionKey`], in the same order as
/// [`QuestionKey::ALL`].
pub static QUESTIONS: [Question; 9] = [
    Question {
        key: QuestionKey::Idea,
        label: "Idea — Briefly describe your health automation concept",
        placeholder: Some("e.g., An AI app that reminds elderly patients to take their medicine."),
    },
    Question {
        key: QuestionKey::Inspiration,
        label: "1.1 What inspired you to think about this idea?",
        placeholder: None,
    },
    Question {
        key: QuestionKey::Beneficiaries,
        label: "1.2 Who will benefit most (patients, doctors, families, hospitals, general public)?",
        placeholder: None,
    },
    Question {
        key: QuestionKey::Problem,
        label: "1.3 What main problem are you trying to solve?",
        placeholder: None,
    },
    Question {
        key: QuestionKey::Technology,
        label: "1.4 What technology or method do you imagine (AI, sensors, data tracking, mobile app, etc.)?",
        placeholder: None,
    },
    Question {
        key: QuestionKey::Impact,
        label: "1.5 What kind of results or impact do you expect?",
        placeholder: None,
    },
    Question {
        key: QuestionKey::Concerns,
        label: "1.6 What are your main concerns or risks?",
        placeholder: None,
    },
    Question {
        key: QuestionKey::Background,
        label: "1.7 What level of medical or technical background do you have?",
        placeholder: None,
    },
    Question {
        key: QuestionKey::Feedback,
        label: "1.8 What type of feedback do you want (conceptual improvement, ethical evaluation, market feasibility, user experience)?",
        placeholder: None,
    },
];

/// Number of questions in the wizard.
pub const TOTAL_QUESTIONS: usize = QuestionKey::ALL.len();

/// Look up the question at `index`, if any.
pub fn question_at(index: usize) -> Option<&'static Question> {
    QUESTIONS.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_questions_follow_key_order() {
        for (i, question) in QUESTIONS.iter().enumerate() {
            assert_eq!(question.key, QuestionKey::ALL[i]);
            assert_eq!(question.key.index(), i);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = QUESTIONS.iter().map(|q| q.key.as_str()).collect();
        assert_eq!(keys.len(), TOTAL_QUESTIONS);
    }

    #[test]
    fn test_only_idea_has_placeholder() {
        assert!(QUESTIONS[0].placeholder.is_some());
        assert!(QUESTIONS[1..].iter().all(|q| q.placeholder.is_none()));
    }

    #[test]
    fn test_question_at_bounds() {
        assert!(question_at(0).is_some());
        assert!(question_at(TOTAL_QUESTIONS - 1).is_some());
        assert!(question_at(TOTAL_QUESTIONS).is_none());
    }
}
