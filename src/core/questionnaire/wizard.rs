//! Wizard controller for the Stage One questionnaire.
//!
//! The wizard is either editing a step or reviewing the frozen report:
//!
//! ```text
//!   Editing(0) <-> Editing(1) <-> ... <-> Editing(8) --advance--> Reviewing
//!                                             ^                      |
//!                                             +-------retreat--------+
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use msn_eval::core::questionnaire::{QuestionnaireWizard, Transition};
//!
//! let mut wizard = QuestionnaireWizard::new();
//! wizard.set_current_answer("Med reminder app")?;
//! assert!(matches!(wizard.advance(), Transition::Moved { from: 0, to: 1 }));
//! ```

use chrono::NaiveDate;

use super::answers::AnswerSet;
use super::questions::{question_at, Question, QuestionKey, TOTAL_QUESTIONS};
use super::report::Report;

/// Index of the final question.
pub const LAST_STEP: usize = TOTAL_QUESTIONS - 1;

/// Source of the calendar date embedded in generated reports.
pub type DateSource = fn() -> NaiveDate;

/// Current UTC calendar date.
pub fn today_utc() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

// ============================================================================
// State
// ============================================================================

/// Wizard lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    /// Answering the question at `step`.
    Editing { step: usize, answers: AnswerSet },
    /// All questions answered; answers and report are frozen.
    Reviewing { answers: AnswerSet, report: Report },
}

impl WizardState {
    pub fn answers(&self) -> &AnswerSet {
        match self {
            WizardState::Editing { answers, .. } | WizardState::Reviewing { answers, .. } => {
                answers
            }
        }
    }

    /// Step index; reviewing always sits on the last step.
    pub fn step(&self) -> usize {
        match self {
            WizardState::Editing { step, .. } => *step,
            WizardState::Reviewing { .. } => LAST_STEP,
        }
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to do from the current state.
    Unchanged,
    /// Advance refused because the current answer is blank.
    Blocked,
    /// Moved between editing steps.
    Moved { from: usize, to: usize },
    /// Left the last step and generated the report.
    Completed,
    /// Left the report and returned to editing the last step.
    Reopened,
}

impl Transition {
    pub fn changed_state(self) -> bool {
        !matches!(self, Transition::Unchanged | Transition::Blocked)
    }
}

/// Errors raised by wizard operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Step {index} is outside the question sequence (0..{len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Answers are frozen while the report is shown")]
    AnswersFrozen,

    #[error("Report is only available once every question is answered")]
    NotComplete,
}

// ============================================================================
// Controller
// ============================================================================

/// Drives the questionnaire one step at a time.
#[derive(Debug, Clone)]
pub struct QuestionnaireWizard {
    state: WizardState,
    today: DateSource,
}

impl Default for QuestionnaireWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionnaireWizard {
    /// Fresh wizard on the first question with no answers.
    pub fn new() -> Self {
        Self::with_date_source(today_utc)
    }

    /// Fresh wizard whose reports are dated by `today`.
    pub fn with_date_source(today: DateSource) -> Self {
        Self {
            state: WizardState::Editing {
                step: 0,
                answers: AnswerSet::default(),
            },
            today,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step_index(&self) -> usize {
        self.state.step()
    }

    pub fn answers(&self) -> &AnswerSet {
        self.state.answers()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, WizardState::Reviewing { .. })
    }

    /// `(step + 1, total)` for display.
    pub fn progress(&self) -> (usize, usize) {
        (self.step_index() + 1, TOTAL_QUESTIONS)
    }

    /// Question at the current step.
    pub fn current_question(&self) -> Result<&'static Question, WizardError> {
        let index = self.step_index();
        question_at(index).ok_or(WizardError::OutOfRange {
            index,
            len: TOTAL_QUESTIONS,
        })
    }

    /// Answer text for the current step.
    pub fn current_answer(&self) -> &str {
        match self.current_question() {
            Ok(question) => self.answers().get(question.key),
            Err(_) => "",
        }
    }

    /// Replace the answer for `key`. Rejected while reviewing.
    pub fn set_answer(&mut self, key: QuestionKey, value: impl Into<String>) -> Result<(), WizardError> {
        match &mut self.state {
            WizardState::Editing { answers, .. } => {
                *answers = answers.with_answer(key, value);
                Ok(())
            }
            WizardState::Reviewing { .. } => Err(WizardError::AnswersFrozen),
        }
    }

    /// Replace the answer for the current step.
    pub fn set_current_answer(&mut self, value: impl Into<String>) -> Result<(), WizardError> {
        let key = self.current_question()?.key;
        self.set_answer(key, value)
    }

    /// Whether [`advance`](Self::advance) would change state.
    pub fn can_advance(&self) -> bool {
        match &self.state {
            WizardState::Editing { step, answers } => {
                question_at(*step).is_some_and(|q| !answers.is_blank(q.key))
            }
            WizardState::Reviewing { .. } => false,
        }
    }

    /// Whether [`retreat`](Self::retreat) would change state.
    pub fn can_retreat(&self) -> bool {
        match &self.state {
            WizardState::Editing { step, .. } => *step > 0,
            WizardState::Reviewing { .. } => true,
        }
    }

    /// Move to the next question, or generate the report from the last one.
    ///
    /// A blank (whitespace-only) answer blocks the move and leaves the state
    /// untouched.
    pub fn advance(&mut self) -> Transition {
        let WizardState::Editing { step, answers } = &mut self.state else {
            return Transition::Unchanged;
        };

        let Some(question) = question_at(*step) else {
            return Transition::Unchanged;
        };
        if answers.is_blank(question.key) {
            tracing::debug!(step = *step, key = %question.key, "Advance blocked on blank answer");
            return Transition::Blocked;
        }

        if *step < LAST_STEP {
            let from = *step;
            *step += 1;
            tracing::debug!(from, to = *step, "Advanced to next question");
            return Transition::Moved { from, to: *step };
        }

        let answers = std::mem::take(answers);
        let report = Report::generate(&answers, (self.today)());
        tracing::info!(
            generated_on = %report.generated_on(),
            lines = report.line_count(),
            "Questionnaire complete, report generated"
        );
        self.state = WizardState::Reviewing { answers, report };
        Transition::Completed
    }

    /// Go back one question, or leave the report view.
    pub fn retreat(&mut self) -> Transition {
        if let WizardState::Reviewing { answers, .. } = &mut self.state {
            let answers = std::mem::take(answers);
            self.state = WizardState::Editing {
                step: LAST_STEP,
                answers,
            };
            tracing::debug!("Reopened answers for editing");
            return Transition::Reopened;
        }

        match &mut self.state {
            WizardState::Editing { step, .. } if *step > 0 => {
                let from = *step;
                *step -= 1;
                Transition::Moved { from, to: *step }
            }
            _ => Transition::Unchanged,
        }
    }

    /// The frozen report. Only available while reviewing.
    pub fn report(&self) -> Result<&Report, WizardError> {
        match &self.state {
            WizardState::Reviewing { report, .. } => Ok(report),
            WizardState::Editing { .. } => Err(WizardError::NotComplete),
        }
    }
}
