//! Questionnaire Wizard and Report Generation
//!
//! Walks the user through the Stage One inquiry one question at a time and,
//! once every step has an answer, renders the expert evaluation report.
//!
//! # Overview
//!
//! The questionnaire has nine fixed steps:
//! 1. Idea - free-form description of the health automation concept
//! 2. Inspiration (1.1)
//! 3. Beneficiaries (1.2)
//! 4. Main problem (1.3)
//! 5. Technology (1.4)
//! 6. Expected impact (1.5)
//! 7. Concerns (1.6)
//! 8. Background (1.7)
//! 9. Requested feedback (1.8)
//!
//! # Design Principles
//!
//! - **Linear**: no branching, every step is visited in order
//! - **Progressive**: users can move forward/backward preserving answers
//! - **Gated**: a step only advances once its answer is non-blank
//! - **Frozen review**: the report is generated once on completion and held
//!   until the user goes back to editing

mod answers;
mod questions;
mod report;
mod wizard;

pub use answers::*;
pub use questions::*;
pub use report::*;
pub use wizard::*;
