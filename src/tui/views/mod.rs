pub mod questionnaire;
pub mod report;
