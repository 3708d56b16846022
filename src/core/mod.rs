// Core modules
pub mod export;
pub mod logging;
pub mod questionnaire;
