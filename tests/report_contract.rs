//! Report output contract: section placement, fallbacks and ordering.

use chrono::NaiveDate;
use rstest::rstest;

use msn_eval::core::questionnaire::{
    render_report, render_sections, AnswerSet, QuestionKey, QuestionnaireWizard, Report,
    ReportSection, FALLBACK_LABEL,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn med_reminder_answers() -> AnswerSet {
    [
        (QuestionKey::Idea, "Med reminder app"),
        (QuestionKey::Inspiration, "my grandmother forgets pills"),
        (QuestionKey::Beneficiaries, "elderly patients"),
        (QuestionKey::Problem, "missed doses"),
        (QuestionKey::Technology, "mobile app with AI"),
        (QuestionKey::Impact, "fewer missed doses"),
        (QuestionKey::Concerns, "privacy"),
        (QuestionKey::Background, "beginner"),
        (QuestionKey::Feedback, "ethical evaluation"),
    ]
    .into_iter()
    .fold(AnswerSet::new(), |answers, (key, value)| {
        answers.with_answer(key, value)
    })
}

fn section_text(answers: &AnswerSet, section: ReportSection) -> String {
    render_sections(answers, date())
        .into_iter()
        .find(|(s, _)| *s == section)
        .map(|(_, text)| text)
        .unwrap()
}

#[test]
fn test_med_reminder_values_land_in_their_sections() {
    let answers = med_reminder_answers();

    let summary = section_text(&answers, ReportSection::Summary);
    assert!(summary.contains("- Idea: Med reminder app"));
    assert!(summary.contains("- Inspiration: my grandmother forgets pills"));
    assert!(summary.contains("- Beneficiaries: elderly patients"));
    assert!(summary.contains("- Requested feedback: ethical evaluation"));

    let context = section_text(&answers, ReportSection::MedicalContext);
    assert!(context.contains("This idea targets: missed doses."));
    assert!(context.contains("2.1 Restatement: Med reminder app"));
    assert!(context.contains("- Stakeholders: elderly patients"));
    assert!(context.contains("- Technology base: mobile app with AI"));

    let reflection = section_text(&answers, ReportSection::Reflection);
    assert!(reflection.contains("Because: my grandmother forgets pills"));

    let report = render_report(&answers, date());
    assert!(!report.contains(FALLBACK_LABEL));
}

#[test]
fn test_only_idea_answered_renders_fallbacks_everywhere() {
    let answers = AnswerSet::new().with_answer(QuestionKey::Idea, "Triage chatbot");
    let report = render_report(&answers, date());

    // Eight summary lines plus four medical-context slots
    assert_eq!(report.matches(FALLBACK_LABEL).count(), 12);
    assert!(report.contains("- Idea: Triage chatbot"));
    assert!(report.contains("This idea targets: Not specified."));
    assert!(report.contains("- Why automation here? Articulate specific pain points and value."));
    assert!(!report.contains("Because:"));
    assert!(!report.contains(": \n"));
}

#[rstest]
#[case(QuestionKey::Inspiration, "- Inspiration: Not specified")]
#[case(QuestionKey::Beneficiaries, "- Stakeholders: Not specified")]
#[case(QuestionKey::Problem, "- Objectives: Not specified")]
#[case(QuestionKey::Technology, "- Technology base: Not specified")]
#[case(QuestionKey::Impact, "- Expected impact: Not specified")]
#[case(QuestionKey::Concerns, "- Concerns: Not specified")]
#[case(QuestionKey::Background, "- Background: Not specified")]
#[case(QuestionKey::Feedback, "- Requested feedback: Not specified")]
fn test_whitespace_answer_uses_fallback(#[case] key: QuestionKey, #[case] expected: &str) {
    let answers = med_reminder_answers().with_answer(key, " \t\n ");
    let report = render_report(&answers, date());
    assert!(report.contains(expected), "missing {expected:?}");
}

#[rstest]
#[case::empty(AnswerSet::new())]
#[case::full(med_reminder_answers())]
#[case::multiline(AnswerSet::new().with_answer(QuestionKey::Idea, "A.\nB. Medical Context and Importance"))]
fn test_section_order_is_fixed(#[case] answers: AnswerSet) {
    let sections: Vec<ReportSection> = render_sections(&answers, date())
        .into_iter()
        .map(|(section, _)| section)
        .collect();
    assert_eq!(sections, ReportSection::ALL.to_vec());

    let report = render_report(&answers, date());
    assert!(report.starts_with(ReportSection::Summary.heading()));
    let mut cursor = 0;
    for section in &ReportSection::ALL[1..] {
        let heading = format!("\n{}", section.heading());
        let offset = report[cursor..]
            .find(&heading)
            .unwrap_or_else(|| panic!("{section:?} out of order"));
        cursor += offset + 1;
    }
}

#[test]
fn test_trailer_format() {
    let report = render_report(&AnswerSet::new(), date());
    assert!(report.contains("\n\n\n— Generated on 2025-03-14\n\n\nReferences:\n"));
    assert!(report.ends_with("\nNote: This tool is for education and planning. It is not medical advice."));
}

#[test]
fn test_wizard_report_is_idempotent() {
    fn pinned() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    let mut wizard = QuestionnaireWizard::with_date_source(pinned);
    for key in QuestionKey::ALL {
        let value = med_reminder_answers().get(key).to_string();
        wizard.set_answer(key, value).unwrap();
    }
    for _ in QuestionKey::ALL {
        wizard.advance();
    }

    let first = wizard.report().unwrap().as_str().to_string();
    let second = wizard.report().unwrap().as_str().to_string();
    assert_eq!(first, second);
    assert_eq!(first, Report::generate(&med_reminder_answers(), pinned()).as_str());
}

const MED_REMINDER_GOLDEN: &str = include_str!("fixtures/med_reminder_report.md");

#[test]
fn test_med_reminder_report_matches_golden_text() {
    let report = render_report(&med_reminder_answers(), date());
    if report != MED_REMINDER_GOLDEN {
        let first_diff = report
            .lines()
            .zip(MED_REMINDER_GOLDEN.lines())
            .position(|(got, want)| got != want);
        panic!("report differs from golden text at line {first_diff:?}");
    }
}

#[test]
fn test_only_the_date_varies_between_days() {
    let later = NaiveDate::from_ymd_opt(2031, 12, 1).unwrap();
    let report = render_report(&med_reminder_answers(), later);
    assert_eq!(
        report,
        MED_REMINDER_GOLDEN.replace("Generated on 2025-03-14", "Generated on 2031-12-01")
    );
}
