//! Expert evaluation report rendering.
//!
//! A pure templating pass: answers are interpolated verbatim into fixed
//! sections and every other line is static text. The only input besides the
//! answers is the generation date.

use chrono::NaiveDate;

use super::answers::AnswerSet;

/// Substituted for any blank answer.
pub const FALLBACK_LABEL: &str = "Not specified";

/// Separator placed between rendered sections.
pub const SECTION_SEPARATOR: &str = "\n\n";

// ============================================================================
// Static Text
// ============================================================================

const MEDICAL_RELEVANCE: &str =
    "It is medically relevant if it demonstrably improves outcomes, safety, equity, or efficiency.";

const ASSUMPTIONS: &str = "2.3 Information gaps / assumptions:\n\
- Assumptions may be required for unclear details about workflow, data sources, and validation metrics.";

const DIAGNOSIS: &str = "3.1 Medical importance: The problem addresses a clinically relevant area with potential impact on outcomes and safety.\n\
3.2 Existing solutions: Similar tools exist in digital health; differentiation should be based on usability, evidence, integration, and equity.\n\
3.3 Scientific validity, ethics, feasibility: Requires risk assessment, data governance, bias testing, accessibility, and clinical oversight.\n\
3.4 Expectation alignment: Aligns with current capabilities if scope is focused; overpromising diagnostic accuracy without trials would be misaligned.";

const ADVANTAGES: &str = "- Streamlines processes and reduces delays\n\
- May improve adherence and monitoring\n\
- Scales support to more people\n\
- Creates measurable data for quality improvement";

const RISKS: &str = "- Privacy/security vulnerabilities\n\
- Overreliance on automation; missed human judgment\n\
- Bias and unequal performance across groups\n\
- Usability challenges and alert fatigue";

const COMPLEXITIES: &str = "- Workflow and EHR integration\n\
- Regulatory and legal compliance\n\
- Clinical governance and accountability\n\
- Ongoing monitoring and maintenance\n\
- Accessibility and inclusivity";

const GENERIC_WHY: &str = "Articulate specific pain points and value.";

const REFLECTION_TAIL: &str = "- What human value might be lost? Preserve empathy, context, and shared decision-making.\n\
- How will success be measured? Define clinical, safety, and user metrics with baselines and targets.";

const RECOMMENDATIONS: &str = "5.1 Evidence-based insights (examples):\n\
- WHO guidance on digital health interventions emphasizes evidence, equity, and data protection (see references).\n\
- NIH and PubMed literature highlight usability, human factors, and rigorous evaluation for mHealth.\n\
\n\
5.2 Recommendations and safeguards:\n\
- Define a narrow, high-value use case and success metrics (clinical, safety, experience).\n\
- Build privacy by design, with encryption, access controls, and transparent data use.\n\
- Perform bias assessments; include diverse users in design and testing.\n\
- Add clear escalation pathways to humans; never block access to care.\n\
- Document model limits; avoid diagnostic claims without appropriate trials.\n\
\n\
5.3 Short, neutral expert summary:\n\
The concept is potentially viable if scoped, privacy-preserving, and evaluated with user-centered design, robust measurement, and appropriate clinical oversight.";

const VERDICT: &str = "Likely viable with a narrowly defined scope, strong privacy and safety controls, and staged evaluation (prototype → pilot → trial).";

const CHILD_EXPLANATION: &str = "We are making a smart helper for health. It can remind or guide people so they stay safe. Grown-ups will still check the helper’s work. We keep people’s secrets safe. If the helper is not sure, a person helps. We watch how it works to make it better.";

const RESOURCES: &str = "- WHO (for kids/teens): Basic health and safety topics — https://www.who.int\n\
- KidsHealth by Nemours: Health information for kids and parents — https://kidshealth.org\n\
- BBC Bitesize: Easy learning pages about science and health — https://www.bbc.co.uk/bitesize\n\
- National Geographic Kids: Science and body facts — https://kids.nationalgeographic.com\n\
- Science News for Students: Clear science news for young readers — https://www.snexplores.org";

const REFERENCES: &str = "- WHO guideline: Recommendations on digital interventions for health system strengthening (2019).\n\
- WHO/ITU: Focus on AI for health (various briefs).\n\
- NIH: Human factors in healthcare technology adoption.\n\
- PubMed: Systematic reviews on mHealth effectiveness and safety.";

const DISCLAIMER: &str = "This tool is for education and planning. It is not medical advice.";

// ============================================================================
// Sections
// ============================================================================

/// Report sections in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportSection {
    Summary,
    MedicalContext,
    Advantages,
    Risks,
    Complexities,
    Reflection,
    Recommendations,
    Verdict,
    ChildExplanation,
    Resources,
    GeneratedOn,
    References,
    Disclaimer,
}

impl ReportSection {
    pub const ALL: [ReportSection; 13] = [
        ReportSection::Summary,
        ReportSection::MedicalContext,
        ReportSection::Advantages,
        ReportSection::Risks,
        ReportSection::Complexities,
        ReportSection::Reflection,
        ReportSection::Recommendations,
        ReportSection::Verdict,
        ReportSection::ChildExplanation,
        ReportSection::Resources,
        ReportSection::GeneratedOn,
        ReportSection::References,
        ReportSection::Disclaimer,
    ];

    /// Heading text each rendered section starts with (after any leading
    /// newline).
    pub fn heading(self) -> &'static str {
        match self {
            ReportSection::Summary => "A. Summary of User’s Idea and Perspective",
            ReportSection::MedicalContext => "B. Medical Context and Importance",
            ReportSection::Advantages => "C. Advantages",
            ReportSection::Risks => "D. Disadvantages and Risks",
            ReportSection::Complexities => "E. Complexities and Implementation Barriers",
            ReportSection::Reflection => "F. Reflective Questions and Answers",
            ReportSection::Recommendations => "G. Expert Recommendations",
            ReportSection::Verdict => "H. Final Expert Verdict",
            ReportSection::ChildExplanation => "I. Simplified Child Explanation",
            ReportSection::Resources => "J. Educational Resources",
            ReportSection::GeneratedOn => "— Generated on",
            ReportSection::References => "References:",
            ReportSection::Disclaimer => "Note:",
        }
    }

    fn render(self, fields: &Fields<'_>, date: NaiveDate) -> String {
        let heading = self.heading();
        match self {
            ReportSection::Summary => format!(
                "{heading}\n\
                 - Idea: {}\n\
                 - Inspiration: {}\n\
                 - Beneficiaries: {}\n\
                 - Main problem: {}\n\
                 - Technology: {}\n\
                 - Expected impact: {}\n\
                 - Concerns: {}\n\
                 - Background: {}\n\
                 - Requested feedback: {}",
                fields.idea,
                fields.inspiration,
                fields.beneficiaries,
                fields.problem,
                fields.technology,
                fields.impact,
                fields.concerns,
                fields.background,
                fields.feedback,
            ),
            ReportSection::MedicalContext => format!(
                "{heading}\n\
                 This idea targets: {problem}. {MEDICAL_RELEVANCE}\n\
                 \n\
                 2.1 Restatement: {idea}\n\
                 \n\
                 2.2 Objectives, stakeholders, technology:\n\
                 - Objectives: {problem}\n\
                 - Stakeholders: {beneficiaries}\n\
                 - Technology base: {technology}\n\
                 \n\
                 {ASSUMPTIONS}\n\
                 \n\
                 {DIAGNOSIS}",
                problem = fields.problem,
                idea = fields.idea,
                beneficiaries = fields.beneficiaries,
                technology = fields.technology,
            ),
            ReportSection::Advantages => format!("{heading}\n{ADVANTAGES}"),
            ReportSection::Risks => format!("{heading}\n{RISKS}"),
            ReportSection::Complexities => format!("{heading}\n{COMPLEXITIES}"),
            ReportSection::Reflection => {
                let why = match fields.raw_inspiration {
                    Some(inspiration) => format!("Because: {inspiration}"),
                    None => GENERIC_WHY.to_string(),
                };
                format!("{heading}\n- Why automation here? {why}\n{REFLECTION_TAIL}")
            }
            ReportSection::Recommendations => format!("{heading}\n{RECOMMENDATIONS}"),
            ReportSection::Verdict => format!("{heading}\n{VERDICT}"),
            ReportSection::ChildExplanation => format!("{heading}\n{CHILD_EXPLANATION}"),
            ReportSection::Resources => format!("{heading}\n{RESOURCES}"),
            ReportSection::GeneratedOn => format!("\n{heading} {}", date.format("%Y-%m-%d")),
            ReportSection::References => format!("\n{heading}\n{REFERENCES}"),
            ReportSection::Disclaimer => format!("\n{heading} {DISCLAIMER}"),
        }
    }
}

/// Answer values after fallback substitution.
struct Fields<'a> {
    idea: &'a str,
    inspiration: &'a str,
    beneficiaries: &'a str,
    problem: &'a str,
    technology: &'a str,
    impact: &'a str,
    concerns: &'a str,
    background: &'a str,
    feedback: &'a str,
    /// Inspiration without fallback, `None` when blank.
    raw_inspiration: Option<&'a str>,
}

impl<'a> Fields<'a> {
    fn from_answers(answers: &'a AnswerSet) -> Self {
        Self {
            idea: or_fallback(&answers.idea),
            inspiration: or_fallback(&answers.inspiration),
            beneficiaries: or_fallback(&answers.beneficiaries),
            problem: or_fallback(&answers.problem),
            technology: or_fallback(&answers.technology),
            impact: or_fallback(&answers.impact),
            concerns: or_fallback(&answers.concerns),
            background: or_fallback(&answers.background),
            feedback: or_fallback(&answers.feedback),
            raw_inspiration: non_blank(&answers.inspiration),
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn or_fallback(value: &str) -> &str {
    non_blank(value).unwrap_or(FALLBACK_LABEL)
}

// ============================================================================
// Rendering
// ============================================================================

/// Render every section, in order, without joining them.
pub fn render_sections(answers: &AnswerSet, date: NaiveDate) -> Vec<(ReportSection, String)> {
    let fields = Fields::from_answers(answers);
    ReportSection::ALL
        .into_iter()
        .map(|section| (section, section.render(&fields, date)))
        .collect()
}

/// Render the full report text for `answers` dated `date`.
pub fn render_report(answers: &AnswerSet, date: NaiveDate) -> String {
    render_sections(answers, date)
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// A generated report, frozen at the moment the wizard completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    text: String,
    generated_on: NaiveDate,
}

impl Report {
    pub fn generate(answers: &AnswerSet, date: NaiveDate) -> Self {
        Self {
            text: render_report(answers, date),
            generated_on: date,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn generated_on(&self) -> NaiveDate {
        self.generated_on
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
