//! Plain-text screens for the interactive exam.

use crate::session::{SessionEngine, SessionOutcome, SubjectProgress};

/// Line width for separators.
const LINE_WIDTH: usize = 60;

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
    pub const SELECTED: &str = "●";
    pub const UNSELECTED: &str = "○";
}

/// ```text
/// MATH
/// ════════════════════════════════════════════════════════════
/// ```
pub fn header(title: &str) -> String {
    format!("{}\n{}", title.to_uppercase(), "═".repeat(LINE_WIDTH))
}

/// Letter shown next to the option at `index`.
pub fn option_letter(index: usize) -> char {
    char::from(b'a' + (index % 26) as u8)
}

/// The current question with its options and the clock.
///
/// ```text
/// MATH
/// ════════════════════════════════════════════════════════════
/// Question 2/5                         12:04 left · 3/7 answered
///
/// What is 2 + 2?
///
///   ○ a) 3
///   ● b) 4
/// ```
pub fn question_screen(engine: &SessionEngine) -> String {
    let subject = engine.current_subject();
    let mut out = header(&subject.subject);
    out.push('\n');

    let position = format!("Question {}/{}", engine.current_index() + 1, subject.len());
    let status = format!(
        "{} left · {}/{} answered",
        engine.clock().display(),
        engine.answered_count(),
        engine.total_questions()
    );
    let gap = LINE_WIDTH.saturating_sub(position.chars().count() + status.chars().count());
    out.push_str(&format!("{}{}{}\n\n", position, " ".repeat(gap.max(1)), status));

    if let Some(question) = engine.current_question() {
        out.push_str(&question.text);
        out.push_str("\n\n");
        let selected = engine.selected_answer(&question.id);
        for (i, answer) in question.answers.iter().enumerate() {
            let mark = if selected == Some(answer.id.as_str()) {
                icons::SELECTED
            } else {
                icons::UNSELECTED
            };
            out.push_str(&format!("  {} {}) {}\n", mark, option_letter(i), answer.text));
        }
    }
    out
}

/// One line per subject.
///
/// ```text
///   ✓ math       5/5
///     physics    1/2
/// ```
pub fn progress_lines(progress: &[SubjectProgress]) -> String {
    let width = progress
        .iter()
        .map(|p| p.subject.chars().count())
        .max()
        .unwrap_or(0);
    progress
        .iter()
        .map(|p| {
            let icon = if p.complete { icons::SUCCESS } else { " " };
            format!(
                "  {} {:<width$}  {}/{}",
                icon,
                p.subject,
                p.answered,
                p.total,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn outcome_message(outcome: &SessionOutcome) -> String {
    match outcome {
        SessionOutcome::Completed { attempt_id } => format!(
            "{} Attempt {} submitted. Results are available in the app.",
            icons::SUCCESS,
            attempt_id
        ),
        SessionOutcome::Aborted { attempt_id, reason } => format!(
            "{} Attempt {} was not completed ({}). Please sign in again.",
            icons::FAILURE,
            attempt_id,
            reason
        ),
    }
}
