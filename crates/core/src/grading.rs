//! Answer grading.
//!
//! Grading is a pure function of the question and the submitted answer. It
//! never fails: malformed questions and answers whose shape does not fit the
//! question type simply grade as incorrect.

use std::collections::BTreeSet;

use crate::model::{Answer, MatchMode, OptionId, Question, QuestionKind};

/// Outcome of grading a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeResult {
    pub is_correct: bool,
}

impl GradeResult {
    #[must_use]
    pub fn new(is_correct: bool) -> Self {
        Self { is_correct }
    }
}

/// Grade `answer` against `question`.
#[must_use]
pub fn grade(question: &Question, answer: &Answer) -> GradeResult {
    GradeResult::new(is_correct(question, answer))
}

/// Boolean form of [`grade`].
#[must_use]
pub fn is_correct(question: &Question, answer: &Answer) -> bool {
    match (question.kind, answer) {
        (QuestionKind::SingleChoice, Answer::Choice(id)) => grade_single(question, id),
        (QuestionKind::MultipleChoice, Answer::Choices(ids)) => grade_multiple(question, ids),
        (QuestionKind::TextInput, Answer::Text(text)) => grade_text(question, text),
        _ => false,
    }
}

fn grade_single(question: &Question, selected: &OptionId) -> bool {
    if selected.is_empty() {
        return false;
    }
    question.option(selected).is_some_and(|opt| opt.is_correct)
}

fn grade_multiple(question: &Question, selected: &[OptionId]) -> bool {
    let correct: BTreeSet<&OptionId> = question.correct_options().map(|opt| &opt.id).collect();
    let chosen: BTreeSet<&OptionId> = selected.iter().collect();
    if chosen.is_empty() || correct.is_empty() {
        return false;
    }
    chosen == correct
}

fn grade_text(question: &Question, text: &str) -> bool {
    let user = normalize(text);
    if user.is_empty() {
        return false;
    }

    match question.match_mode {
        MatchMode::Exact => question
            .accepted_answers
            .iter()
            .any(|accepted| accepted.trim().to_lowercase() == user),
        MatchMode::Fuzzy => {
            let user = collapse_whitespace(&user);
            question.accepted_answers.iter().any(|accepted| {
                let accepted = collapse_whitespace(&normalize(accepted));
                // Substring containment in either direction: "the router"
                // matches "router". Short accepted answers over-match.
                // Blank accepted answers are skipped: every input contains "".
                !accepted.is_empty()
                    && (accepted == user || accepted.contains(&user) || user.contains(&accepted))
            })
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerOption;

    fn single() -> Question {
        Question::single_choice(
            "1",
            "Default port for HTTPS?",
            vec![
                AnswerOption::new("A", "80", false),
                AnswerOption::new("B", "443", true),
                AnswerOption::new("C", "8080", false),
            ],
        )
    }

    fn multiple() -> Question {
        Question::multiple_choice(
            "2",
            "Which are transport protocols?",
            vec![
                AnswerOption::new("A", "TCP", true),
                AnswerOption::new("B", "HTTP", false),
                AnswerOption::new("C", "UDP", true),
                AnswerOption::new("D", "DNS", false),
            ],
        )
    }

    fn text(mode: MatchMode) -> Question {
        Question::text_input("3", "Device that forwards packets?", ["Router"]).with_match_mode(mode)
    }

    #[test]
    fn single_choice_accepts_only_correct_id() {
        let q = single();
        assert!(is_correct(&q, &Answer::choice("B")));
        assert!(!is_correct(&q, &Answer::choice("")));
        assert!(!is_correct(&q, &Answer::choice("A")));
        assert!(!is_correct(&q, &Answer::choice("C")));
        assert!(!is_correct(&q, &Answer::choice("Z")));
    }

    #[test]
    fn single_choice_without_options_is_incorrect() {
        let mut q = single();
        q.options.clear();
        assert!(!is_correct(&q, &Answer::choice("B")));
    }

    #[test]
    fn multiple_choice_is_order_independent() {
        let q = multiple();
        assert!(is_correct(&q, &Answer::choices(["A", "C"])));
        assert!(is_correct(&q, &Answer::choices(["C", "A"])));
        assert!(is_correct(&q, &Answer::choices(["C", "A", "C"])));
    }

    #[test]
    fn multiple_choice_rejects_subset_superset_disjoint_and_empty() {
        let q = multiple();
        assert!(!is_correct(&q, &Answer::choices(["A"])));
        assert!(!is_correct(&q, &Answer::choices(["A", "B", "C"])));
        assert!(!is_correct(&q, &Answer::choices(["B", "D"])));
        assert!(!is_correct(&q, &Answer::choices(["A", "C", ""])));
        assert!(!is_correct(&q, &Answer::choices([""])));
        assert!(!is_correct(&q, &Answer::Choices(Vec::new())));
    }

    #[test]
    fn multiple_choice_without_correct_options_is_incorrect() {
        let mut q = multiple();
        for opt in &mut q.options {
            opt.is_correct = false;
        }
        assert!(!is_correct(&q, &Answer::choices(["A"])));
    }

    #[test]
    fn exact_mode_ignores_case_and_outer_whitespace_only() {
        let q = text(MatchMode::Exact);
        assert!(is_correct(&q, &Answer::text("  ROUTER ")));
        assert!(!is_correct(&q, &Answer::text("the router")));
        assert!(!is_correct(&q, &Answer::text("rout")));
    }

    #[test]
    fn fuzzy_mode_matches_substrings_both_ways() {
        let q = text(MatchMode::Fuzzy);
        assert!(is_correct(&q, &Answer::text("the router")));
        assert!(is_correct(&q, &Answer::text("rout")));
        assert!(!is_correct(&q, &Answer::text("switch")));
    }

    #[test]
    fn fuzzy_mode_collapses_internal_whitespace() {
        let q = Question::text_input("4", "?", ["access control list"]);
        assert!(is_correct(&q, &Answer::text("Access   control\tlist")));
    }

    #[test]
    fn fuzzy_mode_skips_blank_accepted_answers() {
        let q = Question::text_input("5", "?", ["", "  ", "firewall"]);
        assert!(!is_correct(&q, &Answer::text("switch")));
        assert!(is_correct(&q, &Answer::text("a firewall")));
    }

    #[test]
    fn blank_text_is_always_incorrect() {
        for mode in [MatchMode::Exact, MatchMode::Fuzzy] {
            let q = text(mode);
            assert!(!is_correct(&q, &Answer::text("")));
            assert!(!is_correct(&q, &Answer::text("   \t")));
        }
    }

    #[test]
    fn mismatched_answer_shape_is_incorrect() {
        assert!(!is_correct(&single(), &Answer::text("B")));
        assert!(!is_correct(&single(), &Answer::choices(["B"])));
        assert!(!is_correct(&multiple(), &Answer::choice("A")));
        assert!(!is_correct(&text(MatchMode::Fuzzy), &Answer::choice("router")));
    }

    #[test]
    fn unknown_kind_is_incorrect() {
        let mut q = single();
        q.kind = QuestionKind::Unknown;
        assert!(!grade(&q, &Answer::choice("B")).is_correct);
    }
}
