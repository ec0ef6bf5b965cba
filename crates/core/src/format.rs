use crate::model::{AnswerOption, Question, QuestionKind};

/// Placeholder when a question carries no usable answer key.
pub const NOT_AVAILABLE: &str = "N/A";

/// Human-readable correct answer for `question`.
///
/// Choice questions render as `"<id>. <text>"` (comma-joined for multiple
/// choice, in option order); text questions join their accepted answers with
/// `" or "`. Returns [`NOT_AVAILABLE`] when nothing can be resolved.
#[must_use]
pub fn correct_answer_display(question: &Question) -> String {
    let rendered = match question.kind {
        QuestionKind::SingleChoice => question
            .correct_options()
            .next()
            .map(option_label)
            .unwrap_or_default(),
        QuestionKind::MultipleChoice => question
            .correct_options()
            .map(option_label)
            .collect::<Vec<_>>()
            .join(", "),
        QuestionKind::TextInput => question.accepted_answers.join(" or "),
        QuestionKind::Unknown => String::new(),
    };

    if rendered.trim().is_empty() {
        NOT_AVAILABLE.to_owned()
    } else {
        rendered
    }
}

fn option_label(option: &AnswerOption) -> String {
    format!("{}. {}", option.id, option.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_choice_uses_first_correct_option() {
        let q = Question::single_choice(
            "1",
            "?",
            vec![
                AnswerOption::new("A", "Firewall", false),
                AnswerOption::new("B", "IDS", true),
            ],
        );
        assert_eq!(correct_answer_display(&q), "B. IDS");
    }

    #[test]
    fn multiple_choice_joins_in_option_order() {
        let q = Question::multiple_choice(
            "2",
            "?",
            vec![
                AnswerOption::new("A", "TCP", true),
                AnswerOption::new("B", "HTTP", false),
                AnswerOption::new("C", "UDP", true),
            ],
        );
        assert_eq!(correct_answer_display(&q), "A. TCP, C. UDP");
    }

    #[test]
    fn text_input_joins_with_or() {
        let q = Question::text_input("3", "?", ["router", "gateway"]);
        assert_eq!(correct_answer_display(&q), "router or gateway");
    }

    #[test]
    fn unresolvable_questions_render_placeholder() {
        let no_correct =
            Question::single_choice("4", "?", vec![AnswerOption::new("A", "x", false)]);
        let no_options = Question::multiple_choice("5", "?", Vec::new());
        let no_answers = Question::text_input("6", "?", Vec::<String>::new());
        let mut unknown = Question::text_input("7", "?", ["x"]);
        unknown.kind = QuestionKind::Unknown;

        for q in [no_correct, no_options, no_answers, unknown] {
            assert_eq!(correct_answer_display(&q), NOT_AVAILABLE);
        }
    }
}
