use defense_core::model::{Answer, OptionId, Question, QuestionKind};

/// Turn a typed line into an answer shaped for `question`.
///
/// Option ids match case-insensitively; multiple choices may be separated by
/// commas or whitespace.
#[must_use]
pub fn parse_answer(question: &Question, line: &str) -> Answer {
    match question.kind {
        QuestionKind::SingleChoice => Answer::Choice(resolve_option(question, line.trim())),
        QuestionKind::MultipleChoice => Answer::Choices(
            line.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(|part| resolve_option(question, part))
                .collect(),
        ),
        QuestionKind::TextInput | QuestionKind::Unknown => Answer::Text(line.trim().to_owned()),
    }
}

fn resolve_option(question: &Question, typed: &str) -> OptionId {
    question
        .options
        .iter()
        .find(|opt| opt.id.as_str().eq_ignore_ascii_case(typed))
        .map_or_else(|| OptionId::new(typed), |opt| opt.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use defense_core::model::AnswerOption;

    fn options() -> Vec<AnswerOption> {
        vec![
            AnswerOption::new("A", "TCP", true),
            AnswerOption::new("B", "IP", false),
            AnswerOption::new("C", "UDP", true),
        ]
    }

    #[test]
    fn single_choice_matches_id_case_insensitively() {
        let q = Question::single_choice("1", "?", options());
        assert_eq!(parse_answer(&q, " b "), Answer::choice("B"));
        assert_eq!(parse_answer(&q, ""), Answer::choice(""));
    }

    #[test]
    fn multiple_choice_splits_on_commas_and_spaces() {
        let q = Question::multiple_choice("2", "?", options());
        assert_eq!(parse_answer(&q, "a, c"), Answer::choices(["A", "C"]));
        assert_eq!(parse_answer(&q, "C A"), Answer::choices(["C", "A"]));
        assert_eq!(parse_answer(&q, "  "), Answer::Choices(Vec::new()));
    }

    #[test]
    fn text_input_keeps_the_line() {
        let q = Question::text_input("3", "?", ["router"]);
        assert_eq!(parse_answer(&q, "  the Router \n"), Answer::text("the Router"));
    }
}
