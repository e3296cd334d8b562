use std::collections::BTreeSet;

use crate::models::{Question, SelectionMap};

/// Exact-set-match grading over the canonical question bank.
///
/// A question scores one point iff the selected label set equals the correct
/// label set exactly; no partial credit for multi-select. A missing entry in
/// the answer map is the empty set, never an error. The total is the
/// canonical question count, so a truncated or tampered payload cannot change
/// the denominator.
///
/// Pure function of (questions, answers): no store access, no side effects.
pub fn grade(questions: &[Question], answers: &SelectionMap) -> (u32, u32) {
    let total = questions.len() as u32;
    let mut score = 0;

    for question in questions {
        let correct: BTreeSet<&str> = question
            .options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.label.as_str())
            .collect();

        let selected: BTreeSet<&str> = answers
            .get(&question.id)
            .map(|labels| labels.iter().map(String::as_str).collect())
            .unwrap_or_default();

        // An empty correct set is structurally impossible for a validated
        // question; score it zero instead of failing the whole submission.
        if !correct.is_empty() && selected == correct {
            score += 1;
        }
    }

    (score, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionOption;

    fn question(id: &str, correct_labels: &[&str], option_count: u8) -> Question {
        let options = (0..option_count)
            .map(|i| {
                let label = char::from(b'A' + i).to_string();
                QuestionOption {
                    is_correct: correct_labels.contains(&label.as_str()),
                    text: format!("option {label}"),
                    image: None,
                    label,
                }
            })
            .collect();
        Question {
            id: id.to_string(),
            text: format!("question {id}"),
            image: None,
            multi: correct_labels.len() > 1,
            options,
        }
    }

    fn answers(entries: &[(&str, &[&str])]) -> SelectionMap {
        entries
            .iter()
            .map(|(id, labels)| {
                (
                    id.to_string(),
                    labels.iter().map(|l| l.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn full_marks_for_exact_matches() {
        let bank = vec![question("q1", &["A"], 4), question("q2", &["A", "C"], 4)];
        let map = answers(&[("q1", &["A"]), ("q2", &["C", "A"])]);
        assert_eq!(grade(&bank, &map), (2, 2));
    }

    #[test]
    fn superset_of_correct_scores_zero() {
        let bank = vec![question("q1", &["A", "C"], 4)];
        let map = answers(&[("q1", &["A", "B", "C"])]);
        assert_eq!(grade(&bank, &map), (0, 1));
    }

    #[test]
    fn subset_of_correct_scores_zero() {
        let bank = vec![question("q1", &["A", "C"], 4)];
        let map = answers(&[("q1", &["A"])]);
        assert_eq!(grade(&bank, &map), (0, 1));
    }

    #[test]
    fn missing_entry_is_empty_set_not_error() {
        let bank = vec![question("q1", &["A"], 2), question("q2", &["B"], 2)];
        let map = answers(&[("q2", &["B"])]);
        assert_eq!(grade(&bank, &map), (1, 2));
    }

    #[test]
    fn selection_order_is_irrelevant() {
        let bank = vec![question("q1", &["B", "D"], 4)];
        let map = answers(&[("q1", &["D", "B"])]);
        assert_eq!(grade(&bank, &map), (1, 1));
    }

    #[test]
    fn total_is_canonical_count_not_payload_size() {
        let bank = vec![
            question("q1", &["A"], 2),
            question("q2", &["A"], 2),
            question("q3", &["A"], 2),
        ];
        let map = answers(&[("q1", &["A"])]);
        assert_eq!(grade(&bank, &map), (1, 3));
    }

    #[test]
    fn question_without_correct_options_scores_zero() {
        let mut broken = question("q1", &[], 2);
        broken.options.iter_mut().for_each(|o| o.is_correct = false);
        let map = answers(&[("q1", &[])]);
        assert_eq!(grade(&[broken], &map), (0, 1));
    }

    #[test]
    fn answers_for_unknown_questions_are_ignored() {
        let bank = vec![question("q1", &["A"], 2)];
        let map = answers(&[("q1", &["A"]), ("ghost", &["A"])]);
        assert_eq!(grade(&bank, &map), (1, 1));
    }
}
