use crate::config::schema::{QuestionThresholds, ScoreRange, SideThresholds};

/// Repair a user-edited side threshold map so its ranges are contiguous
/// and cover exactly [0, 100], preserving category order.
///
/// Every interactive edit passes through here before classification, so
/// gapped or inverted ranges never reach the classifier.
pub fn repair_side(thresholds: &SideThresholds) -> SideThresholds {
    let entries: Vec<(String, ScoreRange)> = thresholds
        .iter()
        .map(|(c, r)| (c.to_string(), r))
        .collect();

    match entries.len() {
        0 => thresholds.clone(),
        1 => {
            let mut repaired = SideThresholds::new();
            repaired.set(entries[0].0.clone(), ScoreRange::new(0, 100));
            repaired
        }
        n => {
            let mut repaired: Vec<(String, ScoreRange)> = Vec::with_capacity(n);

            let first_max = entries[0].1.max.clamp(1, 100);
            repaired.push((entries[0].0.clone(), ScoreRange::new(0, first_max)));

            for (category, range) in &entries[1..n - 1] {
                let min = repaired[repaired.len() - 1].1.max;
                let max = (min + 1).max(range.max.min(100));
                repaired.push((category.clone(), ScoreRange::new(min, max)));
            }

            // Last category always ends at 100. If the chain already
            // reached 100, pull the previous max back to 99 so the last
            // range stays non-empty.
            let prev = repaired.len() - 1;
            if repaired[prev].1.max >= 100 {
                repaired[prev].1.max = 99;
            }
            let min = repaired[prev].1.max;
            repaired.push((entries[n - 1].0.clone(), ScoreRange::new(min, 100)));

            repaired.into_iter().collect()
        }
    }
}

/// Repair every side of a question.
pub fn repair_question(thresholds: &QuestionThresholds) -> QuestionThresholds {
    thresholds
        .sides()
        .map(|(side, st)| (side, repair_side(st)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(cats: &[(&str, (u32, u32))]) -> SideThresholds {
        cats.iter()
            .map(|(c, (min, max))| (c.to_string(), ScoreRange::new(*min, *max)))
            .collect()
    }

    fn assert_covering(repaired: &SideThresholds) {
        let entries: Vec<(String, ScoreRange)> = repaired
            .iter()
            .map(|(c, r)| (c.to_string(), r))
            .collect();
        assert_eq!(entries[0].1.min, 0);
        assert_eq!(entries[entries.len() - 1].1.max, 100);
        for pair in entries.windows(2) {
            assert_eq!(pair[0].1.max, pair[1].1.min);
        }
        for (_, range) in &entries {
            assert!(range.min < range.max);
        }
    }

    #[test]
    fn test_empty_unchanged() {
        let empty = SideThresholds::new();
        assert_eq!(repair_side(&empty), empty);
    }

    #[test]
    fn test_single_category_spans_everything() {
        let repaired = repair_side(&side(&[("ok", (10, 20))]));
        assert_eq!(repaired.get("ok"), Some(ScoreRange::new(0, 100)));
    }

    #[test]
    fn test_contiguous_input_unchanged() {
        let input = side(&[
            ("no scratches", (0, 50)),
            ("minor scratch", (50, 95)),
            ("major scratch", (95, 100)),
        ]);
        assert_eq!(repair_side(&input), input);
    }

    #[test]
    fn test_gaps_closed() {
        let repaired = repair_side(&side(&[
            ("low", (5, 30)),
            ("mid", (40, 60)),
            ("high", (80, 100)),
        ]));
        assert_covering(&repaired);
        assert_eq!(repaired.get("low"), Some(ScoreRange::new(0, 30)));
        assert_eq!(repaired.get("mid"), Some(ScoreRange::new(30, 60)));
        assert_eq!(repaired.get("high"), Some(ScoreRange::new(60, 100)));
    }

    #[test]
    fn test_inverted_middle_gets_minimal_width() {
        let repaired = repair_side(&side(&[
            ("low", (0, 70)),
            ("mid", (10, 20)),
            ("high", (90, 100)),
        ]));
        assert_covering(&repaired);
        // mid's declared max (20) is below its forced min (70).
        assert_eq!(repaired.get("mid"), Some(ScoreRange::new(70, 71)));
    }

    #[test]
    fn test_previous_max_pulled_back_for_last() {
        let repaired = repair_side(&side(&[("low", (0, 100)), ("high", (100, 100))]));
        assert_covering(&repaired);
        assert_eq!(repaired.get("low"), Some(ScoreRange::new(0, 99)));
        assert_eq!(repaired.get("high"), Some(ScoreRange::new(99, 100)));
    }

    #[test]
    fn test_order_preserved() {
        let repaired = repair_side(&side(&[("b", (20, 40)), ("a", (0, 20)), ("c", (40, 100))]));
        let order: Vec<&str> = repaired.categories().collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_repair_question_touches_every_side() {
        use crate::model::Side;
        let q: QuestionThresholds = [
            (Side::Back, side(&[("ok", (10, 20))])),
            (Side::Front, side(&[("low", (5, 50)), ("high", (60, 90))])),
        ]
        .into_iter()
        .collect();
        let repaired = repair_question(&q);
        assert_eq!(
            repaired.side(Side::Back).unwrap().get("ok"),
            Some(ScoreRange::new(0, 100))
        );
        assert_covering(repaired.side(Side::Front).unwrap());
    }
}
