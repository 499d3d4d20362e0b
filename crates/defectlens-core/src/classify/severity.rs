use crate::config::schema::QuestionThresholds;

/// Derive the severity order over a question's categories: most severe
/// first, where severity is the maximum `max` bound a category reaches on
/// any side. Ties keep first-seen order (earliest side, earliest category
/// within that side).
pub fn severity_order(thresholds: &QuestionThresholds) -> Vec<String> {
    let mut seen: Vec<(String, u32)> = Vec::new();
    for (_, side) in thresholds.sides() {
        for (category, range) in side.iter() {
            match seen.iter_mut().find(|(c, _)| c == category) {
                Some((_, max)) => *max = (*max).max(range.max),
                None => seen.push((category.to_string(), range.max)),
            }
        }
    }
    seen.sort_by(|a, b| b.1.cmp(&a.1));
    seen.into_iter().map(|(c, _)| c).collect()
}

/// The least severe category, i.e. the tail of the severity order.
pub fn least_severe(order: &[String]) -> Option<&str> {
    order.last().map(String::as_str)
}
