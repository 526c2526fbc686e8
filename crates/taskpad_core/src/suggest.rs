use crate::model::{Suggestion, Task};
use std::collections::HashMap;

/// Frequency-derived suggestions are capped at this many entries.
pub const FREQUENT_TEXT_LIMIT: usize = 3;

/// Builds the quick re-entry candidates for a task list: every incomplete
/// task in original order, followed by up to three task texts ranked by how
/// often they occur across the whole list (completed or not). Equal counts
/// keep first-seen order; the two groups are not de-duplicated against each
/// other.
pub fn generate_suggestions(tasks: &[Task]) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = tasks
        .iter()
        .filter(|task| !task.completed)
        .map(|task| Suggestion {
            text: task.text.clone(),
            completed: task.completed,
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<&str> = Vec::new();
    for task in tasks {
        let count = counts.entry(task.text.as_str()).or_insert(0);
        if *count == 0 {
            ranked.push(task.text.as_str());
        }
        *count += 1;
    }

    // sort_by is stable, so ties retain the first-seen order of `ranked`.
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));

    suggestions.extend(
        ranked
            .into_iter()
            .take(FREQUENT_TEXT_LIMIT)
            .map(|text| Suggestion {
                text: text.to_string(),
                completed: false,
            }),
    );

    suggestions
}
