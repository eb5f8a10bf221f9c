//! Client-side search over already-loaded items

/// Keeps the items whose text contains `query`, ignoring case
///
/// A blank query keeps everything.
pub fn filter<'a, T, F>(items: &'a [T], query: &str, text_of: F) -> Vec<&'a T>
where
    F: Fn(&T) -> String,
{
    let query = query.trim();
    if query.is_empty() {
        return items.iter().collect();
    }

    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| text_of(*item).to_lowercase().contains(&needle))
        .collect()
}
