//! Recipe reply segmentation.

/// Split a markdown reply into one string per recipe.
///
/// A recipe starts at a line whose first token is exactly `##`. Deeper
/// headings (`###`) stay inside the current recipe. Text before the first
/// heading is dropped, and each segment keeps its `## ` prefix. A reply with
/// no level-2 heading yields no recipes.
#[must_use]
pub fn split_recipes(markdown: &str) -> Vec<String> {
    let mut recipes = Vec::new();
    let mut current: Option<String> = None;

    for line in markdown.lines() {
        if let Some(title) = heading_title(line) {
            if let Some(done) = current.take() {
                push_trimmed(&mut recipes, &done);
            }
            current = Some(format!("## {title}\n"));
        } else if let Some(segment) = current.as_mut() {
            segment.push_str(line);
            segment.push('\n');
        }
    }

    if let Some(done) = current {
        push_trimmed(&mut recipes, &done);
    }
    recipes
}

fn heading_title(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if rest.is_empty() {
        return Some("");
    }
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

fn push_trimmed(recipes: &mut Vec<String>, segment: &str) {
    let segment = segment.trim();
    if !segment.is_empty() {
        recipes.push(segment.to_string());
    }
}
