//! List formatting for synthesized answers.

/// Items of the answer's list, if it is a list.
///
/// Recognizes `1.`/`1)` numbered lines and `-`/`*`/`•` bullet lines. Returns
/// the item texts in order, or an empty vector when no line is a list item.
pub fn numbered_items(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| list_item(line).map(|(_, item)| item.to_string()))
        .collect()
}

/// Rewrite bullet lists as numbered lists.
///
/// Each run of consecutive `-`/`*`/`•` lines is numbered from 1. When the
/// answer holds exactly one list line, bulleted or numbered, that line loses
/// its marker so a single match reads as a sentence.
pub fn renumber_bullets(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let mut items = lines.iter().filter_map(|l| list_item(l));
    if let (Some(_), None) = (items.next(), items.next()) {
        return lines
            .iter()
            .map(|line| list_item(line).map_or(*line, |(_, item)| item))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut out = Vec::with_capacity(lines.len());
    let mut counter = 0;

    for line in &lines {
        match bullet(line) {
            Some(item) => {
                counter += 1;
                out.push(format!("{}. {}", counter, item));
            }
            None => {
                if !line.trim().is_empty() {
                    counter = 0;
                }
                out.push(line.to_string());
            }
        }
    }

    out.join("\n")
}

fn bullet(line: &str) -> Option<&str> {
    match list_item(line) {
        Some((ListMarker::Bullet, item)) => Some(item),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListMarker {
    Bullet,
    Number,
}

fn list_item(line: &str) -> Option<(ListMarker, &str)> {
    let trimmed = line.trim_start();

    for marker in ['-', '*', '•'] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            if rest.starts_with(char::is_whitespace) {
                let item = rest.trim();
                return (!item.is_empty()).then_some((ListMarker::Bullet, item));
            }
        }
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &trimmed[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let item = rest.trim();
    (!item.is_empty()).then_some((ListMarker::Number, item))
}
