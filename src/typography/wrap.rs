/// Greedy line breaking. Text is upper-cased first.
///
/// Words accumulate on a line while `measure(line + " " + word)` stays within `max_width`. The
/// first word of a line is always accepted, so a single over-long word overflows instead of being
/// split. The final line is always emitted, which makes blank input produce one empty line.
pub fn wrap_text(text: &str, max_width: f64, mut measure: impl FnMut(&str) -> f64) -> Vec<String> {
    let upper = text.to_uppercase();
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in upper.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    lines.push(line);
    lines
}

/// Split a headline into two lines of roughly equal character count. Text is upper-cased first.
///
/// Words are walked left to right, each contributing its length plus one for the following space;
/// the word at which the running total reaches half the text length closes the first line. If the
/// total never gets there the second line is empty.
pub fn balanced_headline_split(text: &str) -> (String, String) {
    let upper = text.to_uppercase();
    let words: Vec<&str> = upper.split_whitespace().collect();
    if words.is_empty() {
        return (String::new(), String::new());
    }

    let midpoint = upper.chars().count() as f64 / 2.0;
    let mut total = 0usize;
    let mut split = words.len() - 1;
    for (i, word) in words.iter().enumerate() {
        total += word.chars().count() + 1;
        if total as f64 >= midpoint {
            split = i;
            break;
        }
    }

    (words[..=split].join(" "), words[split + 1..].join(" "))
}

#[cfg(test)]
#[path = "../../tests/unit/typography/wrap.rs"]
mod tests;
