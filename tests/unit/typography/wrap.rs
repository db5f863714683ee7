use super::*;

fn chars(s: &str) -> f64 {
    s.chars().count() as f64
}

#[test]
fn wraps_greedily_and_uppercases() {
    let lines = wrap_text("the quick brown fox jumps", 10.0, chars);
    assert_eq!(lines, vec!["THE QUICK", "BROWN FOX", "JUMPS"]);
}

#[test]
fn every_multi_word_line_fits() {
    let text = "a bb ccc dddd eeeee ffffff ggggggg";
    for max in [3.0, 7.0, 12.0, 100.0] {
        for line in wrap_text(text, max, chars) {
            if line.contains(' ') {
                assert!(chars(&line) <= max, "{line:?} exceeds {max}");
            }
        }
    }
}

#[test]
fn over_long_word_stands_alone() {
    let lines = wrap_text("hi supercalifragilistic yo", 5.0, chars);
    assert_eq!(lines, vec!["HI", "SUPERCALIFRAGILISTIC", "YO"]);
}

#[test]
fn whitespace_only_input_yields_one_empty_line() {
    assert_eq!(wrap_text("   \t ", 10.0, chars), vec![String::new()]);
    assert_eq!(wrap_text("", 10.0, chars), vec![String::new()]);
}

#[test]
fn measure_sees_space_joined_candidates() {
    let mut seen = Vec::new();
    let _ = wrap_text("a b", 100.0, |s| {
        seen.push(s.to_string());
        0.0
    });
    assert_eq!(seen, vec!["A B"]);
}

#[test]
fn balanced_split_crosses_midpoint() {
    assert_eq!(
        balanced_headline_split("A B C D"),
        ("A B".to_string(), "C D".to_string())
    );
    assert_eq!(
        balanced_headline_split("test headline here"),
        ("TEST HEADLINE".to_string(), "HERE".to_string())
    );
}

#[test]
fn single_word_headline_keeps_second_line_empty() {
    assert_eq!(
        balanced_headline_split("unstoppable"),
        ("UNSTOPPABLE".to_string(), String::new())
    );
    assert_eq!(balanced_headline_split("  "), (String::new(), String::new()));
}
