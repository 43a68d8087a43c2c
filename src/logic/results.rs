//! Result reports: pick winner names out of the host's free-text message.

use crate::models::LeagueError;

/// A league is decided over a fixed best-of-3, so a report names exactly three winners.
pub const RESULTS_PER_REPORT: usize = 3;

/// Characters dropped around a winner name ("Match 1: Alice -", "**Bob**").
const LABEL_PUNCTUATION: &[char] = &[':', '-', '.', ',', ')', '|', '*', '–', '—'];

/// True when the message is meant as a result report (starts with "match", any case).
pub fn is_result_report(text: &str) -> bool {
    strip_prefix_ignore_case(text.trim_start(), "match").is_some()
}

/// Extract the ordered winner names from a report.
///
/// Every line containing "won" yields the name written before it, with a leading
/// "Match N" label removed. Fails unless exactly [`RESULTS_PER_REPORT`] names are found.
pub fn parse_match_results(text: &str) -> Result<Vec<String>, LeagueError> {
    let winners: Vec<String> = text.lines().filter_map(winner_from_line).collect();
    if winners.len() != RESULTS_PER_REPORT {
        return Err(LeagueError::WrongResultCount {
            found: winners.len(),
        });
    }
    Ok(winners)
}

/// Winner named on a single line, if the line reports one.
pub fn winner_from_line(line: &str) -> Option<String> {
    let at = find_won(line)?;
    Some(strip_match_label(&line[..at]).to_string())
}

/// Byte offset of the "won" keyword. Prefers a standalone word so names like "Wonda" survive.
fn find_won(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let hits: Vec<usize> = bytes
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w.eq_ignore_ascii_case(b"won"))
        .map(|(i, _)| i)
        .collect();
    hits.iter()
        .copied()
        .find(|&i| is_word_boundary(line, i, i + 3))
        .or_else(|| hits.first().copied())
}

fn is_word_boundary(line: &str, start: usize, end: usize) -> bool {
    let before = line[..start].chars().next_back();
    let after = line[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Drop a leading "Match", "Match 2", "match #3:" label and the punctuation around the name.
fn strip_match_label(text: &str) -> &str {
    let text = text.trim();
    let rest = match strip_prefix_ignore_case(text, "match") {
        Some(rest) if !rest.starts_with(char::is_alphabetic) => {
            strip_match_number(rest.trim_start_matches(|c: char| c.is_whitespace() || c == '#'))
        }
        _ => text,
    };
    rest.trim_matches(|c: char| c.is_whitespace() || LABEL_PUNCTUATION.contains(&c))
}

/// Drop a leading match number only when it stands alone, so "2Pac" keeps its digit.
fn strip_match_number(text: &str) -> &str {
    let rest = text.trim_start_matches(|c: char| c.is_ascii_digit());
    match rest.chars().next() {
        Some(c) if c.is_whitespace() || LABEL_PUNCTUATION.contains(&c) => rest,
        None => rest,
        Some(_) => text,
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_and_number_are_stripped() {
        assert_eq!(winner_from_line("Match 1 Alice won").as_deref(), Some("Alice"));
        assert_eq!(winner_from_line("match #2: Bob won").as_deref(), Some("Bob"));
        assert_eq!(winner_from_line("MATCH 3 - Carol WON").as_deref(), Some("Carol"));
    }

    #[test]
    fn name_starting_with_digit_is_kept() {
        assert_eq!(winner_from_line("Match 2Pac won").as_deref(), Some("2Pac"));
        assert_eq!(winner_from_line("Match 3 2Pac won").as_deref(), Some("2Pac"));
        assert_eq!(winner_from_line("match #1: 9Lives won").as_deref(), Some("9Lives"));
    }

    #[test]
    fn line_without_label_keeps_name() {
        assert_eq!(winner_from_line("Dave won").as_deref(), Some("Dave"));
    }

    #[test]
    fn name_containing_won_is_kept() {
        assert_eq!(winner_from_line("Match 1 Wonda won").as_deref(), Some("Wonda"));
    }

    #[test]
    fn name_starting_with_match_is_kept() {
        assert_eq!(winner_from_line("Matchmaker won").as_deref(), Some("Matchmaker"));
    }

    #[test]
    fn lines_without_won_are_skipped() {
        assert_eq!(winner_from_line("Match 1 Alice lost"), None);
    }

    #[test]
    fn report_prefix_is_case_insensitive() {
        assert!(is_result_report("MATCH 1 Alice won"));
        assert!(is_result_report("  match results"));
        assert!(!is_result_report("gg, match 1 Alice won"));
        assert!(!is_result_report("mat"));
    }
}
