//! Поиск номера партии в произвольном тексте (например, результат OCR этикетки).
//!
//! Номер партии: 10 символов `A-Z0-9`, первый символ `5`. Текст разбирается
//! построчно; для каждой строки матчеры пробуются в фиксированном порядке,
//! первый успешный результат возвращается сразу.

use contracts::domain::a002_batch::aggregate::{BATCH_NUMBER_LEN, BATCH_NUMBER_PREFIX};
use once_cell::sync::Lazy;
use regex::Regex;

/// Матчер: строка (уже обрезанная и в верхнем регистре) -> найденный номер
pub type Matcher = fn(&str) -> Option<String>;

/// Порядок задаёт приоритет
pub const MATCHERS: &[(&str, Matcher)] = &[
    ("strict", match_strict),
    ("spaced_digits", match_spaced_digits),
    ("separated_groups", match_separated_groups),
];

/// `5 123 456 789`
static SPACED_DIGITS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"5\s+[0-9]{3}\s+[0-9]{3}\s+[0-9]{3}").expect("spaced digits pattern")
});

/// `5-ABC-DEF-GHI`, `5 ABC-DEF GHI`
static SEPARATED_GROUPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"5[\s\-]+[A-Z0-9]{3}[\s\-]+[A-Z0-9]{3}[\s\-]+[A-Z0-9]{3}")
        .expect("separated groups pattern")
});

/// Извлечь первый номер партии из текста
pub fn extract_batch(text: &str) -> Option<String> {
    text.split('\n')
        .map(|line| line.trim().to_uppercase())
        .find_map(|line| extract_from_line(&line))
}

/// Применить матчеры к одной нормализованной строке
pub fn extract_from_line(line: &str) -> Option<String> {
    MATCHERS.iter().find_map(|(name, matcher)| {
        let found = matcher(line);
        if let Some(batch) = &found {
            tracing::debug!(matcher = *name, batch = %batch, "Batch number matched");
        }
        found
    })
}

/// Отдельное слово ровно из 10 символов. Границы: любые не буквенно-цифровые
/// символы или края строки, поэтому куски более длинных токенов не подходят.
fn match_strict(line: &str) -> Option<String> {
    line.split(|c: char| !c.is_alphanumeric())
        .find(|token| is_batch_token(token))
        .map(str::to_string)
}

fn match_spaced_digits(line: &str) -> Option<String> {
    SPACED_DIGITS
        .find(line)
        .and_then(|m| strip_separators(m.as_str()))
}

fn match_separated_groups(line: &str) -> Option<String> {
    SEPARATED_GROUPS
        .find(line)
        .and_then(|m| strip_separators(m.as_str()))
}

fn is_batch_token(token: &str) -> bool {
    token.len() == BATCH_NUMBER_LEN
        && token.starts_with(BATCH_NUMBER_PREFIX)
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Убрать пробелы и дефисы из найденного фрагмента и проверить результат
fn strip_separators(span: &str) -> Option<String> {
    let candidate: String = span
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let mut chars = candidate.chars();
    let valid = candidate.chars().count() == BATCH_NUMBER_LEN
        && chars.next() == Some(BATCH_NUMBER_PREFIX)
        && chars.all(char::is_alphanumeric);

    valid.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_numeric_batch() {
        assert_eq!(
            extract_batch("PRODUCT: 5123456789 LOT: ABC123"),
            Some("5123456789".into())
        );
    }

    #[test]
    fn strict_alphanumeric_batch() {
        assert_eq!(
            extract_batch("BATCH 5ABCDEFGHI STATUS: OK"),
            Some("5ABCDEFGHI".into())
        );
    }

    #[test]
    fn wrong_leading_character() {
        assert_eq!(extract_batch("LOT: L123456789 STATUS: OK"), None);
    }

    #[test]
    fn too_short() {
        assert_eq!(extract_batch("CODE: 512345678 STATUS: OK"), None);
    }

    #[test]
    fn spaced_digit_groups() {
        assert_eq!(
            extract_batch("ITEM: 5 123 456 789 TYPE: A"),
            Some("5123456789".into())
        );
    }

    #[test]
    fn hyphenated_groups() {
        assert_eq!(
            extract_batch("NUMBER: 5-ABC-DEF-GHI STATUS: PASS"),
            Some("5ABCDEFGHI".into())
        );
    }

    #[test]
    fn longer_token_is_not_matched() {
        assert_eq!(extract_batch("SERIAL 51234567890 END"), None);
        assert_eq!(extract_batch("SERIAL X5123456789 END"), None);
    }

    #[test]
    fn punctuation_counts_as_boundary() {
        assert_eq!(
            extract_batch("LOT#5123456789;EXP 2026"),
            Some("5123456789".into())
        );
        assert_eq!(extract_batch("(5ABC123DEF)"), Some("5ABC123DEF".into()));
    }

    #[test]
    fn lowercase_input_is_upper_cased() {
        assert_eq!(
            extract_batch("  batch: 5abcdefghi  "),
            Some("5ABCDEFGHI".into())
        );
    }

    #[test]
    fn first_matching_line_wins() {
        let text = "HEADER\nLOT 5000000001\nLOT 5000000002\n";
        assert_eq!(extract_batch(text), Some("5000000001".into()));
    }

    #[test]
    fn strict_match_on_later_line_beats_nothing() {
        let text = "NO CODE HERE\r\nSTILL NOTHING\r\nCODE 5ZZZZZZZZZ\r\n";
        assert_eq!(extract_batch(text), Some("5ZZZZZZZZZ".into()));
    }

    #[test]
    fn strict_match_preferred_within_line() {
        assert_eq!(
            extract_batch("5 111 222 333 OR 5999999999"),
            Some("5999999999".into())
        );
    }

    #[test]
    fn no_batch_in_text() {
        assert_eq!(extract_batch(""), None);
        assert_eq!(extract_batch("nothing to see\nhere"), None);
    }

    #[test]
    fn non_ascii_letters_break_strict_match() {
        assert_eq!(extract_batch("5ÄBCDEFGHI"), None);
    }

    #[test]
    fn extraction_is_repeatable() {
        let text = "ITEM: 5 123 456 789 TYPE: A";
        assert_eq!(extract_batch(text), extract_batch(text));
    }

    #[test]
    fn matchers_run_in_declared_order() {
        let names: Vec<&str> = MATCHERS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["strict", "spaced_digits", "separated_groups"]);
    }

    #[test]
    fn strip_separators_validates_shape() {
        assert_eq!(strip_separators("5 - ABC - DEF - GHI"), Some("5ABCDEFGHI".into()));
        assert_eq!(strip_separators("5 12 34"), None);
    }
}
