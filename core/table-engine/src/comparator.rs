//! FILENAME: core/table-engine/src/comparator.rs
//! PURPOSE: Value-type-aware ordering used by sorting and unique-value lists.
//! CONTEXT: `compare_values` is the default comparator. Empty values always
//! sort last; the sort engine relies on that when it applies a direction.
//!
//! ORDER RULES:
//! - Numbers compare numerically
//! - Booleans: true before false
//! - Dates compare by timestamp
//! - Text uses natural, case-insensitive collation ("item2" < "item10")
//! - Mixed types fall back to collating the display strings

use std::cmp::Ordering;

use crate::cell::CellValue;

/// Default comparator. Empty is greater than everything else.
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    if std::ptr::eq(a, b) {
        return Ordering::Equal;
    }
    match (a, b) {
        (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
        (CellValue::Empty, _) => Ordering::Greater,
        (_, CellValue::Empty) => Ordering::Less,
        (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
        (CellValue::Boolean(x), CellValue::Boolean(y)) => y.cmp(x),
        (CellValue::Date(x), CellValue::Date(y)) => x.cmp(y),
        (CellValue::Text(x), CellValue::Text(y)) => collate(x, y),
        _ => collate(&a.display_value(), &b.display_value()),
    }
}

/// Natural, case-insensitive, accent-insensitive string comparison.
pub fn collate(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.chars().flat_map(fold_char).collect();
    let b: Vec<char> = b.chars().flat_map(fold_char).collect();

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let start_a = i;
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            let start_b = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            let ord = compare_digit_runs(&a[start_a..i], &b[start_b..j]);
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = a[i].cmp(&b[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }
    (a.len() - i).cmp(&(b.len() - j))
}

fn compare_digit_runs(a: &[char], b: &[char]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(digits: &[char]) -> &[char] {
    let first = digits.iter().position(|c| *c != '0').unwrap_or(digits.len());
    &digits[first..]
}

/// Lowercases and strips Latin diacritics.
fn fold_char(c: char) -> impl Iterator<Item = char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'a',
        'ç' | 'Ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => 'i',
        'ñ' | 'Ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => 'u',
        'ý' | 'ÿ' | 'Ý' => 'y',
        other => other,
    };
    base.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_sorts_last() {
        assert_eq!(compare_values(&CellValue::Empty, &CellValue::Number(1.0)), Ordering::Greater);
        assert_eq!(compare_values(&CellValue::from("a"), &CellValue::Empty), Ordering::Less);
        assert_eq!(compare_values(&CellValue::Empty, &CellValue::Empty), Ordering::Equal);
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare_values(&2.0.into(), &10.0.into()), Ordering::Less);
        assert_eq!(compare_values(&(-1.0).into(), &(-1.0).into()), Ordering::Equal);
    }

    #[test]
    fn true_sorts_before_false() {
        assert_eq!(compare_values(&true.into(), &false.into()), Ordering::Less);
    }

    #[test]
    fn dates_compare_by_timestamp() {
        let early = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(compare_values(&early.into(), &late.into()), Ordering::Less);
    }

    #[test]
    fn text_is_natural_and_case_insensitive() {
        assert_eq!(collate("item2", "item10"), Ordering::Less);
        assert_eq!(collate("Apple", "apple"), Ordering::Equal);
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("file007", "file7"), Ordering::Equal);
        assert_eq!(collate("abc", "ab"), Ordering::Greater);
    }

    #[test]
    fn accents_are_folded() {
        assert_eq!(collate("école", "ecole"), Ordering::Equal);
        assert_eq!(collate("Émile", "emma"), Ordering::Less);
    }

    #[test]
    fn mixed_types_collate_as_strings() {
        assert_eq!(compare_values(&CellValue::from("10"), &CellValue::Number(9.0)), Ordering::Greater);
        assert_eq!(compare_values(&CellValue::Number(1.0), &CellValue::from("b")), Ordering::Less);
    }
}
