//! Column ordering.
//!
//! Strings use a locale-style order in three levels: base letters with
//! case and accents ignored, then accents, then case (lowercase first).
//! Salary compares numerically.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::types::{Column, Employee};

/// Compare two strings the way a user reading a sorted table expects.
///
/// Yields "adam" < "Émile" < "zed" and "elan" < "élan" < "Élan": accents
/// and case only break ties left by the base letters.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| case_order(a, b))
}

/// Lowercased letters with combining marks dropped.
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Lowercased letters, marks kept, in decomposed form.
fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (x, y) in a.nfd().zip(b.nfd()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(&y),
        };
    }

    a.nfd().count().cmp(&b.nfd().count())
}

/// Compare two employees by one column.
pub fn compare_by(column: Column, a: &Employee, b: &Employee) -> Ordering {
    match (a.text(column), b.text(column)) {
        (Some(x), Some(y)) => locale_cmp(x, y),
        _ => a.salary.cmp(&b.salary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_is_ignored_before_anything_else() {
        assert_eq!(locale_cmp("alice", "Bob"), Ordering::Less);
        assert_eq!(locale_cmp("Zed", "adam"), Ordering::Greater);
    }

    #[test]
    fn lowercase_sorts_before_uppercase_on_tie() {
        assert_eq!(locale_cmp("bob", "Bob"), Ordering::Less);
        assert_eq!(locale_cmp("Bob", "bob"), Ordering::Greater);
        assert_eq!(locale_cmp("Bob", "Bob"), Ordering::Equal);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(locale_cmp("Ann", "Anna"), Ordering::Less);
    }

    #[test]
    fn accented_letters_sort_with_their_base_letter() {
        assert_eq!(locale_cmp("Adam", "Émile"), Ordering::Less);
        assert_eq!(locale_cmp("Émile", "Zed"), Ordering::Less);
        assert_eq!(locale_cmp("Ölund", "Olsen"), Ordering::Greater);
    }

    #[test]
    fn accents_break_ties_before_case() {
        assert_eq!(locale_cmp("elan", "élan"), Ordering::Less);
        assert_eq!(locale_cmp("Elan", "élan"), Ordering::Less);
        assert_eq!(locale_cmp("élan", "Élan"), Ordering::Less);
    }

    #[test]
    fn precomposed_and_decomposed_forms_are_equal() {
        assert_eq!(locale_cmp("\u{e9}mile", "e\u{301}mile"), Ordering::Equal);
    }

    #[test]
    fn non_ascii_letters_fold_case() {
        assert_eq!(locale_cmp("élan", "ÉLAN"), Ordering::Less);
        assert_eq!(locale_cmp("Ölund", "ölund"), Ordering::Greater);
    }

    #[test]
    fn salary_compares_numerically() {
        let low = Employee::new("a", "b", "c", 9_000);
        let high = Employee::new("a", "b", "c", 10_000);
        assert_eq!(compare_by(Column::Salary, &low, &high), Ordering::Less);
    }

    #[test]
    fn text_columns_use_locale_order() {
        let a = Employee::new("x", "analyst", "HR", 1);
        let b = Employee::new("x", "Engineer", "HR", 1);
        assert_eq!(compare_by(Column::Position, &a, &b), Ordering::Less);
        assert_eq!(compare_by(Column::Department, &a, &b), Ordering::Equal);
    }
}
