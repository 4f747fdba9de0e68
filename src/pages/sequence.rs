//! Natural ordering of page names.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use super::PageDocument;

/// Sort pages by name in natural order and assign their final indices.
///
/// The sort is stable: names that compare equal keep their incoming order.
pub fn sequence(mut pages: Vec<PageDocument>) -> Vec<PageDocument> {
    pages.sort_by(|a, b| natural_cmp(&a.name, &b.name));
    for (index, page) in pages.iter_mut().enumerate() {
        page.index = index;
    }
    pages
}

/// Compare two names so that `page2` sorts before `page10`.
///
/// Digit runs compare by value, with leading zeros ignored; everything else
/// compares case-insensitively, character by character. When two names differ
/// only in zero padding, the less padded one sorts first.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    let mut padding = Ordering::Equal;

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return padding,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = digit_run(&mut a);
                let run_b = digit_run(&mut b);
                match compare_numeric(&run_a, &run_b) {
                    Ordering::Equal => {
                        if padding == Ordering::Equal {
                            padding = run_a.len().cmp(&run_b.len());
                        }
                    }
                    other => return other,
                }
            }
            (Some(x), Some(y)) => {
                a.next();
                b.next();
                match x.to_lowercase().cmp(y.to_lowercase()) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
        }
    }
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

/// Compare digit strings by value without overflow.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(pages: &[PageDocument]) -> Vec<&str> {
        pages.iter().map(|p| p.name.as_str()).collect()
    }

    fn page(name: &str) -> PageDocument {
        PageDocument::new(name, "<svg/>", 1.0, 1.0)
    }

    #[test]
    fn test_numeric_runs() {
        let pages = sequence(vec![page("page10.svg"), page("page2.svg"), page("page1.svg")]);
        assert_eq!(names(&pages), ["page1.svg", "page2.svg", "page10.svg"]);
        assert_eq!(
            pages.iter().map(|p| p.index).collect::<Vec<_>>(),
            [0, 1, 2]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(natural_cmp("B.svg", "a.svg"), Ordering::Greater);
        assert_eq!(natural_cmp("Cover.svg", "chapter.svg"), Ordering::Greater);
        assert_eq!(natural_cmp("A.svg", "a.svg"), Ordering::Equal);
    }

    #[test]
    fn test_leading_zeros() {
        assert_eq!(natural_cmp("p007", "p7"), Ordering::Greater);
        assert_eq!(natural_cmp("p007", "p8"), Ordering::Less);
        assert_eq!(natural_cmp("p01a", "p1b"), Ordering::Less);
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        assert_eq!(
            natural_cmp("p99999999999999999999999", "p100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_stable_for_equal_names() {
        let mut first = page("X.svg");
        first.content = "first".into();
        let mut second = page("x.svg");
        second.content = "second".into();

        let pages = sequence(vec![first, second]);
        assert_eq!(&*pages[0].content, "first");
        assert_eq!(&*pages[1].content, "second");
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("page", "page1"), Ordering::Less);
        assert_eq!(natural_cmp("", ""), Ordering::Equal);
    }
}
