/// Decides whether a key passes a non-empty filter.
///
/// An empty filter never reaches the matcher; every entry passes it.
pub trait Matcher {
    fn matches(&self, filter: &str, key: &str) -> bool;
}

/// Case-insensitive substring test.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringMatcher;

impl Matcher for SubstringMatcher {
    fn matches(&self, filter: &str, key: &str) -> bool {
        key.to_lowercase().contains(&filter.to_lowercase())
    }
}

impl<F> Matcher for F
where
    F: Fn(&str, &str) -> bool,
{
    fn matches(&self, filter: &str, key: &str) -> bool {
        self(filter, key)
    }
}
