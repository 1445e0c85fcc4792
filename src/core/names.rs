// case-insensitive, trim-normalized name identity
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().chars().map(fold_upper).collect())
    }
}

//simple one-to-one uppercase mapping; chars with a multi-char uppercase (ß) stay as they are
fn fold_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

pub fn names_match(a: &str, b: &str) -> bool {
    NameKey::new(a) == NameKey::new(b)
}

/// Insertion-ordered set of names compared case-insensitively.
///
/// Keeps the first spelling seen for each name so entry keys stay stable and
/// iteration follows input order.
#[derive(Debug, Clone, Default)]
pub struct OrderedNames {
    spellings: Vec<String>,
    index: HashMap<NameKey, usize>,
}

impl OrderedNames {
    pub fn new() -> Self {
        Self::default()
    }

    //returns false if the name (in any casing) was already present
    pub fn insert(&mut self, raw: &str) -> bool {
        let key = NameKey::new(raw);
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.spellings.len());
        self.spellings.push(raw.trim().to_string());
        true
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.index.contains_key(&NameKey::new(raw))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spellings.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.spellings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spellings.is_empty()
    }

    /// `self ∪ other`, entries of `self` first.
    pub fn union(&self, other: &OrderedNames) -> OrderedNames {
        let mut out = self.clone();
        for name in other.iter() {
            out.insert(name);
        }
        out
    }
}

impl<'a> FromIterator<&'a str> for OrderedNames {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut out = OrderedNames::new();
        for name in iter {
            out.insert(name);
        }
        out
    }
}
