//! Regular expression operator trees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A regular expression as an operator tree.
///
/// `Empty` denotes the empty language and `Epsilon` the language holding
/// only the empty word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regex {
    Empty,
    Epsilon,
    Symbol(String),
    Concatenation(Box<Regex>, Box<Regex>),
    Union(Box<Regex>, Box<Regex>),
    KleeneStar(Box<Regex>),
}

impl Regex {
    pub fn symbol(name: impl Into<String>) -> Self {
        Regex::Symbol(name.into())
    }

    pub fn concat(left: Regex, right: Regex) -> Self {
        Regex::Concatenation(Box::new(left), Box::new(right))
    }

    pub fn union(left: Regex, right: Regex) -> Self {
        Regex::Union(Box::new(left), Box::new(right))
    }

    pub fn star(inner: Regex) -> Self {
        Regex::KleeneStar(Box::new(inner))
    }

    /// Concatenation of `parts` in order, `Epsilon` when there are none.
    pub fn sequence<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Regex>,
    {
        parts
            .into_iter()
            .reduce(Regex::concat)
            .unwrap_or(Regex::Epsilon)
    }

    /// Number of symbol leaves.
    pub fn num_symbols(&self) -> usize {
        match self {
            Regex::Empty | Regex::Epsilon => 0,
            Regex::Symbol(_) => 1,
            Regex::Concatenation(l, r) | Regex::Union(l, r) => l.num_symbols() + r.num_symbols(),
            Regex::KleeneStar(inner) => inner.num_symbols(),
        }
    }

    /// Number of concatenation, union and star nodes.
    pub fn num_operators(&self) -> usize {
        match self {
            Regex::Empty | Regex::Epsilon | Regex::Symbol(_) => 0,
            Regex::Concatenation(l, r) | Regex::Union(l, r) => {
                1 + l.num_operators() + r.num_operators()
            }
            Regex::KleeneStar(inner) => 1 + inner.num_operators(),
        }
    }

    /// Check whether the expression matches a word given as symbol names.
    /// Builds the automaton on every call.
    pub fn accepts<I>(&self, word: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.to_automaton().accepts(word)
    }

    // Simplifying constructors used when expressions are generated rather
    // than written. They never change the language.

    pub(crate) fn concat_simplified(left: Regex, right: Regex) -> Regex {
        match (left, right) {
            (Regex::Empty, _) | (_, Regex::Empty) => Regex::Empty,
            (Regex::Epsilon, other) | (other, Regex::Epsilon) => other,
            (left, right) => Regex::concat(left, right),
        }
    }

    pub(crate) fn union_simplified(left: Regex, right: Regex) -> Regex {
        match (left, right) {
            (Regex::Empty, other) | (other, Regex::Empty) => other,
            (left, right) if left == right => left,
            (left, right) => Regex::union(left, right),
        }
    }

    pub(crate) fn star_simplified(inner: Regex) -> Regex {
        match inner {
            Regex::Empty | Regex::Epsilon => Regex::Epsilon,
            starred @ Regex::KleeneStar(_) => starred,
            inner => Regex::star(inner),
        }
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Empty => f.write_str("∅"),
            Regex::Epsilon => f.write_str("$"),
            Regex::Symbol(name) => f.write_str(name),
            Regex::Concatenation(l, r) => write!(f, "({l}.{r})"),
            Regex::Union(l, r) => write!(f, "({l}|{r})"),
            Regex::KleeneStar(inner) => write!(f, "({inner})*"),
        }
    }
}
