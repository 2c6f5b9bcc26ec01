//! Path-addressed element filtering.
//!
//! A [`Filter`] maps logical paths (e.g. `/unmanaged_files/files/name`) to
//! [`Matcher`]s and answers whether a concrete value at that path should be
//! excluded. Filters are built once from one or more textual definitions and
//! queried repeatedly; there is no other state.
//!
//! # Definition syntax
//!
//! - `path=matcher` - one matcher for a path
//! - `path=a,b,c` - several matchers for the same path
//! - `path1=a,path2=b` - several paths in one definition
//! - a trailing `*` on a matcher denotes prefix matching, a leading `*`
//!   suffix matching
//! - `"quoted,value"` keeps a literal comma inside one matcher
//! - `\,` and `\@` escape a comma or `@` anywhere
//!
//! # Examples
//!
//! ```
//! use sysdiff::Filter;
//!
//! let filter = Filter::from_definition("/unmanaged_files/files/name=/opt*").unwrap();
//! assert!(filter.matches("/unmanaged_files/files/name", "/opt/foo"));
//! assert!(!filter.matches("/unmanaged_files/files/name", "/srv/bar"));
//! ```

use crate::collection::Collection;
use crate::error::FilterError;
use crate::schema::raw_type_name;
use indexmap::IndexMap;

/// Exact, prefix and suffix match rules for a single logical path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matcher {
    literals: Vec<String>,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a matcher from a raw argument: absent, a single string, or a
    /// list of strings. Anything else is a type error.
    pub fn from_raw(raw: &serde_json::Value) -> Result<Self, FilterError> {
        let mut matcher = Matcher::new();
        match raw {
            serde_json::Value::Null => {}
            serde_json::Value::String(entry) => matcher.add(entry),
            serde_json::Value::Array(entries) => {
                for entry in entries {
                    match entry {
                        serde_json::Value::String(entry) => matcher.add(entry),
                        other => {
                            return Err(FilterError::InvalidMatcher {
                                found: raw_type_name(other).to_string(),
                            })
                        }
                    }
                }
            }
            other => {
                return Err(FilterError::InvalidMatcher {
                    found: raw_type_name(other).to_string(),
                })
            }
        }
        Ok(matcher)
    }

    /// Adds one entry; a trailing `*` turns it into a prefix rule, a leading
    /// `*` into a suffix rule, anything else is an exact match.
    pub fn add(&mut self, entry: &str) {
        if let Some(prefix) = entry.strip_suffix('*') {
            if !self.prefixes.iter().any(|p| p == prefix) {
                self.prefixes.push(prefix.to_string());
            }
        } else if let Some(suffix) = entry.strip_prefix('*') {
            if !self.suffixes.iter().any(|s| s == suffix) {
                self.suffixes.push(suffix.to_string());
            }
        } else if !self.literals.iter().any(|l| l == entry) {
            self.literals.push(entry.to_string());
        }
    }

    /// Merges another matcher's rules into this one.
    pub fn merge(&mut self, other: &Matcher) {
        for literal in &other.literals {
            self.add(literal);
        }
        for prefix in &other.prefixes {
            self.add(&format!("{}*", prefix));
        }
        for suffix in &other.suffixes {
            self.add(&format!("*{}", suffix));
        }
    }

    /// True iff the value is a literal member, starts with any prefix, or
    /// ends with any suffix. An empty matcher matches nothing.
    pub fn matches(&self, value: &str) -> bool {
        self.literals.iter().any(|literal| literal == value)
            || self
                .prefixes
                .iter()
                .any(|prefix| value.starts_with(prefix.as_str()))
            || self
                .suffixes
                .iter()
                .any(|suffix| value.ends_with(suffix.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty() && self.prefixes.is_empty() && self.suffixes.is_empty()
    }

    /// The entries in definition form, prefix/suffix rules with their `*`
    /// restored.
    pub fn entries(&self) -> Vec<String> {
        self.literals
            .iter()
            .cloned()
            .chain(self.prefixes.iter().map(|prefix| format!("{}*", prefix)))
            .chain(self.suffixes.iter().map(|suffix| format!("*{}", suffix)))
            .collect()
    }
}

/// A mapping from logical path to [`Matcher`], merged from one or more
/// definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    matchers: IndexMap<String, Matcher>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a textual definition into a fresh filter.
    pub fn from_definition(definition: &str) -> Result<Self, FilterError> {
        let mut filter = Filter::new();
        filter.add_definition(definition)?;
        Ok(filter)
    }

    /// Parses a definition and merges it into this filter.
    pub fn add_definition(&mut self, definition: &str) -> Result<(), FilterError> {
        for (path, entries) in parse_definition(definition)? {
            let matcher = self.matchers.entry(path).or_default();
            for entry in &entries {
                matcher.add(entry);
            }
        }
        Ok(())
    }

    /// Merges entries for a path from a raw matcher argument (absent, string
    /// or list of strings; anything else is a type error).
    pub fn add_matchers(&mut self, path: &str, raw: &serde_json::Value) -> Result<(), FilterError> {
        let new_matcher = Matcher::from_raw(raw)?;
        self.matchers
            .entry(path.to_string())
            .or_default()
            .merge(&new_matcher);
        Ok(())
    }

    /// True iff a matcher exists for `path` and it matches `value`. Paths
    /// without a matcher never match.
    pub fn matches(&self, path: &str, value: &str) -> bool {
        match self.matchers.get(path) {
            Some(matcher) => matcher.matches(value),
            None => false,
        }
    }

    pub fn matcher_for(&self, path: &str) -> Option<&Matcher> {
        self.matchers.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// The filter in definition form, one `path=entry` string per entry.
    pub fn to_definitions(&self) -> Vec<String> {
        self.matchers
            .iter()
            .flat_map(|(path, matcher)| {
                matcher
                    .entries()
                    .into_iter()
                    .map(move |entry| format!("{}={}", path, entry))
            })
            .collect()
    }

    /// Returns a copy of `collection` without the elements whose `attribute`
    /// matches this filter at `base_path/attribute`. Used when rendering to
    /// hide excluded entries; elements without the attribute are kept.
    pub fn reject_elements(
        &self,
        collection: &Collection,
        base_path: &str,
        attribute: &str,
    ) -> Collection {
        let path = format!("{}/{}", base_path, attribute);
        let matcher = match self.matchers.get(&path) {
            Some(matcher) => matcher,
            None => return collection.clone(),
        };

        let mut result = collection.clone();
        let elements = result
            .take_elements()
            .into_iter()
            .filter(|element| {
                let value = element
                    .as_record()
                    .and_then(|record| record.get(attribute))
                    .and_then(|value| value.as_display_string());
                match value {
                    Some(value) => !matcher.matches(&value),
                    None => true,
                }
            })
            .collect();
        result.set_elements(elements);
        result
    }
}

/// Splits a definition into (path, matcher entries) groups.
///
/// Tokens are comma-separated outside quotes; a token containing `=` starts
/// a new path group and later tokens without `=` extend the current group's
/// matcher list. A leading matcher without any path is malformed.
fn parse_definition(definition: &str) -> Result<Vec<(String, Vec<String>)>, FilterError> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    for token in tokenize(definition) {
        match token.split_once('=') {
            Some((path, matcher)) => {
                let entries = if matcher.is_empty() {
                    Vec::new()
                } else {
                    vec![matcher.to_string()]
                };
                groups.push((path.to_string(), entries));
            }
            None => match groups.last_mut() {
                Some((_, entries)) => entries.push(token),
                None => {
                    return Err(FilterError::InvalidDefinition {
                        definition: definition.to_string(),
                    })
                }
            },
        }
    }

    Ok(groups)
}

/// Quote-aware, escape-aware comma splitting. Quotes group a token without
/// appearing in it; `\,`, `\@` and `\\` unescape to the bare character.
fn tokenize(definition: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = definition.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped @ (',' | '@' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
