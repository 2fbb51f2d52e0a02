use std::collections::BTreeMap;
use std::fmt;

use crate::CacheableKey;

/// Characters with structural meaning in an encoded key.
const RESERVED: [char; 9] = ['\\', '(', ')', '|', ';', '=', ',', '[', ']'];

/// Appends `raw` to `out`, backslash-escaping every reserved character.
pub(crate) fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

/// The canonical key of one call: computation identity plus arguments.
///
/// Built by [`KeyBuilder`]. The encoding is
///
/// ```text
/// identity(positional_1|positional_2|;name_1=value_1|name_2=value_2|)
/// ```
///
/// where every component is escaped and terminated by `|`, so two keys are
/// equal exactly when the identity, the positional sequence and the set of
/// named pairs are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Incrementally assembles a [`CacheKey`].
///
/// Positional arguments keep their call order. Named arguments are sorted by
/// name, so the order in which they are recorded does not matter; recording
/// the same name twice keeps the last value.
///
/// # Examples
///
/// ```
/// use recall_core::KeyBuilder;
///
/// let mut a = KeyBuilder::new("render");
/// a.positional(&7).named("width", &80).named("color", &true);
///
/// let mut b = KeyBuilder::new("render");
/// b.positional(&7).named("color", &true).named("width", &80);
///
/// assert_eq!(a.finish(), b.finish());
///
/// let mut c = KeyBuilder::new("render");
/// c.positional(&7);
/// assert_eq!(c.finish().as_str(), "render(7|;)");
/// ```
#[derive(Clone, Debug)]
pub struct KeyBuilder {
    identity: String,
    positional: Vec<String>,
    named: BTreeMap<String, String>,
}

impl KeyBuilder {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            positional: Vec::new(),
            named: BTreeMap::new(),
        }
    }

    /// Appends the next positional argument.
    pub fn positional<T: CacheableKey + ?Sized>(&mut self, value: &T) -> &mut Self {
        self.positional_key(value.to_cache_key())
    }

    /// Appends a positional argument that is already a key component.
    pub fn positional_key(&mut self, component: String) -> &mut Self {
        self.positional.push(component);
        self
    }

    /// Records a named argument.
    pub fn named<T: CacheableKey + ?Sized>(&mut self, name: &str, value: &T) -> &mut Self {
        self.named_key(name, value.to_cache_key())
    }

    /// Records a named argument that is already a key component.
    pub fn named_key(&mut self, name: &str, component: String) -> &mut Self {
        self.named.insert(name.to_string(), component);
        self
    }

    pub fn finish(&self) -> CacheKey {
        let mut out = String::with_capacity(self.encoded_len_hint());
        escape_into(&mut out, &self.identity);
        out.push('(');
        for component in &self.positional {
            escape_into(&mut out, component);
            out.push('|');
        }
        out.push(';');
        for (name, component) in &self.named {
            escape_into(&mut out, name);
            out.push('=');
            escape_into(&mut out, component);
            out.push('|');
        }
        out.push(')');
        CacheKey(out)
    }

    fn encoded_len_hint(&self) -> usize {
        let positional: usize = self.positional.iter().map(|c| c.len() + 1).sum();
        let named: usize = self.named.iter().map(|(n, c)| n.len() + c.len() + 2).sum();
        self.identity.len() + positional + named + 3
    }
}
