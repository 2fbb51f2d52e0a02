use std::fmt::Debug;

use crate::cache_key::{escape_into, KeyBuilder};

/// Converts a single argument value into its cache key component.
///
/// Two values must produce the same component if and only if a deterministic
/// computation would treat them as the same input. Components are escaped by
/// [`KeyBuilder`] before they are joined, so an implementation does not have to
/// worry about separators.
///
/// # Examples
///
/// ```
/// use recall_core::CacheableKey;
///
/// #[derive(Debug, Clone)]
/// struct UserId {
///     id: u64,
///     region: String,
/// }
///
/// // The region is not part of the identity of a user.
/// impl CacheableKey for UserId {
///     fn to_cache_key(&self) -> String {
///         format!("user:{}", self.id)
///     }
/// }
///
/// let a = UserId { id: 7, region: "eu".into() };
/// let b = UserId { id: 7, region: "us".into() };
/// assert_eq!(a.to_cache_key(), b.to_cache_key());
/// ```
pub trait CacheableKey {
    fn to_cache_key(&self) -> String;
}

/// Opt-in marker for types whose `Debug` output is a good enough key.
///
/// ```
/// use recall_core::{CacheableKey, DefaultCacheableKey};
///
/// #[derive(Debug)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl DefaultCacheableKey for Point {}
///
/// assert_eq!(Point { x: 1, y: 2 }.to_cache_key(), "Point { x: 1, y: 2 }");
/// ```
///
/// A type implements either this marker or [`CacheableKey`], never both.
pub trait DefaultCacheableKey: Debug {}

impl<T: Debug + DefaultCacheableKey> CacheableKey for T {
    fn to_cache_key(&self) -> String {
        format!("{:?}", self)
    }
}

macro_rules! display_cacheable_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl CacheableKey for $t {
                #[inline]
                fn to_cache_key(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_cacheable_key!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String,
);

impl CacheableKey for () {
    fn to_cache_key(&self) -> String {
        "()".to_string()
    }
}

impl<T: CacheableKey> CacheableKey for Option<T> {
    fn to_cache_key(&self) -> String {
        match self {
            Some(value) => {
                let mut out = String::from("Some(");
                escape_into(&mut out, &value.to_cache_key());
                out.push(')');
                out
            }
            None => "None".to_string(),
        }
    }
}

fn sequence_key<'a, T: CacheableKey + 'a>(items: impl Iterator<Item = &'a T>) -> String {
    let mut out = String::from("[");
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(',');
        }
        escape_into(&mut out, &item.to_cache_key());
    }
    out.push(']');
    out
}

impl<T: CacheableKey> CacheableKey for [T] {
    fn to_cache_key(&self) -> String {
        sequence_key(self.iter())
    }
}

impl<T: CacheableKey> CacheableKey for Vec<T> {
    fn to_cache_key(&self) -> String {
        sequence_key(self.iter())
    }
}

impl<A: CacheableKey, B: CacheableKey> CacheableKey for (A, B) {
    fn to_cache_key(&self) -> String {
        let mut out = String::from("(");
        escape_into(&mut out, &self.0.to_cache_key());
        out.push(',');
        escape_into(&mut out, &self.1.to_cache_key());
        out.push(')');
        out
    }
}

impl<A: CacheableKey, B: CacheableKey, C: CacheableKey> CacheableKey for (A, B, C) {
    fn to_cache_key(&self) -> String {
        let mut out = String::from("(");
        escape_into(&mut out, &self.0.to_cache_key());
        out.push(',');
        escape_into(&mut out, &self.1.to_cache_key());
        out.push(',');
        escape_into(&mut out, &self.2.to_cache_key());
        out.push(')');
        out
    }
}

/// The full argument list of one call to a memoized computation.
///
/// Tuples of [`CacheableKey`] values are positional argument lists, in call
/// order. Request types with named fields implement this trait by hand and
/// record their fields as named arguments:
///
/// ```
/// use recall_core::{KeyArgs, KeyBuilder};
///
/// struct Search {
///     query: String,
///     page: u32,
/// }
///
/// impl KeyArgs for Search {
///     fn write_key(&self, key: &mut KeyBuilder) {
///         key.named("query", &self.query).named("page", &self.page);
///     }
/// }
///
/// let mut key = KeyBuilder::new("search");
/// Search { query: "rust".into(), page: 2 }.write_key(&mut key);
/// assert_eq!(key.finish().as_str(), "search(;page=2|query=rust|)");
/// ```
pub trait KeyArgs {
    fn write_key(&self, key: &mut KeyBuilder);
}

impl KeyArgs for () {
    fn write_key(&self, _key: &mut KeyBuilder) {}
}

macro_rules! tuple_key_args {
    ($(($($name:ident),+)),+ $(,)?) => {
        $(
            impl<$($name: CacheableKey),+> KeyArgs for ($($name,)+) {
                #[allow(non_snake_case)]
                fn write_key(&self, key: &mut KeyBuilder) {
                    let ($($name,)+) = self;
                    $(
                        key.positional($name);
                    )+
                }
            }
        )+
    };
}

tuple_key_args!(
    (A),
    (A, B),
    (A, B, C),
    (A, B, C, D),
    (A, B, C, D, E),
    (A, B, C, D, E, F),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl DefaultCacheableKey for Point {}

    fn key_of<A: KeyArgs>(args: &A) -> String {
        let mut key = KeyBuilder::new("f");
        args.write_key(&mut key);
        key.finish().as_str().to_string()
    }

    #[test]
    fn test_primitive_keys() {
        assert_eq!(42i32.to_cache_key(), "42");
        assert_eq!(true.to_cache_key(), "true");
        assert_eq!('x'.to_cache_key(), "x");
        assert_eq!("hello".to_cache_key(), "hello");
        assert_eq!(String::from("hello").to_cache_key(), "hello");
    }

    #[test]
    fn test_default_key_uses_debug() {
        assert_eq!(Point { x: 1, y: 2 }.to_cache_key(), "Point { x: 1, y: 2 }");
    }

    #[test]
    fn test_option_keys_are_distinct() {
        assert_eq!(None::<String>.to_cache_key(), "None");
        assert_eq!(Some("None".to_string()).to_cache_key(), "Some(None)");
        assert_ne!(Some(Some(1)).to_cache_key(), Some(1).to_cache_key());
    }

    #[test]
    fn test_sequence_keys_escape_separators() {
        let joined = vec!["a,b".to_string()];
        let split = vec!["a".to_string(), "b".to_string()];
        assert_ne!(joined.to_cache_key(), split.to_cache_key());
        assert_eq!(vec![1, 2, 3].to_cache_key(), "[1,2,3]");
        assert_eq!([1u8, 2][..].to_cache_key(), "[1,2]");
    }

    #[test]
    fn test_tuple_values() {
        assert_eq!((1, 'a').to_cache_key(), "(1,a)");
        assert_ne!(
            ("a,b".to_string(), 1).to_cache_key(),
            ("a".to_string(), "b".to_string()).to_cache_key(),
        );
        assert_eq!((1, 2, 3).to_cache_key(), "(1,2,3)");
    }

    #[test]
    fn test_tuple_args_are_positional() {
        assert_eq!(key_of(&()), "f(;)");
        assert_eq!(key_of(&(2, 5)), "f(2|5|;)");
        assert_ne!(key_of(&(2, 5)), key_of(&(5, 2)));
        assert_eq!(key_of(&(1, 2, 3, 4, 5, 6)), "f(1|2|3|4|5|6|;)");
    }
}
