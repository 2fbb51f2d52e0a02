use std::collections::{HashMap, VecDeque};

use crate::CacheKey;

/// Moves a key to the back of the order queue (marks it most recently used).
///
/// Used by the LRU policy on a cache hit. A key that is not in the queue is
/// ignored.
///
/// # Performance
///
/// O(n) in the length of the queue: the key has to be found before it moves.
///
/// # Examples
///
/// ```
/// use std::collections::VecDeque;
/// use recall_core::KeyBuilder;
/// use recall_core::utils::move_key_to_end;
///
/// let a = KeyBuilder::new("a").finish();
/// let b = KeyBuilder::new("b").finish();
/// let mut order = VecDeque::from(vec![a.clone(), b.clone()]);
///
/// move_key_to_end(&mut order, &a);
/// assert_eq!(order, VecDeque::from(vec![b, a]));
/// ```
pub fn move_key_to_end(order: &mut VecDeque<CacheKey>, key: &CacheKey) {
    if let Some(pos) = order.iter().position(|k| k == key) {
        if let Some(k) = order.remove(pos) {
            order.push_back(k);
        }
    }
}

/// Removes the oldest key of the queue together with its entry.
///
/// Keys at the front of the queue with no entry in the map are skipped, so
/// the returned key (if any) always referred to a resident entry.
pub fn evict_front<R>(
    map: &mut HashMap<CacheKey, R>,
    order: &mut VecDeque<CacheKey>,
) -> Option<CacheKey> {
    while let Some(key) = order.pop_front() {
        if map.remove(&key).is_some() {
            return Some(key);
        }
    }
    None
}
