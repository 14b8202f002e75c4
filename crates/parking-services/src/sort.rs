//! Stable insertion sort
//!
//! Report ordering must keep equal elements in insertion order, so every
//! listing in this crate goes through these helpers.

use std::cmp::Ordering;

/// Sorts `items` in place by `compare`, keeping equal elements in their
/// original relative order.
pub fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j], &items[j - 1]) == Ordering::Less {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Sorts `items` in place by the key returned from `key`.
pub fn insertion_sort_by_key<T, K, F>(items: &mut [T], mut key: F)
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    insertion_sort_by(items, |a, b| key(a).cmp(&key(b)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_numbers() {
        let mut values = vec![5, 1, 4, 2, 3, 0];
        insertion_sort_by(&mut values, |a, b| a.cmp(b));
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_is_stable() {
        let mut values = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        insertion_sort_by_key(&mut values, |&(k, _)| k);
        assert_eq!(
            values,
            vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]
        );
    }

    #[test]
    fn test_empty_and_single() {
        let mut empty: Vec<i32> = Vec::new();
        insertion_sort_by(&mut empty, |a, b| a.cmp(b));
        assert!(empty.is_empty());

        let mut single = vec!["only"];
        insertion_sort_by(&mut single, |a, b| a.cmp(b));
        assert_eq!(single, vec!["only"]);
    }

    #[test]
    fn test_sorts_strings_by_name() {
        let mut names = vec!["Saldanha", "Alvalade", "Benfica", "Alameda"];
        insertion_sort_by(&mut names, |a, b| a.cmp(b));
        assert_eq!(names, vec!["Alameda", "Alvalade", "Benfica", "Saldanha"]);
    }
}
