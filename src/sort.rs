// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Tree sort: build an index, then drain it in order.

use crate::index::{Index, Order};

/// Sort values by inserting them into an [`Index`] and draining it.
///
/// Stable: values comparing equal keep their relative input order.
pub fn tree_sort<T, I>(values: I, order: Order) -> Vec<T>
where
    T: Ord + Clone,
    I: IntoIterator<Item = T>,
{
    let index: Index<T> = values.into_iter().collect();
    return index.into_sorted(order);
}

/// Return true if `values` is in non-strict `order`.
pub fn is_sorted<T: Ord>(values: &[T], order: Order) -> bool {
    return values.windows(2).all(|pair| match order {
        Order::Ascending => pair[0] <= pair[1],
        Order::Descending => pair[0] >= pair[1],
    });
}
