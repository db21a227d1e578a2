//! Vector clearing helpers.
//!
//! Truncating a `Vec` that holds handles (`Rc`, `Arc`, boxed resources) must
//! release those handles, not just hide them behind a shorter length. The two
//! helpers here differ only in what happens to the allocation afterwards:
//!
//! - [`clear_slice`] keeps the allocation so the vector can be refilled up to
//!   its previous capacity without reallocating.
//! - [`clear_and_nil_slice`] gives the allocation back as well.
//!
//! ```
//! use protomcp_common::slices::{clear_and_nil_slice, clear_slice};
//! use std::rc::Rc;
//!
//! let handler = Rc::new("handler");
//! let handlers = vec![Rc::clone(&handler), Rc::clone(&handler)];
//!
//! let handlers = clear_slice(handlers);
//! assert!(handlers.is_empty());
//! assert_eq!(Rc::strong_count(&handler), 1);
//!
//! let released: Option<Vec<Rc<&str>>> = clear_and_nil_slice(handlers);
//! assert!(released.is_none());
//! ```

/// Drops every element and returns an empty vector that reuses the same
/// allocation.
///
/// Accepts either a `Vec<T>` or an `Option<Vec<T>>`. An absent input yields a
/// fresh, empty, zero-capacity vector.
pub fn clear_slice<T, S>(s: S) -> Vec<T>
where
    S: Into<Option<Vec<T>>>,
{
    match s.into() {
        Some(mut v) => {
            v.clear();
            v
        }
        None => Vec::new(),
    }
}

/// Drops every element together with the allocation and returns `None`.
///
/// Callers holding an `Option<Vec<T>>` can write
/// `items = clear_and_nil_slice(items)` to release everything in one step.
pub fn clear_and_nil_slice<T, S>(s: S) -> Option<Vec<T>>
where
    S: Into<Option<Vec<T>>>,
{
    if let Some(mut v) = s.into() {
        // elements go first, the allocation when `v` leaves scope
        v.clear();
    }
    None
}

/// Resets every slot of a borrowed slice to `T::default()`.
///
/// Unlike the vector helpers this works on storage the caller does not own
/// (arrays, sub-slices of a larger buffer), so the reset is visible to every
/// other borrower of that storage. Previous values are dropped in place.
pub fn zero_slice<T: Default>(s: &mut [T]) {
    s.iter_mut().for_each(|slot| *slot = T::default());
}
