//! Sort and pagination arguments supplied by callers at invocation time.

use derive_more::{Deref, IntoIterator};

///
/// Direction
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Asc,
    Desc,
}

///
/// Order
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

///
/// Sort
///
/// Ordered list of sort keys; empty means unsorted.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct Sort(Vec<Order>);

impl Sort {
    #[must_use]
    pub const fn unsorted() -> Self {
        Self(Vec::new())
    }

    /// Sort ascending by a single field.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self::unsorted().then(field, Direction::Asc)
    }

    /// Sort descending by a single field.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self::unsorted().then(field, Direction::Desc)
    }

    /// Append a sort key after the existing ones.
    #[must_use]
    pub fn then(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.0.push(Order {
            field: field.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub const fn is_unsorted(&self) -> bool {
        self.0.is_empty()
    }
}

///
/// PageRequest
///
/// Zero-based page index plus page size, optionally sorted.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u32,
    pub sort: Sort,
}

impl PageRequest {
    #[must_use]
    pub const fn of(page: u64, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Absolute offset of the first row on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(u64::from(self.size))
    }
}
