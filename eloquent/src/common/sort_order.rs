use std::cmp::Ordering;

/// Specifies the direction for sorting collection items.
///
/// # Variants
/// - `Ascending`: Sort from smallest to largest value (A to Z, 0 to 9)
/// - `Descending`: Sort from largest to smallest value (Z to A, 9 to 0)
///
/// # Usage
/// ```text
/// collection.sort_by_key("age", SortOrder::Descending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest)
    #[default]
    Ascending,
    /// Sort in descending order (largest to smallest)
    Descending,
}

impl SortOrder {
    /// Applies the direction to an ordering computed in ascending terms.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}
