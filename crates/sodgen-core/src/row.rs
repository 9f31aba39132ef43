//! Row types

use std::hash::Hasher;

use crate::value::CellValue;

/// One row of a sheet
///
/// Values are positional: value `i` belongs to column `i` of the owning
/// [`Sheet`](crate::Sheet).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<CellValue>,
}

impl Row {
    /// Create a row from its values
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    /// Get a value by column position
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }

    /// Get a mutable value by column position
    pub fn get_mut(&mut self, index: usize) -> Option<&mut CellValue> {
        self.values.get_mut(index)
    }

    /// Append a value at the end of the row
    pub fn push(&mut self, value: CellValue) {
        self.values.push(value);
    }

    /// All values in column order
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Iterate over values mutably
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut CellValue> {
        self.values.iter_mut()
    }

    /// Consume the row, returning its values
    pub fn into_values(self) -> Vec<CellValue> {
        self.values
    }

    /// Number of values in the row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if row has no values at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if every value in the row is empty
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(CellValue::is_empty)
    }

    /// Row equality: same length and every positional value
    /// [`same_value`](CellValue::same_value)-equal
    ///
    /// Callers comparing rows of two sheets must first check that both
    /// sheets share the same column layout.
    pub fn same_as(&self, other: &Row) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.same_value(b))
    }

    /// Hash of the normalized row contents
    ///
    /// Rows that are [`same_as`](Self::same_as)-equal share a fingerprint.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = ahash::AHasher::default();
        hasher.write_usize(self.values.len());
        for value in &self.values {
            value.hash_normalized(&mut hasher);
        }
        hasher.finish()
    }
}

impl From<Vec<CellValue>> for Row {
    fn from(values: Vec<CellValue>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<CellValue> for Row {
    fn from_iter<I: IntoIterator<Item = CellValue>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Build a [`Row`] from a list of values convertible to [`CellValue`]
///
/// ```
/// use sodgen_core::{row, CellValue};
///
/// let r = row!["Apollo", 1, CellValue::Empty];
/// assert_eq!(r.len(), 3);
/// ```
#[macro_export]
macro_rules! row {
    ($($value:expr),* $(,)?) => {
        $crate::Row::new(vec![$($crate::CellValue::from($value)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_same_as_requires_equal_length() {
        let a = row!["x", 1];
        let b = row!["x", 1, CellValue::Empty];
        assert!(!a.same_as(&b));
        assert!(!b.same_as(&a));
    }

    #[test]
    fn test_same_as_treats_empties_as_equal() {
        let a = row!["x", CellValue::Empty];
        let b = row!["x", f64::NAN];
        assert!(a.same_as(&b));
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_same_as_distinguishes_types() {
        assert!(!row!["1"].same_as(&row![1]));
    }

    #[test]
    fn test_is_blank() {
        assert!(row![CellValue::Empty, CellValue::Empty].is_blank());
        assert!(!row![CellValue::Empty, ""].is_blank());
    }
}
