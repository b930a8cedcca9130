//! Capacity-checked sequences embedded in a liquidity record.
//!
//! The capacity is not stored alongside the entries. It comes from the
//! deployment configuration and is supplied on every insertion, so the
//! serialized form is only the Borsh length counter followed by the entries.

use {
    crate::error::LiquidityError,
    borsh::{BorshDeserialize, BorshSerialize},
    std::ops::Deref,
};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BoundedVec<T>(Vec<T>);

impl<T> BoundedVec<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append `entry`, failing without modification if the sequence already
    /// holds `capacity` entries.
    pub fn push(&mut self, entry: T, capacity: usize) -> Result<(), LiquidityError> {
        if self.0.len() >= capacity {
            return Err(LiquidityError::CapacityExceeded);
        }
        self.0.push(entry);
        Ok(())
    }

    /// Replace every entry with `entries`.
    pub fn replace(&mut self, entries: Vec<T>, capacity: usize) -> Result<(), LiquidityError> {
        if entries.len() > capacity {
            return Err(LiquidityError::CapacityExceeded);
        }
        self.0 = entries;
        Ok(())
    }

    /// Remove and return the first entry matching `predicate`, keeping the
    /// order of the remaining entries.
    pub fn remove_first<P>(&mut self, predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        let index = self.0.iter().position(predicate)?;
        Some(self.0.remove(index))
    }

    pub fn is_full(&self, capacity: usize) -> bool {
        self.0.len() >= capacity
    }
}

impl<T> Default for BoundedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for BoundedVec<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    #[test]
    fn test_push_until_full() {
        let mut entries = BoundedVec::new();
        entries.push(1u8, 2).unwrap();
        entries.push(2u8, 2).unwrap();
        assert!(entries.is_full(2));

        assert_matches!(entries.push(3, 2), Err(LiquidityError::CapacityExceeded));
        assert_eq!(&*entries, &[1, 2]);
    }

    #[test]
    fn test_replace() {
        let mut entries = BoundedVec::new();
        entries.push("old", 3).unwrap();

        assert_matches!(
            entries.replace(vec!["a", "b", "c", "d"], 3),
            Err(LiquidityError::CapacityExceeded)
        );
        assert_eq!(&*entries, &["old"]);

        entries.replace(vec!["a", "b"], 3).unwrap();
        assert_eq!(&*entries, &["a", "b"]);
    }

    #[test]
    fn test_remove_first_keeps_order() {
        let mut entries = BoundedVec::new();
        for value in [5u8, 7, 5, 9] {
            entries.push(value, 4).unwrap();
        }

        assert_eq!(entries.remove_first(|value| *value == 5), Some(5));
        assert_eq!(&*entries, &[7, 5, 9]);
        assert_eq!(entries.remove_first(|value| *value == 1), None);
        assert_eq!(&*entries, &[7, 5, 9]);
    }

    #[test]
    fn test_serialized_with_length_counter() {
        let mut entries = BoundedVec::new();
        entries.push(0xabu8, 4).unwrap();
        entries.push(0xcdu8, 4).unwrap();
        assert_eq!(
            borsh::to_vec(&entries).unwrap(),
            vec![2, 0, 0, 0, 0xab, 0xcd]
        );
    }
}
