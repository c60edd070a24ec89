use std::{collections::HashMap, hash::Hash};

/// Occurrence counts of the distinct values of a dataset.
///
/// Entries are ordered by descending count. Values with the same count keep
/// the order in which they first appeared.
///
/// # Examples
///
/// ```
/// use sondage_stats::frequency::FrequencyTable;
///
/// let table = FrequencyTable::from_values(["x", "y", "y"]);
/// assert_eq!(table.top(), Some((&"y", 2)));
/// assert_eq!(table.total(), 3);
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<T> {
    entries: Vec<(T, usize)>,
}

impl<T> FrequencyTable<T>
where
    T: Eq + Hash + Clone,
{
    /// Counts the values.
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut index: HashMap<T, usize> = HashMap::new();
        let mut entries: Vec<(T, usize)> = Vec::new();
        for value in values {
            match index.get(&value) {
                Some(&i) => entries[i].1 += 1,
                None => {
                    index.insert(value.clone(), entries.len());
                    entries.push((value, 1));
                }
            }
        }
        // stable sort keeps first-occurrence order among equal counts
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Self { entries }
    }
}

impl<T> FrequencyTable<T> {
    #[must_use]
    pub fn entries(&self) -> &[(T, usize)] {
        &self.entries
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of counted values.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// The most frequent value and its count.
    #[must_use]
    pub fn top(&self) -> Option<(&T, usize)> {
        self.entries.first().map(|(value, count)| (value, *count))
    }

    /// The largest count, or zero for an empty table.
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.entries.first().map_or(0, |(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.entries.iter().map(|(value, count)| (value, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_counts() {
        let table = FrequencyTable::from_values(["A", "A", "B", "C", "C", "C"]);
        assert_eq!(table.entries(), &[("C", 3), ("A", 2), ("B", 1)]);
        assert_eq!(table.total(), 6);
        assert_eq!(table.max_count(), 3);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let table = FrequencyTable::from_values(["b", "a", "a", "b", "c"]);
        assert_eq!(table.entries(), &[("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_owned_values() {
        let answers = ["yes", "no", "yes"].map(String::from);
        let table = FrequencyTable::from_values(answers);
        assert_eq!(table.top(), Some((&"yes".to_owned(), 2)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty() {
        let table = FrequencyTable::<u8>::from_values([]);
        assert!(table.is_empty());
        assert_eq!(table.top(), None);
        assert_eq!(table.max_count(), 0);
    }
}
