use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Computes the arithmetic mean of the values. Returns `None` for empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// A value and how often it was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount<K> {
    pub value: K,
    pub count: usize,
}

/// Occurrence counts that remember the order values were first seen in.
///
/// Ties are always resolved in favour of the value seen first, so results
/// are reproducible for identical input.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<ValueCount<K>>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        FrequencyTable {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: K) {
        match self.index.get(&value) {
            Some(&slot) => self.entries[slot].count += 1,
            None => {
                self.index.insert(value.clone(), self.entries.len());
                self.entries.push(ValueCount { value, count: 1 });
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most frequent value; first seen wins among equals.
    pub fn mode(&self) -> Option<&ValueCount<K>> {
        self.entries
            .iter()
            .fold(None, |best: Option<&ValueCount<K>>, entry| match best {
                Some(b) if b.count >= entry.count => Some(b),
                _ => Some(entry),
            })
    }

    /// All values by descending count, first seen first among equals.
    pub fn into_value_counts(self) -> Vec<ValueCount<K>> {
        let mut entries = self.entries;
        // stable sort keeps first-seen order for equal counts
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for value in iter {
            table.add(value);
        }
        table
    }
}
