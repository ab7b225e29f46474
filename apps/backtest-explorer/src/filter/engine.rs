//! Filter engine: dataset + specification in, ordered view out.

use std::sync::Arc;

use crate::dataset::{Dataset, TradeRecord};

use super::spec::FilterSpec;

/// Read-only ordered subset of a dataset.
///
/// Holds positions into the dataset rather than copies, so views are cheap
/// to create and to cache.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    indices: Arc<[usize]>,
}

impl<'a> View<'a> {
    pub(crate) fn from_indices(dataset: &'a Dataset, indices: Arc<[usize]>) -> Self {
        Self { dataset, indices }
    }

    /// The dataset this view selects from.
    #[must_use]
    pub const fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Number of records in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Record at `position` within the view.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&'a TradeRecord> {
        let index = *self.indices.get(position)?;
        self.dataset.records().get(index)
    }

    /// Iterate records in original relative order.
    #[must_use]
    pub fn iter(&self) -> ViewIter<'_, 'a> {
        ViewIter {
            records: self.dataset.records(),
            indices: self.indices.iter(),
        }
    }

    /// Collect the view into owned records.
    #[must_use]
    pub fn to_records(&self) -> Vec<TradeRecord> {
        self.iter().cloned().collect()
    }

    pub(crate) fn indices(&self) -> &Arc<[usize]> {
        &self.indices
    }
}

impl<'v, 'a> IntoIterator for &'v View<'a> {
    type Item = &'a TradeRecord;
    type IntoIter = ViewIter<'v, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the records of a [`View`].
#[derive(Debug, Clone)]
pub struct ViewIter<'v, 'a> {
    records: &'a [TradeRecord],
    indices: std::slice::Iter<'v, usize>,
}

impl<'a> Iterator for ViewIter<'_, 'a> {
    type Item = &'a TradeRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let records = self.records;
        self.indices.find_map(|&index| records.get(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.indices.len()))
    }
}

/// Apply a filter specification to a dataset.
///
/// Pure: the same dataset and specification always give the same view.
#[must_use]
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> View<'a> {
    View::from_indices(dataset, select(dataset, spec))
}

pub(crate) fn select(dataset: &Dataset, spec: &FilterSpec) -> Arc<[usize]> {
    if spec.is_pass_through() {
        return (0..dataset.len()).collect();
    }
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| spec.matches(record))
        .map(|(index, _)| index)
        .collect()
}
