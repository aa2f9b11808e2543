//! Batch chunks handed to per-chunk tasks

/// A contiguous run of items cut from a larger ordered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchChunk<T> {
    pub index: usize,
    /// Position of the first item in the original collection.
    pub offset: usize,
    pub items: Vec<T>,
}

impl<T> BatchChunk<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
