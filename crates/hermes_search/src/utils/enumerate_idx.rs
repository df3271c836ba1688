pub struct IndexedIter<I, Idx> {
    inner: std::iter::Enumerate<I>,
    _marker: std::marker::PhantomData<Idx>,
}

/// Like `enumerate`, but yields typed arena indices instead of raw `usize`.
pub trait EnumerateIdx<Idx>: Iterator + Sized {
    fn enumerate_idx(self) -> IndexedIter<Self, Idx> {
        IndexedIter {
            inner: self.enumerate(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<I: Iterator, Idx> EnumerateIdx<Idx> for I {}

impl<I: Iterator, Idx: From<usize>> Iterator for IndexedIter<I, Idx> {
    type Item = (Idx, I::Item);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(i, item)| (Idx::from(i), item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I: ExactSizeIterator, Idx: From<usize>> ExactSizeIterator for IndexedIter<I, Idx> {}

#[cfg(test)]
mod tests {
    use crate::problem::job::JobIdx;

    use super::*;

    #[test]
    fn test_enumerate_idx_yields_typed_indices() {
        let items = ["a", "b", "c"];
        let indices: Vec<JobIdx> = items
            .iter()
            .enumerate_idx()
            .map(|(index, _): (JobIdx, _)| index)
            .collect();

        assert_eq!(indices, vec![JobIdx::new(0), JobIdx::new(1), JobIdx::new(2)]);
    }
}
