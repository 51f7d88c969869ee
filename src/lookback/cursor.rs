/// A forward-only position within a slice. Copying a cursor forks it; the
/// copies advance independently.
pub struct ForwardCursor<'a, T> {
    items: &'a [T],
}

impl<'a, T> ForwardCursor<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items }
    }

    pub fn peek(&self) -> Option<&'a T> {
        self.items.first()
    }

    pub fn has_next(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl<'a, T> Iterator for ForwardCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let (first, rest) = self.items.split_first()?;
        self.items = rest;
        Some(first)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.items.len(), Some(self.items.len()))
    }
}

// derived impls would require `T: Clone`
impl<T> Clone for ForwardCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ForwardCursor<'_, T> {}
