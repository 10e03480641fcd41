use thiserror::Error;

pub const DEFAULT_QUEUE_CAPACITY: usize = 6;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue is empty")]
    Empty,
    #[error("Queue is full, capacity: {capacity}")]
    Full { capacity: usize },
}

/// Fixed capacity FIFO queue on top of a ring buffer
pub struct CircularQueue<T> {
    buf: Vec<Option<T>>,
    head: usize,
    len: usize,
}

pub struct Iter<'a, T> {
    q: &'a CircularQueue<T>,
    offset: usize,
}

impl<T> Default for CircularQueue<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl<T> CircularQueue<T> {
    /// A capacity of `0` falls back to [`DEFAULT_QUEUE_CAPACITY`]
    pub fn with_capacity(cap: usize) -> Self {
        let cap = if cap == 0 { DEFAULT_QUEUE_CAPACITY } else { cap };
        Self {
            buf: (0..cap).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn enqueue(&mut self, item: T) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::Full {
                capacity: self.capacity(),
            });
        }
        let tail = self.wrap(self.len);
        self.buf[tail] = Some(item);
        self.len += 1;
        Ok(())
    }

    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        let item = self.buf[self.head].take().ok_or(QueueError::Empty)?;
        self.head = self.wrap(1);
        self.len -= 1;
        Ok(item)
    }

    pub fn peek(&self) -> Result<&T, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        self.buf[self.head].as_ref().ok_or(QueueError::Empty)
    }

    /// Drops every element, the capacity stays the same
    pub fn clear(&mut self) {
        while self.dequeue().is_ok() {}
        self.head = 0;
    }

    // [adapters]

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { q: self, offset: 0 }
    }

    // [private]

    /// Index `offset` positions after the head
    fn wrap(&self, offset: usize) -> usize {
        (self.head + offset) % self.capacity()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for CircularQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset == self.q.len {
            return None;
        }
        let i = self.q.wrap(self.offset);
        self.offset += 1;
        self.q.buf[i].as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::{CircularQueue, QueueError};
    use crate::record;

    #[test]
    fn fifo_order() {
        let mut q = CircularQueue::with_capacity(3);
        q.enqueue(1).unwrap();
        q.enqueue(2).unwrap();
        q.enqueue(3).unwrap();

        assert_eq!(q.dequeue(), Ok(1));
        assert_eq!(q.dequeue(), Ok(2));
        assert_eq!(q.dequeue(), Ok(3));
        assert_eq!(q.dequeue(), Err(QueueError::Empty));
    }

    #[test]
    fn wraps_around() {
        let mut q = CircularQueue::with_capacity(3);
        for i in 0..10 {
            q.enqueue(i).unwrap();
            if q.is_full() {
                assert_eq!(q.dequeue(), Ok(i - 2));
            }
        }

        assert_eq!(q.iter().copied().collect::<Vec<_>>(), [8, 9]);
        assert_eq!(q.peek(), Ok(&8));
        dbg!(q);
    }

    #[test]
    fn full_is_rejected() {
        let mut q = CircularQueue::default();
        for i in 0..6 {
            q.enqueue(record!("s", format!("p{i}"), 'x', i)).unwrap();
        }

        let err = q.enqueue(record!("s", "late", 'x', 7)).unwrap_err();
        assert_eq!(err, QueueError::Full { capacity: 6 });
        assert_eq!(q.len(), 6);
        assert_eq!(q.peek().unwrap().key, "p0");
    }

    #[test]
    fn peek_does_not_remove() {
        let mut q = CircularQueue::with_capacity(2);
        assert_eq!(q.peek(), Err(QueueError::Empty));

        q.enqueue("first").unwrap();
        assert_eq!(q.peek(), Ok(&"first"));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn clear() {
        let mut q = CircularQueue::with_capacity(4);
        q.enqueue('a').unwrap();
        q.enqueue('b').unwrap();
        q.dequeue().unwrap();
        q.enqueue('c').unwrap();

        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.capacity(), 4);
        assert_eq!(q.iter().count(), 0);

        q.enqueue('d').unwrap();
        assert_eq!(q.dequeue(), Ok('d'));
    }
}
