//! Owner and thief handles over a shared ring buffer.

use std::{
    cell::{Cell, UnsafeCell},
    marker::PhantomData,
    mem::MaybeUninit,
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicIsize, Ordering},
    },
};

use crossbeam::utils::{Backoff, CachePadded};

use crate::DequeError;

/// Slots per deque unless configured otherwise.
pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(8192).unwrap();

/// Shared state behind [`Worker`] and [`Stealer`].
struct Inner<T> {
    /// Next index a thief may claim. Only ever increases.
    head: CachePadded<AtomicIsize>,
    /// Next free slot. Written by the owner only.
    tail: CachePadded<AtomicIsize>,
    /// Fixed ring of slots, indexed modulo its length.
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// SAFETY: slots are only written by the single owner, at indices no thief
// can claim until `tail` is published. Items are `Copy`, so a racing read
// that loses its CAS is simply discarded.
unsafe impl<T: Send> Send for Inner<T> {}
unsafe impl<T: Send> Sync for Inner<T> {}

impl<T: Copy> Inner<T> {
    fn new(capacity: NonZeroUsize) -> Self {
        let buffer = (0..capacity.get())
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();

        Self {
            head: CachePadded::new(AtomicIsize::new(0)),
            tail: CachePadded::new(AtomicIsize::new(0)),
            buffer,
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    fn slot(&self, index: isize) -> *mut MaybeUninit<T> {
        let slot = index.rem_euclid(self.buffer.len() as isize) as usize;
        self.buffer[slot].get()
    }

    /// Write `item` at `index`.
    ///
    /// # Safety
    ///
    /// Caller must be the owner and `index` must lie in `[tail, head + capacity)`.
    #[inline]
    unsafe fn write(&self, index: isize, item: T) {
        // SAFETY: no thief reads this slot until `tail` moves past it
        unsafe { self.slot(index).write(MaybeUninit::new(item)) };
    }

    /// Read the item at `index`.
    ///
    /// # Safety
    ///
    /// `index` must have been published by a `tail` store observed by the
    /// caller. The value is only trusted if the caller then claims `index`.
    #[inline]
    unsafe fn read(&self, index: isize) -> T {
        // SAFETY: slot was initialized by a push before `tail` was published
        unsafe { std::ptr::read_volatile(self.slot(index)).assume_init() }
    }

    fn len(&self) -> usize {
        let head = self.head.load(Ordering::SeqCst);
        let tail = self.tail.load(Ordering::SeqCst);
        (tail - head).max(0) as usize
    }
}

/// Owner side of a bounded deque.
///
/// Only the owner pushes and pops. The handle can move to another thread but
/// cannot be shared, which keeps `tail` single-writer.
pub struct Worker<T> {
    inner: Arc<Inner<T>>,
    _not_sync: PhantomData<Cell<()>>,
}

impl<T: Copy + Send> Worker<T> {
    /// Create an empty deque with a fixed number of slots.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Arc::new(Inner::new(capacity)),
            _not_sync: PhantomData,
        }
    }

    /// Create an empty deque with [`DEFAULT_CAPACITY`] slots.
    #[must_use]
    pub fn new_default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Create a thief handle for this deque.
    #[must_use]
    pub fn stealer(&self) -> Stealer<T> {
        Stealer {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Push an item onto the owner's end.
    ///
    /// Fails without modifying the deque when it already holds
    /// `capacity` items.
    pub fn push(&self, item: T) -> Result<(), DequeError> {
        let inner = &*self.inner;
        let tail = inner.tail.load(Ordering::Relaxed);
        let head = inner.head.load(Ordering::Acquire);

        if tail - head >= inner.capacity() as isize {
            return Err(DequeError::CapacityExhausted {
                capacity: inner.capacity(),
            });
        }

        // SAFETY: we are the owner and tail - head < capacity
        unsafe { inner.write(tail, item) };
        inner.tail.store(tail + 1, Ordering::Release);
        Ok(())
    }

    /// Pop the most recently pushed item (LIFO).
    ///
    /// The owner decrements `tail` before looking at `head`, so a thief can
    /// only race it for the very last item. That race is settled by a CAS on
    /// `head`; the loser sees an empty deque.
    pub fn pop(&self) -> Option<T> {
        let inner = &*self.inner;
        let tail = inner.tail.fetch_sub(1, Ordering::SeqCst) - 1;
        let head = inner.head.load(Ordering::SeqCst);

        if tail < head {
            inner.tail.store(head, Ordering::SeqCst);
            return None;
        }

        // SAFETY: head <= tail < old tail, so the slot is published
        let item = unsafe { inner.read(tail) };
        if tail > head {
            return Some(item);
        }

        // Last item: claim it against thieves.
        let won = inner
            .head
            .compare_exchange(head, head + 1, Ordering::SeqCst, Ordering::Relaxed)
            .is_ok();
        inner.tail.store(head + 1, Ordering::SeqCst);
        won.then_some(item)
    }

    /// Number of items currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

impl<T: Copy + Send> Default for Worker<T> {
    fn default() -> Self {
        Self::new_default()
    }
}

impl<T> core::fmt::Debug for Worker<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Worker")
            .field("head", &self.inner.head.load(Ordering::Relaxed))
            .field("tail", &self.inner.tail.load(Ordering::Relaxed))
            .field("capacity", &self.inner.buffer.len())
            .finish()
    }
}

/// Thief side of a bounded deque.
pub struct Stealer<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Copy + Send> Stealer<T> {
    /// Steal the oldest item (FIFO).
    ///
    /// Retries with backoff while other thieves or the owner win the CAS
    /// on `head`; returns `None` once the deque is observed empty.
    pub fn steal(&self) -> Option<T> {
        let inner = &*self.inner;
        let backoff = Backoff::new();

        loop {
            let head = inner.head.load(Ordering::SeqCst);
            let tail = inner.tail.load(Ordering::SeqCst);
            if head >= tail {
                return None;
            }

            // SAFETY: head < tail, so the slot was published by the owner
            let item = unsafe { inner.read(head) };
            if inner
                .head
                .compare_exchange(head, head + 1, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                return Some(item);
            }

            backoff.spin();
        }
    }

    /// Whether the deque looked empty at the time of the call.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }
}

impl<T> Clone for Stealer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> core::fmt::Debug for Stealer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stealer")
            .field("head", &self.inner.head.load(Ordering::Relaxed))
            .field("tail", &self.inner.tail.load(Ordering::Relaxed))
            .finish()
    }
}
