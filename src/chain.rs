// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Occurrence chain: the duplicates of one key, in insertion order.
//!
//! A doubly linked list whose links live in a `Vec` of slots addressed by
//! `u32` (no raw pointers, no reference counting). Vacant slots are threaded
//! into a free list through their `next` link and reused by `append`.
//!
//! Operations:
//! - append: O(1)
//! - remove: O(1) when the match is the head or tail, O(n) otherwise
//! - iter: O(n), restartable

use std::fmt;

use crate::error::Error;

/// Sentinel value for no previous / next slot.
const NONE: u32 = u32::MAX;

#[derive(Clone)]
struct Slot<T> {
    /// `None` while the slot sits on the free list.
    value: Option<T>,
    prev: u32,
    next: u32,
}

/// An ordered sequence of values sharing one key.
#[derive(Clone)]
pub struct Chain<T> {
    slots: Vec<Slot<T>>,
    head: u32,
    tail: u32,
    /// First vacant slot, or NONE.
    free: u32,
    len: usize,
}

impl<T> Chain<T> {
    /// Create a new empty chain.
    pub fn new() -> Chain<T> {
        return Chain {
            slots: Vec::new(),
            head: NONE,
            tail: NONE,
            free: NONE,
            len: 0,
        };
    }

    /// Create a chain holding a single value.
    pub fn with_value(value: T) -> Chain<T> {
        let mut chain = Chain::new();
        chain.append(value);
        return chain;
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        return self.len;
    }

    /// Return true if the chain holds no values.
    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// The oldest value.
    pub fn front(&self) -> Option<&T> {
        return self.value_at(self.head);
    }

    /// The newest value.
    pub fn back(&self) -> Option<&T> {
        return self.value_at(self.tail);
    }

    fn value_at(&self, idx: u32) -> Option<&T> {
        if idx == NONE {
            return None;
        }
        return self.slots[idx as usize].value.as_ref();
    }

    /// Append a value at the tail.
    pub fn append(&mut self, value: T) {
        let slot = Slot {
            value: Some(value),
            prev: self.tail,
            next: NONE,
        };

        let idx = if self.free != NONE {
            let idx = self.free;
            self.free = self.slots[idx as usize].next;
            self.slots[idx as usize] = slot;
            idx
        } else {
            self.slots.push(slot);
            (self.slots.len() - 1) as u32
        };

        if self.tail == NONE {
            self.head = idx;
        } else {
            self.slots[self.tail as usize].next = idx;
        }
        self.tail = idx;
        self.len += 1;
    }

    /// Remove and return the oldest value.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head == NONE {
            return None;
        }
        return self.unlink(self.head);
    }

    /// Unlink a slot, push it on the free list and hand back its value.
    fn unlink(&mut self, idx: u32) -> Option<T> {
        let slot = &mut self.slots[idx as usize];
        let value = slot.value.take();
        let prev = slot.prev;
        let next = slot.next;
        slot.prev = NONE;
        slot.next = self.free;
        self.free = idx;

        if prev == NONE {
            self.head = next;
        } else {
            self.slots[prev as usize].next = next;
        }
        if next == NONE {
            self.tail = prev;
        } else {
            self.slots[next as usize].prev = prev;
        }

        self.len -= 1;
        if self.len == 0 {
            // Nothing is linked any more, so the whole arena is garbage.
            self.slots.clear();
            self.free = NONE;
        }
        return value;
    }

    /// Iterate over the values in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        return Iter {
            slots: &self.slots,
            cursor: self.head,
            remaining: self.len,
        };
    }
}

impl<T: PartialEq> Chain<T> {
    /// Remove one occurrence equal to `value` and return it.
    ///
    /// The head and tail are checked first, then the interior from the
    /// front. Leaves the chain untouched and returns `Error::NotFound` if
    /// nothing matches.
    pub fn remove(&mut self, value: &T) -> Result<T, Error> {
        let idx = self.position(value).ok_or(Error::NotFound)?;
        return self.unlink(idx).ok_or(Error::NotFound);
    }

    fn position(&self, value: &T) -> Option<u32> {
        if self.value_at(self.head) == Some(value) {
            return Some(self.head);
        }
        if self.value_at(self.tail) == Some(value) {
            return Some(self.tail);
        }

        let mut cursor = match self.head {
            NONE => return None,
            head => self.slots[head as usize].next,
        };
        while cursor != NONE && cursor != self.tail {
            let slot = &self.slots[cursor as usize];
            if slot.value.as_ref() == Some(value) {
                return Some(cursor);
            }
            cursor = slot.next;
        }
        return None;
    }

    /// Return true if some occurrence equals `value`.
    pub fn contains(&self, value: &T) -> bool {
        return self.iter().any(|v| v == value);
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Chain<T> {
        return Chain::new();
    }
}

impl<T: PartialEq> PartialEq for Chain<T> {
    fn eq(&self, other: &Chain<T>) -> bool {
        return self.len == other.len && self.iter().eq(other.iter());
    }
}

impl<T: Eq> Eq for Chain<T> {}

impl<T: fmt::Debug> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}

/// Borrowing iterator over a chain, oldest first.
pub struct Iter<'a, T> {
    slots: &'a [Slot<T>],
    cursor: u32,
    remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        return Iter {
            slots: self.slots,
            cursor: self.cursor,
            remaining: self.remaining,
        };
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while self.cursor != NONE {
            let slot = &self.slots[self.cursor as usize];
            self.cursor = slot.next;
            if let Some(value) = slot.value.as_ref() {
                self.remaining -= 1;
                return Some(value);
            }
        }
        return None;
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.remaining, Some(self.remaining));
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        return self.iter();
    }
}

/// Owning iterator over a chain, oldest first.
pub struct IntoIter<T> {
    chain: Chain<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        return self.chain.pop_front();
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        return (self.chain.len, Some(self.chain.len));
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Chain<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        return IntoIter { chain: self };
    }
}
