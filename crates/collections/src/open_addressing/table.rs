use std::{fmt, iter::Enumerate, slice};

use log::{debug, trace};

use super::TableError;
use crate::{Record, record};

pub const DEFAULT_CAPACITY: usize = 50;

/// Multiplier of the polynomial rolling hash
const PRIME: u32 = 13;

/// A single position of the backing array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot {
    /// Never used, ends every probe sequence
    #[default]
    Empty,
    /// Used to be occupied, probing continues past it
    Tombstone,
    Occupied(Record),
}

impl Slot {
    /// `true` if a new record may be written here
    pub fn is_free(&self) -> bool {
        !matches!(self, Slot::Occupied(_))
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            Slot::Occupied(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Empty => Ok(()),
            Slot::Tombstone => f.write_str("tombstone"),
            Slot::Occupied(record) => write!(f, "{}/{}", record.key, record.value),
        }
    }
}

/// Open addressing hash table with linear probing and lazy (tombstone) deletion.
///
/// The table doubles its slot count as soon as more than 70% of the slots are occupied.
#[derive(Debug)]
pub struct ProbingTable {
    slots: Vec<Slot>,
    items: usize,
}

/// Every slot of the table in index order, see [`ProbingTable::dump`]
#[derive(Debug, Clone)]
pub struct Dump<'a> {
    slots: Enumerate<slice::Iter<'a, Slot>>,
}

/// Occupied records in slot order
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    ht: &'a ProbingTable,
    slot_idx: usize,
}

impl Default for ProbingTable {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ProbingTable {
    /// Creates a new `ProbingTable` with `cap` many empty slots
    ///
    /// # Note
    ///
    /// A capacity of `0` falls back to [`DEFAULT_CAPACITY`]
    pub fn with_capacity(cap: usize) -> Self {
        let cap = if cap == 0 { DEFAULT_CAPACITY } else { cap };
        Self {
            slots: Self::empty_slots(cap),
            items: 0,
        }
    }

    /// Returns the number of occupied slots
    pub fn len(&self) -> usize {
        self.items
    }

    /// Shorthand for `self.len() == 0`
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Returns the number of slots, occupied or not
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn load_factor_f32(&self) -> f32 {
        (self.items as f32) / self.capacity() as f32
    }

    /// Shorthand for `self.insert_record(record!(subject, key, tag, value))`
    pub fn insert(
        &mut self,
        subject: &str,
        key: &str,
        tag: char,
        value: i64,
    ) -> Result<(), TableError> {
        self.insert_record(record!(subject, key, tag, value))
    }

    /// Inserts a record whose key is not yet present,
    /// growing the table once it is more than 70% full
    pub fn insert_record(&mut self, record: Record) -> Result<(), TableError> {
        self.insert_without_resize(record)?;

        if self.over_threshold() {
            self.rehash();
        }
        Ok(())
    }

    /// Inserts a record but never grows the table,
    /// so it can be filled up to its nominal capacity
    pub fn insert_without_resize(&mut self, record: Record) -> Result<(), TableError> {
        if record.key.is_empty() {
            return Err(TableError::InvalidKey);
        }
        if self.items == self.capacity() {
            return Err(TableError::TableFull {
                capacity: self.capacity(),
            });
        }
        if self.locate(&record.key).is_some() {
            return Err(TableError::DuplicateKey(record.key));
        }

        let i = Self::place(&mut self.slots, record);
        trace!(target: "insert", "placed record at slot {i}");
        self.items += 1;
        Ok(())
    }

    /// Marks the slot holding `key` as a tombstone, returning the removed record
    pub fn remove(&mut self, key: &str) -> Result<Record, TableError> {
        if self.is_empty() {
            return Err(TableError::EmptyTable);
        }
        let i = self
            .locate(key)
            .ok_or_else(|| TableError::KeyNotFound(key.into()))?;

        match std::mem::replace(&mut self.slots[i], Slot::Tombstone) {
            Slot::Occupied(record) => {
                self.items -= 1;
                trace!(target: "remove", "left tombstone at slot {i}");
                Ok(record)
            }
            other => {
                self.slots[i] = other;
                Err(TableError::KeyNotFound(key.into()))
            }
        }
    }

    /// Returns the value stored under `key`
    pub fn lookup(&self, key: &str) -> Result<i64, TableError> {
        self.get(key)
            .map(|record| record.value)
            .ok_or_else(|| TableError::KeyNotFound(key.into()))
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.locate(key).and_then(|i| self.slots[i].record())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.locate(key).is_some()
    }

    // [adapters]

    /// Walks every slot, including empty ones and tombstones.
    /// Calling it again starts over from slot `0`
    pub fn dump(&self) -> Dump<'_> {
        Dump {
            slots: self.slots.iter().enumerate(),
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            ht: self,
            slot_idx: 0,
        }
    }

    // [private]

    fn empty_slots(cap: usize) -> Vec<Slot> {
        (0..cap).map(|_| Slot::Empty).collect()
    }

    /// Bytes are added as unsigned values, so non-ASCII keys land on other slots than with a signed `char`
    fn hash(key: &str) -> u32 {
        key.bytes()
            .fold(1, |pos: u32, b| pos.wrapping_mul(PRIME).wrapping_add(b as u32))
    }

    fn idx(key: &str, cap: usize) -> usize {
        Self::hash(key) as usize % cap
    }

    /// `size > 0.7 * capacity` without going through floats
    fn over_threshold(&self) -> bool {
        self.items * 10 > self.capacity() * 7
    }

    /// Returns the slot index holding `key`
    fn locate(&self, key: &str) -> Option<usize> {
        let cap = self.capacity();
        let start = Self::idx(key, cap);
        let mut i = start;

        loop {
            match &self.slots[i] {
                Slot::Empty => return None,
                Slot::Occupied(record) if record.key == key => return Some(i),
                _ => {}
            }
            i = (i + 1) % cap;
            if i == start {
                return None;
            }
        }
    }

    /// Writes `record` into the first free slot of its probe sequence
    ///
    /// # Note
    ///
    /// The caller must make sure `slots` has at least one free slot
    fn place(slots: &mut [Slot], record: Record) -> usize {
        let cap = slots.len();
        let mut i = Self::idx(&record.key, cap);
        while !slots[i].is_free() {
            i = (i + 1) % cap;
        }
        slots[i] = Slot::Occupied(record);
        i
    }

    /// Moves every record into a table with twice the slots,
    /// dropping all tombstones on the way
    fn rehash(&mut self) {
        let old_cap = self.capacity();
        let new_cap = old_cap * 2;
        let mut new_slots = Self::empty_slots(new_cap);

        let mut carried = 0;
        for slot in self.slots.drain(..) {
            if let Slot::Occupied(record) = slot {
                Self::place(&mut new_slots, record);
                carried += 1;
            }
        }
        debug_assert_eq!(
            carried, self.items,
            "Rehash carried a different number of records than the table held"
        );
        debug!(target: "rehash", "grew from {old_cap} to {new_cap} slots, carried {carried} records");

        self.slots = new_slots;
        self.items = carried;
    }
}

impl fmt::Display for ProbingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, slot) in self.dump() {
            write!(f, "[{i}:{slot}] ")?;
        }
        Ok(())
    }
}

impl<'a> Iterator for Dump<'a> {
    type Item = (usize, &'a Slot);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl ExactSizeIterator for Dump<'_> {}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = self.ht.slots.get(self.slot_idx)?;
            self.slot_idx += 1;
            if let Slot::Occupied(record) = slot {
                return Some(record);
            }
        }
    }
}

impl<'a> IntoIterator for &'a ProbingTable {
    type Item = &'a Record;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
