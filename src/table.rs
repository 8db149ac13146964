//! Open-addressed, power-of-two-capacity hash table keyed by raw station
//! name bytes.
//!
//! Chained maps allocate per-entry and pointer-chase; both are fatal to
//! throughput at one-billion-row scale. This table is a fixed-capacity array
//! of slots, probed quadratically.

use likely_stable::unlikely;

use crate::byte_range::ByteRange;
use crate::error::{EngineError, EngineResult};

/// Running aggregate for one station. All temperatures are tenths.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aggregate {
    pub min: i16,
    pub max: i16,
    pub sum: i64,
    pub count: i32,
}

impl Aggregate {
    #[inline]
    #[must_use]
    pub const fn single(value: i16) -> Self {
        Self {
            min: value,
            max: value,
            sum: value as i64,
            count: 1,
        }
    }

    #[inline]
    fn observe(&mut self, value: i16) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.sum += value as i64;
        self.count += 1;
    }

    #[inline]
    fn merge_from(&mut self, other: &Self) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
        self.sum += other.sum;
        self.count += other.count;
    }

    /// The arithmetic mean of the observed tenths, converted back to whole
    /// units: `sum / count / 10`.
    #[inline]
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.sum as f64 / f64::from(self.count) / 10.0
    }
}

#[derive(Copy, Clone)]
struct Slot {
    name: Option<ByteRange>,
    hash: u64,
    agg: Aggregate,
}

impl Slot {
    const fn empty() -> Self {
        Self {
            name: None,
            hash: 0,
            agg: Aggregate {
                min: 0,
                max: 0,
                sum: 0,
                count: 0,
            },
        }
    }
}

/// Fixed-capacity, power-of-two, quadratically-probed open-addressed table.
pub struct StationTable {
    slots: Vec<Slot>,
    mask: usize,
    occupied: usize,
    capacity: usize,
}

impl std::fmt::Debug for StationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationTable")
            .field("capacity", &self.capacity)
            .field("occupied", &self.occupied)
            .finish()
    }
}

impl StationTable {
    /// Creates a table whose capacity is the smallest power of two that
    /// keeps `expected_stations` under the 7/8 load-factor cap.
    #[must_use]
    pub fn with_expected_stations(expected_stations: usize) -> Self {
        let mut capacity = 16usize;
        while expected_stations * 8 > capacity * 7 {
            capacity *= 2;
        }
        Self::with_capacity(capacity)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity.is_power_of_two(), "capacity must be a power of two");
        Self {
            slots: vec![Slot::empty(); capacity],
            mask: capacity - 1,
            occupied: 0,
            capacity,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub const fn occupied(&self) -> usize {
        self.occupied
    }

    /// Inserts or updates the aggregate for `name`/`hash` with one observed
    /// `value`.
    pub fn upsert(&mut self, name: ByteRange, hash: u64, value: i16) -> EngineResult<()> {
        let slot_index = self.probe(name, hash)?;
        let slot = &mut self.slots[slot_index];
        if unlikely(slot.name.is_none()) {
            slot.name = Some(name);
            slot.hash = hash;
            slot.agg = Aggregate::single(value);
            self.occupied += 1;
            debug_assert!(
                self.occupied <= self.capacity - self.capacity / 8,
                "station table occupancy exceeded the 7/8 load-factor cap"
            );
            if self.occupied > self.capacity - self.capacity / 8 {
                return Err(EngineError::TableOverflow {
                    occupied: self.occupied,
                    capacity: self.capacity,
                });
            }
        } else {
            slot.agg.observe(value);
        }
        Ok(())
    }

    /// Merges every occupied slot of `other` into `self`. Associative and
    /// commutative, so per-chunk tables can be folded together in any order.
    pub fn merge(&mut self, other: &Self) -> EngineResult<()> {
        for slot in &other.slots {
            let Some(name) = slot.name else { continue };
            let slot_index = self.probe(name, slot.hash)?;
            let dest = &mut self.slots[slot_index];
            if dest.name.is_none() {
                dest.name = Some(name);
                dest.hash = slot.hash;
                dest.agg = slot.agg;
                self.occupied += 1;
                if self.occupied > self.capacity - self.capacity / 8 {
                    return Err(EngineError::TableOverflow {
                        occupied: self.occupied,
                        capacity: self.capacity,
                    });
                }
            } else {
                dest.agg.merge_from(&slot.agg);
            }
        }
        Ok(())
    }

    /// Quadratic probe sequence: `(h + i*i) & (C-1)`. Returns the index of
    /// either the existing matching slot or the first empty slot found.
    #[inline]
    fn probe(&self, name: ByteRange, hash: u64) -> EngineResult<usize> {
        let mut i: usize = 0;
        loop {
            let index = (hash as usize).wrapping_add(i * i) & self.mask;
            let slot = &self.slots[index];
            match slot.name {
                None => return Ok(index),
                Some(existing) if slot.hash == hash && existing == name => return Ok(index),
                Some(_) => {
                    i += 1;
                    if i > self.capacity {
                        return Err(EngineError::TableOverflow {
                            occupied: self.occupied,
                            capacity: self.capacity,
                        });
                    }
                }
            }
        }
    }

    /// Yields the occupied slots in unspecified order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (ByteRange, Aggregate)> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.name.map(|name| (name, slot.agg)))
    }

    #[must_use]
    pub fn total_count(&self) -> i64 {
        self.iter_occupied().map(|(_, agg)| i64::from(agg.count)).sum()
    }
}
