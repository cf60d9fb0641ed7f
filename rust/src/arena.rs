//! Slot arena that owns every entry of a bimap.
//!
//! Entries never move once allocated: a slot id stays bound to the same entry
//! until that entry is deallocated, which is what makes bimap handles stable
//! across arbitrary tree reshaping.

use std::collections::TryReserveError;
use std::convert::TryFrom;
use std::ops::{Index, IndexMut};

use crate::error::{BimapError, BimapResult};

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Marks an absent child or parent link.
pub const NULL_NODE: NodeId = u32::MAX;

/// Statistics for an arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaStats {
    pub total_capacity: usize,
    pub allocated_count: usize,
    pub free_count: usize,
    pub utilization: f64,
    pub fragmentation: f64,
}

/// Arena allocator with slot reuse through a free list.
///
/// Every slot carries a generation that advances each time the slot is
/// freed, so an id paired with the generation it was issued under names one
/// occupant only, even after the slot is reused.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    /// Slot storage; `None` marks a freed slot.
    slots: Vec<Option<T>>,
    /// Generation per slot index; may outlive the slot itself after `clear`.
    generations: Vec<u32>,
    /// Free slot indices for reuse
    free_list: Vec<usize>,
    /// Number of occupied slots.
    allocated: usize,
}

impl<T> Arena<T> {
    /// Create a new arena with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            allocated: 0,
        }
    }

    /// Reserve room for `additional` more items, reporting allocation failure
    /// instead of aborting.
    pub fn try_reserve(&mut self, additional: usize) -> BimapResult<()> {
        let fresh = additional.saturating_sub(self.free_list.len());
        self.slots
            .try_reserve(fresh)
            .map_err(|e: TryReserveError| {
                BimapError::allocation_error(&format!("{} arena slots", fresh), &e.to_string())
            })
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = self
            .free_list
            .last()
            .copied()
            .unwrap_or(self.slots.len());

        // The two top ids are reserved for NULL_NODE and the sentinel.
        let id = match NodeId::try_from(index) {
            Ok(id) if id < NULL_NODE - 1 => id,
            _ => panic!("arena exhausted: slot index {} does not fit in a NodeId", index),
        };

        if self.free_list.pop().is_some() {
            self.slots[index] = Some(item);
        } else {
            self.slots.push(Some(item));
            if self.generations.len() < self.slots.len() {
                self.generations.push(0);
            }
        }
        self.allocated += 1;
        id
    }

    /// Deallocate an item from the arena and return it
    #[inline]
    pub fn deallocate(&mut self, id: NodeId) -> Option<T> {
        let index = usize::try_from(id).ok()?;
        let item = self.slots.get_mut(index)?.take()?;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_list.push(index);
        self.allocated -= 1;
        Some(item)
    }

    /// Current generation of slot `id`; 0 for ids that were never allocated.
    #[inline]
    pub fn generation(&self, id: NodeId) -> u32 {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.generations.get(index))
            .copied()
            .unwrap_or(0)
    }

    /// Get the item at `id` only if the slot is still in `generation`.
    #[inline]
    pub fn get_versioned(&self, id: NodeId, generation: u32) -> Option<&T> {
        if self.generation(id) != generation {
            return None;
        }
        self.get(id)
    }

    /// Start every slot one generation past where `previous` left it.
    ///
    /// Used when this (empty) arena replaces `previous`, so ids issued by the
    /// old arena cannot match entries of the new one.
    pub fn succeed(&mut self, previous: &Arena<T>) {
        debug_assert!(self.slots.is_empty());
        self.generations = previous
            .generations
            .iter()
            .map(|generation| generation.wrapping_add(1))
            .collect();
    }

    /// Get a reference to an item in the arena
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        let index = usize::try_from(id).ok()?;
        self.slots.get(index)?.as_ref()
    }

    /// Get a mutable reference to an item in the arena
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = usize::try_from(id).ok()?;
        self.slots.get_mut(index)?.as_mut()
    }

    /// Check if an ID is valid and allocated
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get arena statistics
    pub fn stats(&self) -> ArenaStats {
        let total_capacity = self.slots.capacity();
        let allocated_count = self.allocated;
        let free_count = self.free_list.len();
        let utilization = if total_capacity > 0 {
            allocated_count as f64 / total_capacity as f64
        } else {
            0.0
        };
        let fragmentation = if allocated_count > 0 {
            free_count as f64 / (allocated_count + free_count) as f64
        } else {
            0.0
        };

        ArenaStats {
            total_capacity,
            allocated_count,
            free_count,
            utilization,
            fragmentation,
        }
    }

    /// Get the number of allocated items
    pub fn len(&self) -> usize {
        self.allocated
    }

    /// Drop every item and forget all slots. Slot generations advance so
    /// ids issued before the clear stay invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        for generation in &mut self.generations {
            *generation = generation.wrapping_add(1);
        }
        self.free_list.clear();
        self.allocated = 0;
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("node {} is not allocated in this arena", id),
        }
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        match self.get_mut(id) {
            Some(item) => item,
            None => panic!("node {} is not allocated in this arena", id),
        }
    }
}
