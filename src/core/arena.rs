//! Generational slot arena.
//!
//! Objects are stored in a flat `Vec` and referenced by typed handles.
//! Freed slots are recycled through a free list; each reuse
//! bumps the slot generation so stale handles stop resolving.

use serde::{Deserialize, Serialize};

use super::handle::Handle;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena addressed by handles of type `H`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Arena<H, T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
    #[serde(skip)]
    _handle: std::marker::PhantomData<H>,
}

impl<H: Handle, T> Default for Arena<H, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            _handle: std::marker::PhantomData,
        }
    }
}

impl<H: Handle, T> Arena<H, T> {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning its handle.
    pub fn alloc(&mut self, value: T) -> H {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            H::from_parts(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            H::from_parts(index, 0)
        }
    }

    /// Remove a value, invalidating its handle.
    pub fn free(&mut self, id: H) -> Option<T> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.len -= 1;
        Some(value)
    }

    /// Check whether a handle resolves.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: H) -> bool {
        self.get(id).is_some()
    }

    /// Resolve a handle.
    #[inline]
    #[must_use]
    pub fn get(&self, id: H) -> Option<&T> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_ref())
    }

    /// Resolve a handle mutably.
    #[inline]
    pub fn get_mut(&mut self, id: H) -> Option<&mut T> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Number of live values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the arena holds no live values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over live values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value
                .as_ref()
                .map(|v| (H::from_parts(i as u32, slot.generation), v))
        })
    }

    /// Iterate mutably over live values in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (H, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|v| (H::from_parts(i as u32, generation), v))
        })
    }
}

impl<H: Handle, T> std::ops::Index<H> for Arena<H, T> {
    type Output = T;

    /// Panics on a stale handle.
    fn index(&self, id: H) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("dangling {} handle {:?}", H::KIND, id),
        }
    }
}

impl<H: Handle, T> std::ops::IndexMut<H> for Arena<H, T> {
    fn index_mut(&mut self, id: H) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("dangling {} handle {:?}", H::KIND, id),
        }
    }
}
