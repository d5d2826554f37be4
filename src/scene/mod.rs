mod hitable;
mod packed;

pub use hitable::{Color, Hitable, Material, MaterialKind, Shape, TexCoord};
pub use packed::{PACKED_HITABLE_SIZE, PackedHitable};

use thiserror::Error;

/// Number of object slots shared between host and shader. The shader indexes
/// the uniform block with the same constant, so this is not tunable at
/// runtime.
pub const WORLD_CAPACITY: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("world is full ({capacity} objects)")]
    CapacityExceeded { capacity: usize },

    #[error("index {index} out of range for world of capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },
}

/// The whole scene: a fixed-capacity, index-addressed array of [`Hitable`]
/// slots plus the packed wire buffer the host uploads to the GPU.
///
/// Mutations mark the wire buffer dirty; [`World::packed`] repacks lazily so
/// the host can skip redundant uploads via [`World::is_dirty`]. Slots beyond
/// the populated range always upload as `kind = none` records.
pub struct World {
    slots: Box<[Option<Hitable>; WORLD_CAPACITY]>,
    /// High-water mark: one past the largest index ever written.
    len: usize,
    packed: Box<[PackedHitable; WORLD_CAPACITY]>,
    dirty: bool,
}

impl World {
    pub fn new() -> World {
        World {
            slots: Box::new(std::array::from_fn(|_| None)),
            len: 0,
            packed: Box::new([PackedHitable::EMPTY; WORLD_CAPACITY]),
            dirty: true,
        }
    }

    /// Writes at the high-water mark and returns the slot index.
    pub fn append(&mut self, hitable: Hitable) -> Result<usize, SceneError> {
        if self.len >= WORLD_CAPACITY {
            return Err(SceneError::CapacityExceeded {
                capacity: WORLD_CAPACITY,
            });
        }
        let index = self.len;
        self.slots[index] = Some(hitable);
        self.len += 1;
        self.dirty = true;
        Ok(index)
    }

    /// Replaces an arbitrary slot, raising the high-water mark when writing
    /// past it. Slots skipped over stay empty.
    pub fn overwrite(&mut self, index: usize, hitable: Hitable) -> Result<(), SceneError> {
        if index >= WORLD_CAPACITY {
            return Err(SceneError::IndexOutOfRange {
                index,
                capacity: WORLD_CAPACITY,
            });
        }
        self.slots[index] = Some(hitable);
        self.len = self.len.max(index + 1);
        self.dirty = true;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Hitable> {
        self.slots.get(index)?.as_ref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn remaining_capacity(&self) -> usize {
        WORLD_CAPACITY - self.len
    }

    /// Whether the wire buffer is stale relative to the slots.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The full wire buffer, repacked if any slot changed since the last
    /// call. Always [`WORLD_CAPACITY`] records long.
    pub fn packed(&mut self) -> &[PackedHitable; WORLD_CAPACITY] {
        if self.dirty {
            for (record, slot) in self.packed.iter_mut().zip(self.slots.iter()) {
                *record = match slot {
                    Some(hitable) => PackedHitable::from(hitable),
                    None => PackedHitable::EMPTY,
                };
            }
            self.dirty = false;
            log::debug!("repacked world buffer: {} populated slots", self.len);
        }
        &self.packed
    }

    /// Byte view of the wire buffer for the upload collaborator.
    pub fn packed_bytes(&mut self) -> &[u8] {
        bytemuck::cast_slice(&self.packed()[..])
    }
}

impl Default for World {
    fn default() -> World {
        World::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector;
    use assert2::{assert, let_assert};

    fn sphere(radius: f32) -> Hitable {
        Hitable::sphere(Vector::from([0.0, 0.0, 0.0]), radius)
    }

    #[test]
    fn append_returns_consecutive_indices() {
        let mut world = World::new();
        assert!(world.append(sphere(1.0)).unwrap() == 0);
        assert!(world.append(sphere(2.0)).unwrap() == 1);
        assert!(world.len() == 2);
        assert!(world.remaining_capacity() == WORLD_CAPACITY - 2);
    }

    #[test]
    fn append_past_capacity_fails() {
        let mut world = World::new();
        for _ in 0..WORLD_CAPACITY {
            world.append(sphere(1.0)).unwrap();
        }
        let_assert!(Err(e) = world.append(sphere(1.0)));
        assert!(
            e == SceneError::CapacityExceeded {
                capacity: WORLD_CAPACITY
            }
        );
    }

    #[test]
    fn overwrite_past_high_water_mark_raises_len() {
        let mut world = World::new();
        world.overwrite(10, sphere(1.0)).unwrap();
        assert!(world.len() == 11);
        assert!(world.get(10).is_some());
        // the skipped slots stay empty
        assert!(world.get(5).is_none());
    }

    #[test]
    fn overwrite_out_of_range_fails() {
        let mut world = World::new();
        let_assert!(Err(e) = world.overwrite(WORLD_CAPACITY, sphere(1.0)));
        assert!(
            e == SceneError::IndexOutOfRange {
                index: WORLD_CAPACITY,
                capacity: WORLD_CAPACITY
            }
        );
    }

    #[test]
    fn packing_clears_the_dirty_flag() {
        let mut world = World::new();
        assert!(world.is_dirty());
        world.packed();
        assert!(!world.is_dirty());

        world.append(sphere(1.0)).unwrap();
        assert!(world.is_dirty());
        let packed = world.packed();
        assert!(packed[0].kind == 0);
        assert!(!world.is_dirty());
    }

    #[test]
    fn unpopulated_slots_pack_as_empty_records() {
        let mut world = World::new();
        world.append(sphere(1.0)).unwrap();
        let packed = world.packed();
        for record in &packed[1..] {
            assert!(record == &PackedHitable::EMPTY);
        }
    }

    #[test]
    fn packed_bytes_covers_the_whole_buffer() {
        let mut world = World::new();
        assert!(world.packed_bytes().len() == WORLD_CAPACITY * PACKED_HITABLE_SIZE);
    }
}
