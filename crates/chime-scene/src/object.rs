use std::fmt;

/// A generational handle to a scene object. A stale id (its slot was freed and
/// possibly reused) never resolves to the new occupant.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ObjectId {
    /// The slot index of this object.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The generation of this object (incremented each time the slot is freed).
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Hands out object slots and recycles freed ones.
pub(crate) struct ObjectSlots {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_list: Vec<u32>,
    len: usize,
}

impl ObjectSlots {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn allocate(&mut self) -> ObjectId {
        self.len += 1;
        match self.free_list.pop() {
            Some(index) => {
                self.alive[index as usize] = true;
                ObjectId {
                    index,
                    generation: self.generations[index as usize],
                }
            }
            None => {
                let index = self.generations.len() as u32;
                self.generations.push(0);
                self.alive.push(true);
                ObjectId { index, generation: 0 }
            }
        }
    }

    /// Free the slot of a live object. Returns `false` for dead or stale ids.
    pub fn free(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let idx = id.index as usize;
        self.alive[idx] = false;
        self.generations[idx] += 1;
        self.free_list.push(id.index);
        self.len -= 1;
        true
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        let idx = id.index as usize;
        idx < self.alive.len() && self.alive[idx] && self.generations[idx] == id.generation
    }

    /// Rebuild the live id for a slot index, if the slot is occupied.
    pub fn id_at(&self, index: u32) -> Option<ObjectId> {
        let idx = index as usize;
        (idx < self.alive.len() && self.alive[idx]).then(|| ObjectId {
            index,
            generation: self.generations[idx],
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_reused_with_new_generation() {
        let mut slots = ObjectSlots::new();
        let a = slots.allocate();
        assert!(slots.free(a));
        let b = slots.allocate();
        assert_eq!(b.index(), a.index());
        assert_eq!(b.generation(), 1);
        assert!(!slots.is_alive(a));
        assert!(slots.is_alive(b));
    }

    #[test]
    fn double_free_is_rejected() {
        let mut slots = ObjectSlots::new();
        let a = slots.allocate();
        assert!(slots.free(a));
        assert!(!slots.free(a));
        assert_eq!(slots.len(), 0);
    }

    #[test]
    fn id_at_tracks_current_generation() {
        let mut slots = ObjectSlots::new();
        let a = slots.allocate();
        assert_eq!(slots.id_at(0), Some(a));
        slots.free(a);
        assert_eq!(slots.id_at(0), None);
        let b = slots.allocate();
        assert_eq!(slots.id_at(0), Some(b));
    }
}
