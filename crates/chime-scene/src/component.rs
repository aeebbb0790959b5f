use std::any::Any;

/// Marker trait for types that can be attached to scene objects.
pub trait Component: 'static + Send + Sync {}

impl<T: 'static + Send + Sync> Component for T {}

/// Type-erased view of a component storage, so the scene can strip every
/// component off an object when it is destroyed.
pub(crate) trait ComponentStorage: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn remove(&mut self, index: u32) -> bool;
}

/// Sparse-set storage for one component type: slot index → dense index.
pub(crate) struct SparseSet<T> {
    sparse: Vec<Option<usize>>,
    dense: Vec<T>,
    owners: Vec<u32>,
}

impl<T: Component> SparseSet<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            owners: Vec::new(),
        }
    }

    /// Insert or replace the component for a slot.
    pub fn insert(&mut self, index: u32, value: T) {
        let idx = index as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }
        match self.sparse[idx] {
            Some(dense_idx) => self.dense[dense_idx] = value,
            None => {
                self.sparse[idx] = Some(self.dense.len());
                self.dense.push(value);
                self.owners.push(index);
            }
        }
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        let dense_idx = (*self.sparse.get(index as usize)?)?;
        self.dense.get(dense_idx)
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        let dense_idx = (*self.sparse.get(index as usize)?)?;
        self.dense.get_mut(dense_idx)
    }

    /// Iterate over `(slot index, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.dense.len()
    }
}

impl<T: Component> ComponentStorage for SparseSet<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove(&mut self, index: u32) -> bool {
        let Some(dense_idx) = self.sparse.get_mut(index as usize).and_then(Option::take) else {
            return false;
        };
        self.dense.swap_remove(dense_idx);
        self.owners.swap_remove(dense_idx);
        // The former last element now lives at `dense_idx`.
        if let Some(&moved) = self.owners.get(dense_idx) {
            self.sparse[moved as usize] = Some(dense_idx);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut set = SparseSet::new();
        set.insert(5, 42i32);
        assert_eq!(set.get(5), Some(&42));
        assert_eq!(set.get(0), None);
        assert_eq!(set.get(99), None);
    }

    #[test]
    fn overwrite() {
        let mut set = SparseSet::new();
        set.insert(0, 1i32);
        set.insert(0, 2);
        assert_eq!(set.get(0), Some(&2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_keeps_other_slots_addressable() {
        let mut set = SparseSet::new();
        set.insert(0, 'a');
        set.insert(1, 'b');
        set.insert(2, 'c');
        assert!(set.remove(0));
        assert!(!set.remove(0));
        assert_eq!(set.get(0), None);
        assert_eq!(set.get(1), Some(&'b'));
        assert_eq!(set.get(2), Some(&'c'));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_last_element() {
        let mut set = SparseSet::new();
        set.insert(3, "x");
        assert!(set.remove(3));
        assert_eq!(set.len(), 0);
        assert_eq!(set.iter().count(), 0);
    }
}
