use crate::error::{ExtractError, Result};

/// Fixed-capacity open-addressing table mapping group names to slot indices
/// in the group list.
///
/// The hash is the sum of the key's byte values modulo capacity. Collisions
/// are resolved by linear probing: insertion scans forward (wrapping at
/// capacity) until it finds the key or an empty slot, and lookup probes the
/// same sequence, stopping at the first empty slot. The table never resizes;
/// the caller picks a capacity comfortably above the expected number of
/// distinct groups, and running out of slots is a caller error.
pub struct ProbeTable {
    slots: Vec<Option<(String, usize)>>,
}

impl ProbeTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn bucket(&self, key: &str) -> usize {
        key.bytes().map(|b| b as usize).sum::<usize>() % self.slots.len()
    }

    /// Look up the value stored for `key`. A probe that reaches an empty
    /// slot is a miss.
    pub fn get(&self, key: &str) -> Option<usize> {
        let capacity = self.slots.len();
        if capacity == 0 {
            return None;
        }
        let start = self.bucket(key);
        for probe in 0..capacity {
            match &self.slots[(start + probe) % capacity] {
                Some((name, value)) if name == key => return Some(*value),
                Some(_) => continue,
                None => return None,
            }
        }
        None
    }

    /// Insert `key` with `value`, overwriting the value if the key is
    /// already present. Fails with `CapacityExceeded` when every slot is
    /// occupied by another key.
    pub fn insert(&mut self, key: &str, value: usize) -> Result<()> {
        let capacity = self.slots.len();
        if capacity == 0 {
            return Err(ExtractError::CapacityExceeded { capacity });
        }
        let start = self.bucket(key);
        for probe in 0..capacity {
            let slot = (start + probe) % capacity;
            match &mut self.slots[slot] {
                Some((name, stored)) if name == key => {
                    *stored = value;
                    return Ok(());
                }
                Some(_) => continue,
                empty @ None => {
                    *empty = Some((key.to_string(), value));
                    return Ok(());
                }
            }
        }
        Err(ExtractError::CapacityExceeded { capacity })
    }
}
