//! Per-slot reveal bookkeeping for one pack.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};

/// The set of pack slots that have been flipped face-up.
///
/// Values are never edited in place by the lifecycle: every reveal produces a
/// new `RevealState`, so a snapshot taken earlier stays consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRevealState")]
pub struct RevealState {
    pack_len: usize,
    revealed: BTreeSet<usize>,
}

/// Unchecked wire form; every index must be inside the pack.
#[derive(Deserialize)]
struct RawRevealState {
    pack_len: usize,
    revealed: BTreeSet<usize>,
}

impl TryFrom<RawRevealState> for RevealState {
    type Error = PackError;

    fn try_from(raw: RawRevealState) -> Result<Self> {
        if let Some(&index) = raw.revealed.iter().find(|&&i| i >= raw.pack_len) {
            return Err(PackError::InvalidRevealIndex {
                index,
                len: raw.pack_len,
            });
        }
        Ok(Self {
            pack_len: raw.pack_len,
            revealed: raw.revealed,
        })
    }
}

impl RevealState {
    /// A fresh state with nothing revealed for a pack of `pack_len` cards.
    pub fn new(pack_len: usize) -> Self {
        Self {
            pack_len,
            revealed: BTreeSet::new(),
        }
    }

    /// Number of slots in the pack.
    pub fn pack_len(&self) -> usize {
        self.pack_len
    }

    /// Number of revealed slots.
    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revealed.is_empty()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }

    /// Revealed slot indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.revealed.iter().copied()
    }

    /// Slots still face-down.
    pub fn remaining(&self) -> usize {
        self.pack_len.saturating_sub(self.revealed.len())
    }

    /// Every slot of the pack has been revealed.
    pub fn is_complete(&self) -> bool {
        is_complete(self, self.pack_len)
    }

    /// Return the state with `index` revealed.
    ///
    /// Revealing an already revealed slot returns an identical state. An index
    /// outside the pack is rejected with [`PackError::InvalidRevealIndex`].
    pub fn reveal(&self, index: usize) -> Result<RevealState> {
        if index >= self.pack_len {
            return Err(PackError::InvalidRevealIndex {
                index,
                len: self.pack_len,
            });
        }
        let mut next = self.clone();
        next.revealed.insert(index);
        Ok(next)
    }

    /// Return the state with every slot revealed.
    pub fn reveal_all(&self) -> RevealState {
        Self {
            pack_len: self.pack_len,
            revealed: (0..self.pack_len).collect(),
        }
    }
}

/// Completion law: all `pack_len` slots are revealed.
pub fn is_complete(state: &RevealState, pack_len: usize) -> bool {
    state.revealed.len() == pack_len
}
