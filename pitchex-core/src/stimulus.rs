use crate::{StimulusCategory, TRIPLET_LEN};
use serde::{Deserialize, Serialize};

/// One tone of a triplet
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusItem {
    pub value: u32,
    pub is_odd: bool,
}

/// Three-item stimulus set with exactly one odd item at `odd_position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triplet {
    pub category: StimulusCategory,
    pub items: [StimulusItem; TRIPLET_LEN],
    pub odd_position: usize,
}

impl Triplet {
    /// Builds a triplet of `base` values with `odd` placed at `odd_position`.
    ///
    /// `odd_position` must be below [`TRIPLET_LEN`]; generators pick it with
    /// `random_range(0..TRIPLET_LEN)`.
    pub fn new(category: StimulusCategory, base: u32, odd: u32, odd_position: usize) -> Self {
        debug_assert!(odd_position < TRIPLET_LEN);
        let mut items = [StimulusItem {
            value: base,
            is_odd: false,
        }; TRIPLET_LEN];
        items[odd_position] = StimulusItem {
            value: odd,
            is_odd: true,
        };
        Self {
            category,
            items,
            odd_position,
        }
    }

    pub fn base_value(&self) -> u32 {
        self.items
            .iter()
            .find(|item| !item.is_odd)
            .map_or(0, |item| item.value)
    }

    pub fn odd_value(&self) -> u32 {
        self.items[self.odd_position].value
    }

    /// Magnitude of the gap between odd and base values
    pub fn difference(&self) -> u32 {
        self.odd_value().abs_diff(self.base_value())
    }

    /// Values in presentation order
    pub fn values(&self) -> [u32; TRIPLET_LEN] {
        self.items.map(|item| item.value)
    }
}
