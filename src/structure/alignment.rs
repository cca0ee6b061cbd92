// Tue Jan 13 2026 - Alex

use crate::structure::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A power-of-two byte boundary. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Alignment {
    value: u64,
}

impl Alignment {
    pub const ONE: Alignment = Alignment { value: 1 };

    pub fn new(value: u64) -> Result<Self, LayoutError> {
        if value == 0 || !value.is_power_of_two() {
            return Err(LayoutError::InvalidAlignment(value));
        }
        Ok(Self { value })
    }

    pub fn as_u64(&self) -> u64 {
        self.value
    }

    /// Rounds `offset` up to this boundary. Saturates at the last aligned value.
    pub fn align(&self, offset: u64) -> u64 {
        let mask = self.value - 1;
        offset.saturating_add(mask) & !mask
    }

    pub fn is_aligned(&self, offset: u64) -> bool {
        offset & (self.value - 1) == 0
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u64> for Alignment {
    type Error = LayoutError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Alignment> for u64 {
    fn from(alignment: Alignment) -> Self {
        alignment.value
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Size and alignment of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    pub size: u64,
    pub align: Alignment,
}

impl Layout {
    pub const EMPTY: Layout = Layout { size: 0, align: Alignment::ONE };

    pub fn new(size: u64, align: Alignment) -> Self {
        Self { size, align }
    }

    /// Builds a layout from raw numbers, used for ABI table entries.
    pub fn from_raw(size: u64, align: u64) -> Result<Self, LayoutError> {
        let align = Alignment::new(align)?;
        if size % align.as_u64() != 0 {
            return Err(LayoutError::InvalidSize { size, align: align.as_u64() });
        }
        Ok(Self { size, align })
    }

    /// Layout of `count` elements back to back, `None` when the size overflows.
    pub fn checked_repeat(&self, count: u64) -> Option<Self> {
        let size = self.size.checked_mul(count)?;
        Some(Self { size, align: self.align })
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Size: {}, Align: {}]", self.size, self.align)
    }
}
