use crate::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Flags controlling side effects of a selection pass.
///
/// Serialized as the raw `u8`; undefined bits are rejected on input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SelectionOptions(u8);

impl SelectionOptions {
    pub const NONE: Self = Self(0);
    /// Persist ticket changes for SCP candidates.
    pub const MODIFY_SCP_TICKETS: Self = Self(1 << 0);
    /// Record assigned human roles in player history.
    pub const MODIFY_HUMAN_HISTORY: Self = Self(1 << 1);
    /// Let SCP slots exceed the spawner cap.
    pub const ALLOW_SCP_OVERFLOW: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Builds a set from raw bits, dropping undefined ones.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for SelectionOptions {
    type Error = SelectionError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        if bits & !Self::ALL.0 != 0 {
            return Err(SelectionError::Config(format!(
                "unknown selection option bits {:#04x} (defined: {:#04x})",
                bits & !Self::ALL.0,
                Self::ALL.0
            )));
        }
        Ok(Self(bits))
    }
}

impl From<SelectionOptions> for u8 {
    fn from(options: SelectionOptions) -> u8 {
        options.0
    }
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self::MODIFY_SCP_TICKETS | Self::MODIFY_HUMAN_HISTORY
    }
}

impl BitOr for SelectionOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SelectionOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for SelectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::MODIFY_SCP_TICKETS) {
            names.push("MODIFY_SCP_TICKETS");
        }
        if self.contains(Self::MODIFY_HUMAN_HISTORY) {
            names.push("MODIFY_HUMAN_HISTORY");
        }
        if self.contains(Self::ALLOW_SCP_OVERFLOW) {
            names.push("ALLOW_SCP_OVERFLOW");
        }
        if names.is_empty() {
            return f.write_str("NONE");
        }
        f.write_str(&names.join(" | "))
    }
}
