//! Per-cell categorical state: surface type, derived danger level and fire state
//!
//! # Surface → danger table
//!
//! | Surface  | Danger |
//! |----------|--------|
//! | water    | low    |
//! | sand     | low    |
//! | forest   | high   |
//! | soil     | medium |
//! | farmland | medium |
//! | unknown  | medium |
//!
//! Water and sand are barriers: they never ignite regardless of any
//! probability roll.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surface type inferred from a false-color vegetation-index sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    /// Open water (barrier)
    Water,
    /// Beach, dunes, bare sand (barrier)
    Sand,
    /// Dense vegetation
    Forest,
    /// Bare or sparsely covered soil
    Soil,
    /// Cultivated land
    Farmland,
    /// Sample matched no rule
    #[default]
    Unknown,
}

impl SurfaceType {
    /// Every surface type, in FFI code order
    pub const ALL: [SurfaceType; 6] = [
        SurfaceType::Water,
        SurfaceType::Sand,
        SurfaceType::Forest,
        SurfaceType::Soil,
        SurfaceType::Farmland,
        SurfaceType::Unknown,
    ];

    /// Danger level implied by this surface type
    pub fn danger_level(self) -> DangerLevel {
        match self {
            SurfaceType::Water | SurfaceType::Sand => DangerLevel::Low,
            SurfaceType::Forest => DangerLevel::High,
            SurfaceType::Soil | SurfaceType::Farmland | SurfaceType::Unknown => {
                DangerLevel::Medium
            }
        }
    }

    /// Barrier surfaces can never ignite
    pub fn is_barrier(self) -> bool {
        matches!(self, SurfaceType::Water | SurfaceType::Sand)
    }

    /// Lower-case name used in logs and configuration files
    pub fn name(self) -> &'static str {
        match self {
            SurfaceType::Water => "water",
            SurfaceType::Sand => "sand",
            SurfaceType::Forest => "forest",
            SurfaceType::Soil => "soil",
            SurfaceType::Farmland => "farmland",
            SurfaceType::Unknown => "unknown",
        }
    }

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        match self {
            SurfaceType::Water => 0,
            SurfaceType::Sand => 1,
            SurfaceType::Forest => 2,
            SurfaceType::Soil => 3,
            SurfaceType::Farmland => 4,
            SurfaceType::Unknown => 5,
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cell danger level, derived from the surface type only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DangerLevel {
    Low,
    Medium,
    High,
    /// Not produced by the fixed surface table; kept for renderers that
    /// colour by danger and for future surface types.
    Extreme,
}

impl DangerLevel {
    /// Every danger level, in FFI code order
    pub const ALL: [DangerLevel; 4] = [
        DangerLevel::Low,
        DangerLevel::Medium,
        DangerLevel::High,
        DangerLevel::Extreme,
    ];

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        match self {
            DangerLevel::Low => 0,
            DangerLevel::Medium => 1,
            DangerLevel::High => 2,
            DangerLevel::Extreme => 3,
        }
    }
}

/// Fire state of a cell. The only transition is `Unburned → Burning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireState {
    #[default]
    Unburned,
    Burning,
}

impl FireState {
    pub fn is_burning(self) -> bool {
        self == FireState::Burning
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        match self {
            FireState::Unburned => 0,
            FireState::Burning => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_table() {
        assert_eq!(SurfaceType::Water.danger_level(), DangerLevel::Low);
        assert_eq!(SurfaceType::Sand.danger_level(), DangerLevel::Low);
        assert_eq!(SurfaceType::Forest.danger_level(), DangerLevel::High);
        assert_eq!(SurfaceType::Soil.danger_level(), DangerLevel::Medium);
        assert_eq!(SurfaceType::Farmland.danger_level(), DangerLevel::Medium);
        assert_eq!(SurfaceType::Unknown.danger_level(), DangerLevel::Medium);
    }

    #[test]
    fn test_barriers() {
        let barriers: Vec<_> = SurfaceType::ALL
            .iter()
            .filter(|s| s.is_barrier())
            .copied()
            .collect();
        assert_eq!(barriers, vec![SurfaceType::Water, SurfaceType::Sand]);
    }

    #[test]
    fn test_surface_type_conversion() {
        for surface in SurfaceType::ALL {
            assert_eq!(SurfaceType::from_u8(surface.as_u8()), Some(surface));
        }
        assert_eq!(SurfaceType::from_u8(6), None);
        assert_eq!(SurfaceType::from_u8(255), None);
    }

    #[test]
    fn test_surface_serde_names() {
        assert_eq!(SurfaceType::Farmland.to_string(), "farmland");
        assert_eq!(SurfaceType::default(), SurfaceType::Unknown);
    }
}
