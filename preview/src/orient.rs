//! Display orientation tracking.
//!
//! The capture pipeline delivers frames in the sensor's native layout, so
//! the presenter rotates the texture to match the display. The mapping
//! from physical orientation to rotation angle is a fixed table dictated
//! by the sensor mounting convention; it is queried at startup and again
//! on every resize/orientation-change event.

/// Physical orientation of the display, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayOrientation {
    /// The platform could not determine the orientation.
    Unknown,
    /// Landscape, the device's natural "wide" position.
    Landscape,
    /// Landscape rotated 180 degrees.
    LandscapeFlipped,
    /// Portrait, the device's "tall" position.
    Portrait,
    /// Portrait rotated 180 degrees.
    PortraitFlipped,
}

/// Clockwise quarter-turn applied when drawing the camera texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation.
    Deg0,
    /// 90 degrees clockwise.
    Deg90,
    /// 180 degrees.
    Deg180,
    /// 270 degrees clockwise.
    Deg270,
}

impl Rotation {
    /// Rotation angle in degrees, clockwise.
    #[must_use]
    pub const fn degrees(self) -> f32 {
        match self {
            Self::Deg0 => 0.0,
            Self::Deg90 => 90.0,
            Self::Deg180 => 180.0,
            Self::Deg270 => 270.0,
        }
    }

    /// Whether this rotation transposes the texture's on-screen footprint.
    #[must_use]
    pub const fn is_quarter_turn(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

impl From<DisplayOrientation> for Rotation {
    fn from(orientation: DisplayOrientation) -> Self {
        match orientation {
            DisplayOrientation::Unknown | DisplayOrientation::Landscape => Self::Deg180,
            DisplayOrientation::LandscapeFlipped => Self::Deg0,
            DisplayOrientation::Portrait => Self::Deg270,
            DisplayOrientation::PortraitFlipped => Self::Deg90,
        }
    }
}
