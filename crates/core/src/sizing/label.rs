//! Size labels and the ordinal ladder used for fit adjustments.

use std::fmt;

use serde::{Serialize, Serializer};

/// The fixed ordinal ladder for alpha sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlphaSize {
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl AlphaSize {
    /// One step down the ladder for a slim fit. Both extended widths
    /// collapse to `L` rather than stepping through each other.
    #[must_use]
    pub const fn slim_step_down(self) -> Self {
        match self {
            Self::S | Self::M => Self::S,
            Self::L => Self::M,
            Self::Xl | Self::Xxl => Self::L,
        }
    }

    /// One step up the ladder for a relaxed fit.
    #[must_use]
    pub const fn relaxed_step_up(self) -> Self {
        match self {
            Self::S => Self::M,
            Self::M => Self::L,
            Self::L => Self::Xl,
            Self::Xl | Self::Xxl => Self::Xxl,
        }
    }

    /// One step up for a high BMI. Unlike the relaxed nudge, `XL` and above
    /// are left alone.
    #[must_use]
    pub const fn bmi_step_up(self) -> Self {
        match self {
            Self::S => Self::M,
            Self::M => Self::L,
            Self::L | Self::Xl => Self::Xl,
            Self::Xxl => Self::Xxl,
        }
    }

    /// The display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "XXL",
        }
    }
}

impl fmt::Display for AlphaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recommended size: an alpha label for torso garments or an even numeric
/// waist size (inches) for trousers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeLabel {
    Alpha(AlphaSize),
    Numeric(u32),
}

impl SizeLabel {
    /// Apply an alpha-ladder step. Numeric trouser sizes are not on the
    /// ladder and pass through unchanged.
    #[must_use]
    pub fn map_alpha(self, step: impl FnOnce(AlphaSize) -> AlphaSize) -> Self {
        match self {
            Self::Alpha(alpha) => Self::Alpha(step(alpha)),
            Self::Numeric(_) => self,
        }
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alpha(alpha) => alpha.fmt(f),
            Self::Numeric(size) => size.fmt(f),
        }
    }
}

impl Serialize for SizeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
