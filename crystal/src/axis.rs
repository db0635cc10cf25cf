//! Remapping of a modeling tool's forward/up convention onto the engine's.
//!
//! Only the six canonical axis choices are supported. Each choice maps to at
//! most one quarter/half turn, see [`ForwardAxis::rotate`] and [`UpAxis::rotate`].

use std::{fmt, str::FromStr};

use crate::{
    angle::{Angle, IntoAngle},
    rotation::{rotate_x, rotate_y, rotate_z},
    vector::Vec3,
};

macro_rules! axis_enum {
    ( $( #[$meta:meta] )* $name:ident, default = $default:ident ) => {
        $( #[$meta] )*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            NegX,
            NegY,
            NegZ,
            PosX,
            PosY,
            PosZ,
        }

        impl $name {
            /// In the order used by the import dialog's index setting.
            pub const ALL: [Self; 6] = [
                Self::NegX,
                Self::NegY,
                Self::NegZ,
                Self::PosX,
                Self::PosY,
                Self::PosZ,
            ];

            pub fn from_index(index: usize) -> Option<Self> {
                Self::ALL.get(index).copied()
            }

            pub fn index(self) -> usize {
                self as usize
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    Self::NegX => "-x",
                    Self::NegY => "-y",
                    Self::NegZ => "-z",
                    Self::PosX => "+x",
                    Self::PosY => "+y",
                    Self::PosZ => "+z",
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AxisParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim().to_ascii_lowercase();
                let s = s.strip_prefix('+').unwrap_or(&s);
                match s {
                    "-x" => Ok(Self::NegX),
                    "-y" => Ok(Self::NegY),
                    "-z" => Ok(Self::NegZ),
                    "x" => Ok(Self::PosX),
                    "y" => Ok(Self::PosY),
                    "z" => Ok(Self::PosZ),
                    _ => Err(AxisParseError(s.to_owned())),
                }
            }
        }
    };
}

axis_enum!(
    /// The axis the source tool treats as "forward".
    ForwardAxis,
    default = NegZ
);

axis_enum!(
    /// The axis the source tool treats as "up".
    UpAxis,
    default = PosY
);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid axis `{0}`, expected one of -x -y -z +x +y +z")]
pub struct AxisParseError(String);

impl ForwardAxis {
    /// -X: -90° Z, -Y: 180° Z, -Z: +90° X, +X: +90° Z, +Y: none, +Z: -90° X
    pub fn rotate(self, v: Vec3<f32>) -> Vec3<f32> {
        match self {
            Self::NegX => rotate_z(v, quarter(-1.0)),
            Self::NegY => rotate_z(v, quarter(2.0)),
            Self::NegZ => rotate_x(v, quarter(1.0)),
            Self::PosX => rotate_z(v, quarter(1.0)),
            Self::PosY => v,
            Self::PosZ => rotate_x(v, quarter(-1.0)),
        }
    }
}

impl UpAxis {
    /// -X: -90° Y, -Y: none, -Z: 180° Y, +X: +90° Y, +Y: 180° Y, +Z: none
    pub fn rotate(self, v: Vec3<f32>) -> Vec3<f32> {
        match self {
            Self::NegX => rotate_y(v, quarter(-1.0)),
            Self::NegY => v,
            Self::NegZ => rotate_y(v, quarter(2.0)),
            Self::PosX => rotate_y(v, quarter(1.0)),
            Self::PosY => rotate_y(v, quarter(2.0)),
            Self::PosZ => v,
        }
    }
}

fn quarter(turns: f32) -> Angle<f32> {
    (90.0f32 * turns).deg()
}

/// Applies the forward rotation, then the up rotation.
///
/// `ForwardAxis::PosY` with `UpAxis::PosZ` (or `UpAxis::NegY`) is the identity.
pub fn fix_axis(v: Vec3<f32>, forward: ForwardAxis, up: UpAxis) -> Vec3<f32> {
    up.rotate(forward.rotate(v))
}
