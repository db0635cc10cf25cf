mod angle;
mod axis;
mod rotation;
mod scalar;
mod vector;

#[cfg(feature = "serde-serialize")]
mod serde;

#[cfg(test)]
mod test_util;

pub mod prelude {
    pub use crate::angle::{Angle, IntoAngle};
    pub use crate::axis::{fix_axis, AxisParseError, ForwardAxis, UpAxis};
    pub use crate::rotation::{rotate_x, rotate_y, rotate_z};
    pub use crate::scalar::{Abs, One, Zero};
    pub use crate::vector::{Vec2, Vec3};
}
