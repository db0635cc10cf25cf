//! Right-handed rotations about the principal axes.

use std::ops::{Add, Mul, Neg, Sub};

use crate::{angle::Angle, scalar::Trig, vector::Vec3};

/// Rotates `v` about the x axis.
pub fn rotate_x<T>(v: Vec3<T>, angle: Angle<T>) -> Vec3<T>
where
    T: Clone + Trig<Output = T> + Add<T, Output = T> + Sub<T, Output = T> + Mul<T, Output = T>,
{
    let (sin, cos) = sin_cos(angle);
    Vec3::new(
        v.x,
        v.y.clone() * cos.clone() - v.z.clone() * sin.clone(),
        v.y * sin + v.z * cos,
    )
}

/// Rotates `v` about the y axis.
pub fn rotate_y<T>(v: Vec3<T>, angle: Angle<T>) -> Vec3<T>
where
    T: Clone
        + Trig<Output = T>
        + Add<T, Output = T>
        + Sub<T, Output = T>
        + Mul<T, Output = T>
        + Neg<Output = T>,
{
    let (sin, cos) = sin_cos(angle);
    Vec3::new(
        v.x.clone() * cos.clone() + v.z.clone() * sin.clone(),
        v.y,
        -(v.x * sin) + v.z * cos,
    )
}

/// Rotates `v` about the z axis.
pub fn rotate_z<T>(v: Vec3<T>, angle: Angle<T>) -> Vec3<T>
where
    T: Clone + Trig<Output = T> + Add<T, Output = T> + Sub<T, Output = T> + Mul<T, Output = T>,
{
    let (sin, cos) = sin_cos(angle);
    Vec3::new(
        v.x.clone() * cos.clone() - v.y.clone() * sin.clone(),
        v.x * sin + v.y * cos,
        v.z,
    )
}

fn sin_cos<T: Trig<Output = T>>(angle: Angle<T>) -> (T, T) {
    let rad = angle.to_rad();
    (rad.sin(), rad.cos())
}
