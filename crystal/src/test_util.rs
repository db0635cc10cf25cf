use std::{fmt, ops::Sub};

use crate::{scalar::Abs, vector::Vec3};

#[derive(Debug, Clone)]
pub struct VecCmp<T> {
    error_margin: T,
}

impl<T> VecCmp<T>
where
    T: fmt::Debug + Clone + PartialOrd + Abs<Output = T> + Sub<T, Output = T>,
{
    pub fn eq_margin(&self, is: &Vec3<T>, should: &Vec3<T>, error_margin: T) {
        let pairs = [(&is.x, &should.x), (&is.y, &should.y), (&is.z, &should.z)];

        for (idx, (v1, v2)) in pairs.iter().enumerate() {
            let diff_abs = ((*v1).clone() - (*v2).clone()).abs();

            assert!(
                diff_abs <= error_margin,
                "is: {:?} should: {:?} (+- {:?}) @ {}",
                is,
                should,
                error_margin,
                idx
            );
        }
    }

    pub fn eq(&self, is: &Vec3<T>, should: &Vec3<T>) {
        self.eq_margin(is, should, self.error_margin.clone())
    }
}

impl VecCmp<f32> {
    pub const DEFAULT: Self = Self { error_margin: 1e-6 };
}

impl VecCmp<f64> {
    pub const DEFAULT: Self = Self { error_margin: 1e-12 };
}
