pub trait IntoAngle: Sized {
    fn rad(self) -> Angle<Self>;
    fn deg(self) -> Angle<Self>;
}

macro_rules! impl_into_angle {
    ( $( $float:ident )+ ) => {
        $(
            impl IntoAngle for $float {
                fn rad(self) -> Angle<Self> {
                    Angle::from_rad(self)
                }

                fn deg(self) -> Angle<Self> {
                    Angle::from_rad(self * (::std::$float::consts::PI / 180.0))
                }
            }
        )+
    };
}

impl_into_angle! { f32 f64 }

/// An angle stored in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Angle<T> {
    radians: T,
}

impl<T> Angle<T> {
    pub const fn from_rad(radians: T) -> Self {
        Self { radians }
    }

    pub fn to_rad(self) -> T {
        self.radians
    }
}
