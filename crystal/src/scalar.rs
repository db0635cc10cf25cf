pub trait Zero {
    fn zero() -> Self;
}

pub trait One {
    fn one() -> Self;
}

pub trait Abs {
    type Output;

    fn abs(&self) -> Self::Output;
}

pub trait Trig {
    type Output;

    fn sin(&self) -> Self::Output;
    fn cos(&self) -> Self::Output;
}

macro_rules! impl_int_scalar {
    ( $( $num:ty )+ ) => {
        $(
            impl Zero for $num {
                fn zero() -> Self {
                    0
                }
            }

            impl One for $num {
                fn one() -> Self {
                    1
                }
            }
        )+
    };
}

macro_rules! impl_float_scalar {
    ( $( $float:ty )+ ) => {
        $(
            impl Zero for $float {
                fn zero() -> Self {
                    0.0
                }
            }

            impl One for $float {
                fn one() -> Self {
                    1.0
                }
            }

            impl Abs for $float {
                type Output = Self;

                fn abs(&self) -> Self::Output {
                    (*self).abs()
                }
            }

            impl Trig for $float {
                type Output = Self;

                fn sin(&self) -> Self::Output {
                    (*self).sin()
                }

                fn cos(&self) -> Self::Output {
                    (*self).cos()
                }
            }
        )+
    };
}

impl_int_scalar! { u8 u16 u32 u64 usize i8 i16 i32 i64 isize }
impl_float_scalar! { f32 f64 }
