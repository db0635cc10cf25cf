use std::{fmt, marker::PhantomData};

use serde::{
    de::{self, Error, SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    axis::{ForwardAxis, UpAxis},
    vector::{Vec2, Vec3},
};

struct VectorVisitor<V> {
    _marker: PhantomData<V>,
}

impl<V> VectorVisitor<V> {
    fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

macro_rules! impl_vector_serde {
    ( $( $vec:ident [ $len:literal ] => $( $field:ident )+ ; )+ ) => {
        $(
            impl<T> Serialize for $vec<T>
            where
                T: Serialize,
            {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    let mut seq = serializer.serialize_seq(Some($len))?;
                    $( seq.serialize_element(&self.$field)?; )+
                    seq.end()
                }
            }

            impl<'de, T> Deserialize<'de> for $vec<T>
            where
                T: Deserialize<'de>,
            {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    deserializer.deserialize_seq(VectorVisitor::<$vec<T>>::new())
                }
            }

            impl<'de, T> Visitor<'de> for VectorVisitor<$vec<T>>
            where
                T: Deserialize<'de>,
            {
                type Value = $vec<T>;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    write!(formatter, "a vector of {} elements", $len)
                }

                fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
                where
                    A: SeqAccess<'de>,
                {
                    if let Some(size_hint) = seq.size_hint() {
                        if size_hint != $len {
                            return Err(A::Error::invalid_length(size_hint, &self));
                        }
                    }

                    let mut read = 0usize;
                    $(
                        let $field: T = seq
                            .next_element()?
                            .ok_or_else(|| A::Error::invalid_length(read, &self))?;
                        read += 1;
                    )+
                    let _ = read;

                    Ok($vec { $( $field ),+ })
                }
            }
        )+
    };
}

impl_vector_serde! {
    Vec2[2] => x y;
    Vec3[3] => x y z;
}

macro_rules! impl_axis_serde {
    ( $( $axis:ident )+ ) => {
        $(
            impl Serialize for $axis {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.serialize_str(self.as_str())
                }
            }

            impl<'de> Deserialize<'de> for $axis {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let value = String::deserialize(deserializer)?;
                    value.parse().map_err(de::Error::custom)
                }
            }
        )+
    };
}

impl_axis_serde! { ForwardAxis UpAxis }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::VecCmp;

    #[test]
    fn vec3_serde_ident() -> Result<(), Box<dyn std::error::Error>> {
        let vec3: Vec3<f32> = Vec3::new(1.0, -2.5, 1e-7);

        let encoded = bincode::serialize(&vec3)?;
        let decoded: Vec3<f32> = bincode::deserialize(&encoded[..])?;

        VecCmp::<f32>::DEFAULT.eq(&vec3, &decoded);
        assert_eq!(vec3.to_bits(), decoded.to_bits());

        Ok(())
    }

    #[test]
    fn vec2_serde_ident() -> Result<(), Box<dyn std::error::Error>> {
        let vec2: Vec2<f32> = Vec2::new(0.25, 0.75);

        let encoded = bincode::serialize(&vec2)?;
        let decoded: Vec2<f32> = bincode::deserialize(&encoded[..])?;

        assert_eq!(vec2, decoded);

        Ok(())
    }

    #[test]
    fn vec3_rejects_wrong_length() {
        let encoded = bincode::serialize(&vec![1.0f32, 2.0]).unwrap();
        let decoded: Result<Vec3<f32>, _> = bincode::deserialize(&encoded[..]);

        assert!(decoded.is_err());
    }

    #[test]
    fn axis_serde_ident() -> Result<(), Box<dyn std::error::Error>> {
        let encoded = bincode::serialize(&ForwardAxis::NegZ)?;
        let decoded: ForwardAxis = bincode::deserialize(&encoded[..])?;
        assert_eq!(decoded, ForwardAxis::NegZ);

        let encoded = bincode::serialize(&String::from("sideways"))?;
        assert!(bincode::deserialize::<UpAxis>(&encoded[..]).is_err());

        Ok(())
    }
}
