use crate::V2;
use float_cmp::approx_eq;
use std::fmt::Debug;

pub trait Almost {
    fn almost(&self, other: &Self) -> bool;
}

impl Almost for f32 {
    fn almost(&self, other: &f32) -> bool {
        approx_eq!(f32, *self, *other, ulps = 5)
    }
}

impl Almost for f64 {
    fn almost(&self, other: &f64) -> bool {
        approx_eq!(f64, *self, *other, ulps = 5)
    }
}

impl<T> Almost for Option<T>
where
    T: Almost,
{
    fn almost(&self, other: &Option<T>) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.almost(&b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> Almost for [T]
where
    T: Almost + Copy,
{
    fn almost(&self, other: &[T]) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .enumerate()
                .all(|(i, value)| value.almost(&other[i]))
    }
}

impl<T> Almost for V2<T>
where
    T: Almost + Copy + Debug + PartialEq + 'static,
{
    fn almost(&self, other: &V2<T>) -> bool {
        self.iter()
            .enumerate()
            .all(|(i, value)| value.almost(&other[i]))
    }
}
