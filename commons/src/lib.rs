pub extern crate float_cmp;
pub extern crate log;
pub extern crate nalgebra as na;
pub extern crate noise;
pub extern crate rand;
pub extern crate rand_chacha;
extern crate serde;

pub mod almost;
pub mod edge;
pub mod index2d;
pub mod persistence;
pub mod random;
pub mod simplex;

pub type M<T> = na::DMatrix<T>;
pub type V2<T> = na::Vector2<T>;

pub use almost::Almost;

use std::fmt::Debug;

pub fn v2<T: 'static + Copy + PartialEq + Debug>(x: T, y: T) -> na::Vector2<T> {
    na::Vector2::new(x, y)
}

pub fn lerp(a: &V2<f32>, b: &V2<f32>, t: f32) -> V2<f32> {
    a + (b - a) * t
}
