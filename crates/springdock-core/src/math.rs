/// Fast 2D math using SIMD-accelerated `glam` types.
///
/// The engine only needs the 2D subset: pointer positions, grab offsets,
/// squeeze displacements and ghost positions are all [`Vec2`] in viewport
/// pixels.
///
/// # Examples
///
/// ```
/// use springdock_core::math::Vec2;
///
/// let press = Vec2::new(10.0, 20.0);
/// let pointer = Vec2::new(16.0, 28.0);
/// assert_eq!((pointer - press).length(), 10.0);
/// ```
///
/// [`glam`]: https://docs.rs/glam
pub mod fast {
    pub use glam::*;
}

pub use fast::*;
