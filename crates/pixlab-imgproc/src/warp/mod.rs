mod affine;
pub use affine::*;
