mod region_growing;
pub use region_growing::*;
