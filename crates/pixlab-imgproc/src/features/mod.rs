mod canny;
pub use canny::*;
