pub mod area;
pub mod sample;
pub mod time;

pub use area::*;
pub use sample::*;
pub use time::*;
