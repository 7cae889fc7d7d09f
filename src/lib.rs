pub mod classify;
pub mod color;
pub mod error;
pub mod generator;
pub mod grid;
pub mod mapping;
pub mod palette;
pub mod placement;
pub mod variable;

pub use error::{MapError, Result};

pub mod prelude {
    pub use crate::classify::*;
    pub use crate::color::ColorKey;
    pub use crate::error::{MapError, Result};
    pub use crate::generator::*;
    pub use crate::grid::*;
    pub use crate::mapping::*;
    pub use crate::palette::*;
    pub use crate::placement::*;
}
