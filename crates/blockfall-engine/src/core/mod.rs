pub use self::{board::*, color::*, piece::*, shape::*};

pub(crate) mod board;
pub(crate) mod color;
pub(crate) mod piece;
pub(crate) mod shape;
