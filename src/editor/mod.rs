pub mod buffer;
pub mod caret;
pub mod layout;

pub use buffer::{Buffer, Indented};
pub use caret::{Anchor, CaretProjector, SurfaceGeometry};
pub use layout::{FontMetrics, MonospaceLayout, Point, ProportionalLayout, TextLayout};
