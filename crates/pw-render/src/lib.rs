pub mod anchor;
pub mod hit;
pub mod paint;
pub mod scene;

pub use anchor::{Anchor, anchor_point};
pub use hit::{hit_test, side_at};
pub use paint::{ConnectionCanvas, ConnectionRenderer, LineKind, LineStyle, Preview, StyleKey};
