//! Shape matching: drag each shape onto the target showing its name.

pub mod config;
pub mod drag;
pub mod drop;
pub mod game;
pub mod layout;
pub mod resize;
pub mod round;
pub mod shape;

pub use config::GameConfig;
pub use drop::DropOutcome;
pub use game::ShapesGame;
pub use layout::Scale;
pub use resize::ResizePolicy;
pub use round::{shuffle, DraggableShape, Round, Target};
pub use shape::ShapeKind;
