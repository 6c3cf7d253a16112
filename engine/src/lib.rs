//! A small 2D engine: a winit window, a retained scene of rectangles, text and
//! images, pointer drag and drop, and a wgpu renderer.
//!
//! Games implement [`Game`] and receive every [`Event`] in delivery order,
//! together with mutable access to the [`Scene`].

pub mod assets;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod geom;
pub mod input;
pub mod scene;

mod render;

pub use assets::Assets;
pub use config::EngineConfig;
pub use context::{EngineContext, Game};
pub use error::EngineError;
pub use event::Event;
pub use geom::{Color, Rect};
pub use scene::{Primitive, Scene, Stroke, Visual, VisualId};

pub use glam::Vec2;
pub use winit::keyboard::KeyCode;
