mod graphics;
mod quad;
mod text;

pub(crate) use graphics::{create_graphics, Graphics, GraphicsEvent};
