//! primdraw - small 2D drawing primitives over an immediate-mode surface.
//!
//! Bind a surface with [`Stage::setup`], build [`Rect`], [`Ellipse`],
//! [`Sprite`] and [`Text`] values, and call [`Drawable::draw`] on each of
//! them once per frame. [`Sound`] wraps a single audio clip; [`keys`] and
//! [`mouse`] expose input state.

pub mod audio;
pub mod color;
pub mod config;
pub mod error;
pub mod input;
pub mod math;
pub mod primitive;
pub mod props;
pub mod render;
pub mod shapes;
pub mod sprite;
pub mod stage;
pub mod text;

pub use crate::audio::{AudioDevice, Player, RodioPlayer, Sound};
pub use crate::color::Color;
pub use crate::config::StageConfig;
pub use crate::error::{Error, PropsError, Result};
pub use crate::input::{handle_window_event, keys, mouse, Keys, Mouse};
pub use crate::math::Vec2;
pub use crate::primitive::{Drawable, Primitive};
pub use crate::props::Props;
pub use crate::render::{
    DrawCommand, FontBook, RasterSurface, RecordingSurface, SavedState, Surface, TextStyle,
};
pub use crate::shapes::{Ellipse, Rect};
pub use crate::sprite::{ImageHandle, Sprite};
pub use crate::stage::{ClearArgs, Stage, SurfaceHost};
pub use crate::text::{Align, Text};
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
