//! Drawing surfaces.
//!
//! [`Surface`] is the immediate-mode 2D API every primitive renders through.
//! Two implementations ship with the crate: [`RasterSurface`] paints into an
//! RGBA buffer, [`RecordingSurface`] records the calls it receives.

mod fonts;
mod raster;
mod recording;

use std::ops::{Deref, DerefMut};

use image::RgbaImage;

use crate::{color::Color, error::Result, text::Align};

pub use fonts::FontBook;
pub use raster::RasterSurface;
pub use recording::{DrawCommand, RecordingSurface};

/// Font and fill settings for a single `fill_text` call.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f32,
    pub family: String,
    pub color: Color,
    pub align: Align,
}

/// Immediate-mode 2D drawing target with a save/restore transform stack.
///
/// Coordinates are in pixels with the origin at the top-left corner and y
/// growing downwards. Every fill is affected by the current transform.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Resize the surface. Contents and transform state are reset.
    fn resize(&mut self, width: u32, height: u32);

    /// Push the current transform onto the state stack.
    fn save(&mut self);

    /// Pop the last saved transform. Does nothing when the stack is empty.
    fn restore(&mut self);

    fn translate(&mut self, x: f32, y: f32);

    /// Rotate clockwise (on screen) by `radians`.
    fn rotate(&mut self, radians: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    /// Fill a full ellipse centred at `(cx, cy)` with radii `rx`, `ry`.
    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Color);

    /// Draw `image` scaled into the rectangle `(x, y, w, h)`.
    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, w: f32, h: f32);

    /// Draw a single line of text with its baseline at `y`.
    fn fill_text(&mut self, style: &TextStyle, text: &str, x: f32, y: f32) -> Result<()>;
}

/// Scoped `save`/`restore` pair.
///
/// Creating the guard saves the surface state; dropping it restores it, so
/// the pair stays balanced on early returns and unwinding.
pub struct SavedState<'a> {
    surface: &'a mut dyn Surface,
}

impl<'a> SavedState<'a> {
    pub fn new(surface: &'a mut dyn Surface) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<'a> Deref for SavedState<'a> {
    type Target = dyn Surface + 'a;

    fn deref(&self) -> &Self::Target {
        self.surface
    }
}

impl<'a> DerefMut for SavedState<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.surface
    }
}

impl Drop for SavedState<'_> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restores_on_early_return() {
        fn failing(surface: &mut dyn Surface) -> std::result::Result<(), ()> {
            let mut guard = SavedState::new(surface);
            guard.translate(5.0, 5.0);
            Err(())
        }

        let mut surface = RecordingSurface::new(10, 10);
        assert!(failing(&mut surface).is_err());
        assert_eq!(surface.depth(), 0);
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Save,
                DrawCommand::Translate { x: 5.0, y: 5.0 },
                DrawCommand::Restore,
            ]
        );
    }

    #[test]
    fn guards_nest() {
        let mut surface = RecordingSurface::new(10, 10);
        {
            let mut outer = SavedState::new(&mut surface);
            let inner = SavedState::new(&mut *outer);
            drop(inner);
        }
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.commands().len(), 4);
    }
}
