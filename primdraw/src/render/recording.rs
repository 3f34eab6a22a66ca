use image::RgbaImage;

use super::{Surface, TextStyle};
use crate::{color::Color, error::Result};

/// One call received by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Translate {
        x: f32,
        y: f32,
    },
    Rotate {
        radians: f32,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    FillEllipse {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        color: Color,
    },
    DrawImage {
        /// Source image dimensions.
        size: (u32, u32),
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
}

impl DrawCommand {
    /// Whether the command puts pixels on the surface.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            DrawCommand::FillRect { .. }
                | DrawCommand::FillEllipse { .. }
                | DrawCommand::DrawImage { .. }
                | DrawCommand::FillText { .. }
        )
    }
}

/// Surface that records every call instead of drawing.
///
/// Useful for headless runs and for asserting exactly what a primitive asked
/// the host to draw.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    depth: usize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands, leaving the surface state untouched.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded commands that paint pixels, in order.
    pub fn paints(&self) -> Vec<&DrawCommand> {
        self.commands.iter().filter(|c| c.is_paint()).collect()
    }

    /// Current number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.depth = 0;
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate { radians });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Color) {
        self.commands.push(DrawCommand::FillEllipse {
            cx,
            cy,
            rx,
            ry,
            color,
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::DrawImage {
            size: image.dimensions(),
            x,
            y,
            w,
            h,
        });
    }

    fn fill_text(&mut self, style: &TextStyle, text: &str, x: f32, y: f32) -> Result<()> {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            style: style.clone(),
        });
        Ok(())
    }
}
