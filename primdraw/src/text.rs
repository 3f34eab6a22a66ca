use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    error::Result,
    primitive::{Drawable, Primitive},
    props::Props,
    render::{Surface, TextStyle},
};

/// Horizontal text alignment relative to the draw position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
    Start,
    End,
}

impl FromStr for Align {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Align::Left),
            "right" => Ok(Align::Right),
            "center" => Ok(Align::Center),
            "start" => Ok(Align::Start),
            "end" => Ok(Align::End),
            other => Err(format!("unknown text alignment {other:?}")),
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Align::Left => "left",
            Align::Right => "right",
            Align::Center => "center",
            Align::Start => "start",
            Align::End => "end",
        };
        f.write_str(name)
    }
}

/// A single line of text drawn with its baseline at `(x, y)`.
///
/// Text has no width or height, so its anchor sits at the draw position.
/// It still moves with its velocity and rotates about that anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub base: Primitive,
    pub text: String,
    /// Font size in pixels.
    pub size: f32,
    pub color: Color,
    pub font: String,
    pub align: Align,
}

impl Text {
    pub const DEFAULT_SIZE: f32 = 16.0;
    pub const DEFAULT_FONT: &'static str = "Arial";

    /// Text at `(x, y)` in 16px black Arial, left aligned.
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            base: Primitive::new(x, y, 0.0, 0.0),
            text: text.into(),
            size: Self::DEFAULT_SIZE,
            color: Color::BLACK,
            font: Self::DEFAULT_FONT.to_string(),
            align: Align::Left,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_font(mut self, family: impl Into<String>) -> Self {
        self.font = family.into();
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn style(&self) -> TextStyle {
        TextStyle {
            size: self.size,
            family: self.font.clone(),
            color: self.color,
            align: self.align,
        }
    }
}

impl Drawable for Text {
    fn kind(&self) -> &'static str {
        "text"
    }

    fn base(&self) -> &Primitive {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Primitive {
        &mut self.base
    }

    fn extra_props(&self) -> &'static [&'static str] {
        &["color", "text", "size", "font", "align"]
    }

    fn apply_extra(&mut self, props: &Props) {
        if let Some(color) = props.color {
            self.color = color;
        }
        if let Some(text) = &props.text {
            self.text.clone_from(text);
        }
        if let Some(size) = props.size {
            self.size = size;
        }
        if let Some(font) = &props.font {
            self.font.clone_from(font);
        }
        if let Some(align) = props.align {
            self.align = align;
        }
    }

    fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.fill_text(&self.style(), &self.text, self.base.x, self.base.y)
    }
}
