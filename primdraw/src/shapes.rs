use crate::{
    color::Color,
    error::Result,
    primitive::{Drawable, Primitive},
    props::Props,
    render::Surface,
};

/// Axis-aligned filled rectangle with its top-left corner at `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Rect {
    pub base: Primitive,
    pub color: Color,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32, color: Color) -> Self {
        Self {
            base: Primitive::new(x, y, w, h),
            color,
        }
    }

    /// Construct, then apply `props` on top of the defaults.
    pub fn with_props(x: f32, y: f32, w: f32, h: f32, color: Color, props: &Props) -> Result<Self> {
        let mut rect = Self::new(x, y, w, h, color);
        rect.set_props(props)?;
        Ok(rect)
    }
}

impl Drawable for Rect {
    fn kind(&self) -> &'static str {
        "rect"
    }

    fn base(&self) -> &Primitive {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Primitive {
        &mut self.base
    }

    fn extra_props(&self) -> &'static [&'static str] {
        &["color"]
    }

    fn apply_extra(&mut self, props: &Props) {
        if let Some(color) = props.color {
            self.color = color;
        }
    }

    fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        let b = &self.base;
        surface.fill_rect(b.x, b.y, b.w, b.h, self.color);
        Ok(())
    }
}

/// Filled ellipse centred at `(x, y)`; `w` and `h` are the radii.
///
/// The default anchor is still `(w / 2, h / 2)` from `(x, y)`, so an
/// unanchored ellipse rotates about a point off its centre.
#[derive(Clone, Debug, PartialEq)]
pub struct Ellipse {
    pub base: Primitive,
    pub color: Color,
}

impl Ellipse {
    pub fn new(x: f32, y: f32, w: f32, h: f32, color: Color) -> Self {
        Self {
            base: Primitive::new(x, y, w, h),
            color,
        }
    }

    pub fn with_props(x: f32, y: f32, w: f32, h: f32, color: Color, props: &Props) -> Result<Self> {
        let mut ellipse = Self::new(x, y, w, h, color);
        ellipse.set_props(props)?;
        Ok(ellipse)
    }
}

impl Drawable for Ellipse {
    fn kind(&self) -> &'static str {
        "ellipse"
    }

    fn base(&self) -> &Primitive {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Primitive {
        &mut self.base
    }

    fn extra_props(&self) -> &'static [&'static str] {
        &["color"]
    }

    fn apply_extra(&mut self, props: &Props) {
        if let Some(color) = props.color {
            self.color = color;
        }
    }

    fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        let b = &self.base;
        surface.fill_ellipse(b.x, b.y, b.w, b.h, self.color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingSurface};

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn still_rect_fills_once_and_stays_put() {
        let mut rect = Rect::new(10.0, 10.0, 20.0, 20.0, RED);
        let mut surface = RecordingSurface::new(100, 50);
        rect.draw(&mut surface).unwrap();

        assert_eq!(
            surface.paints(),
            vec![&DrawCommand::FillRect {
                x: 10.0,
                y: 10.0,
                w: 20.0,
                h: 20.0,
                color: RED
            }]
        );
        assert_eq!((rect.base.x, rect.base.y), (10.0, 10.0));
    }

    #[test]
    fn ellipse_uses_size_as_radii() {
        let mut ellipse = Ellipse::new(50.0, 25.0, 10.0, 5.0, RED);
        let mut surface = RecordingSurface::new(100, 50);
        ellipse.draw(&mut surface).unwrap();
        assert_eq!(
            surface.paints(),
            vec![&DrawCommand::FillEllipse {
                cx: 50.0,
                cy: 25.0,
                rx: 10.0,
                ry: 5.0,
                color: RED
            }]
        );
    }

    #[test]
    fn clone_copies_values_independently() {
        let mut source = Rect::new(1.0, 1.0, 5.0, 5.0, RED);
        source.base.xv = 3.0;
        let mut copy = source.clone_with(&Props::new().color(Color::BLACK)).unwrap();

        assert_eq!(copy.base, source.base);
        assert_eq!(copy.color, Color::BLACK);
        assert_eq!(source.color, RED);

        copy.move_by(10.0, 0.0);
        assert_eq!(source.base.x, 1.0);
        assert_eq!(copy.base.x, 11.0);
    }

    #[test]
    fn with_props_overrides_constructor_defaults() {
        let props = Props::new().anchor(0.0, 0.0).rotation(45.0);
        let rect = Rect::with_props(0.0, 0.0, 10.0, 10.0, RED, &props).unwrap();
        assert_eq!((rect.base.anchor_x, rect.base.anchor_y), (0.0, 0.0));
        assert_eq!(rect.base.rotation, 45.0);

        assert!(Ellipse::with_props(0.0, 0.0, 1.0, 1.0, RED, &Props::new().text("x")).is_err());
    }
}
