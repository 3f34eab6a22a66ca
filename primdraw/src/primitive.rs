//! The shared primitive state and the [`Drawable`] trait.

use crate::{
    error::Result,
    math::{to_radians, Vec2},
    props::Props,
    render::{SavedState, Surface},
};

/// Position, size, motion and visibility shared by every primitive.
///
/// Fields are public; the mutator methods on [`Drawable`] are conveniences,
/// not the only way to change them.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Added to `x` on every draw.
    pub xv: f32,
    /// Added to `y` on every draw.
    pub yv: f32,
    /// Rotation in degrees, clockwise on screen.
    pub rotation: f32,
    /// Rotation pivot, relative to `(x, y)`.
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub hidden: bool,
}

impl Primitive {
    /// A still, unrotated, visible primitive anchored at its centre.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            xv: 0.0,
            yv: 0.0,
            rotation: 0.0,
            anchor_x: w / 2.0,
            anchor_y: h / 2.0,
            hidden: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.xv, self.yv)
    }

    /// Absolute rotation pivot.
    pub fn pivot(&self) -> Vec2 {
        Vec2::new(self.x + self.anchor_x, self.y + self.anchor_y)
    }

    /// Advance the position by one frame of velocity.
    pub fn step(&mut self) {
        self.x += self.xv;
        self.y += self.yv;
    }

    fn apply(&mut self, props: &Props) {
        let fields = [
            (&mut self.x, props.x),
            (&mut self.y, props.y),
            (&mut self.w, props.w),
            (&mut self.h, props.h),
            (&mut self.xv, props.xv),
            (&mut self.yv, props.yv),
            (&mut self.rotation, props.rotation),
            (&mut self.anchor_x, props.anchor_x),
            (&mut self.anchor_y, props.anchor_y),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(hidden) = props.hidden {
            self.hidden = hidden;
        }
    }
}

/// A primitive that can be positioned, overridden, cloned and drawn.
///
/// Implementors supply access to their [`Primitive`] and a `render` step;
/// everything else is provided.
pub trait Drawable {
    /// Short name used in error messages.
    fn kind(&self) -> &'static str;

    fn base(&self) -> &Primitive;

    fn base_mut(&mut self) -> &mut Primitive;

    /// Kind-specific [`Props`] fields this primitive accepts.
    fn extra_props(&self) -> &'static [&'static str] {
        &[]
    }

    /// Apply the kind-specific fields. Only called after validation.
    fn apply_extra(&mut self, _props: &Props) {}

    /// Paint the primitive. The surface transform is already set up.
    fn render(&self, surface: &mut dyn Surface) -> Result<()>;

    fn move_to(&mut self, x: f32, y: f32) {
        let base = self.base_mut();
        base.x = x;
        base.y = y;
    }

    fn move_by(&mut self, dx: f32, dy: f32) {
        let base = self.base_mut();
        base.x += dx;
        base.y += dy;
    }

    /// Set the rotation pivot relative to the top-left corner.
    fn anchor(&mut self, x: f32, y: f32) {
        let base = self.base_mut();
        base.anchor_x = x;
        base.anchor_y = y;
    }

    fn hide(&mut self) {
        self.base_mut().hidden = true;
    }

    fn show(&mut self) {
        self.base_mut().hidden = false;
    }

    fn is_hidden(&self) -> bool {
        self.base().hidden
    }

    /// Apply every field set in `props`.
    ///
    /// Fails without modifying anything if `props` carries a field this kind
    /// does not have.
    fn set_props(&mut self, props: &Props) -> Result<()> {
        props.check(self.kind(), self.extra_props())?;
        self.base_mut().apply(props);
        self.apply_extra(props);
        Ok(())
    }

    /// Copy this primitive and apply `props` to the copy.
    ///
    /// Value fields are copied; shared handles such as a sprite's image stay
    /// shared between the original and the copy.
    fn clone_with(&self, props: &Props) -> Result<Self>
    where
        Self: Clone + Sized,
    {
        let mut copy = self.clone();
        copy.set_props(props)?;
        Ok(copy)
    }

    /// Advance by the velocity, then render rotated about the anchor.
    ///
    /// Hidden primitives still move. The surface state is restored on every
    /// exit path, including a failing `render`.
    fn draw(&mut self, surface: &mut dyn Surface) -> Result<()> {
        let base = self.base_mut();
        base.step();
        let pivot = base.pivot();
        let radians = to_radians(base.rotation);
        let hidden = base.hidden;

        let mut surface = SavedState::new(surface);
        surface.translate(pivot.x, pivot.y);
        surface.rotate(radians);
        surface.translate(-pivot.x, -pivot.y);

        if hidden {
            return Ok(());
        }
        log::trace!("render {} at ({}, {})", self.kind(), self.base().x, self.base().y);
        self.render(&mut *surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Color,
        error::{Error, PropsError},
        render::{DrawCommand, RecordingSurface},
        shapes::Rect,
    };

    /// Render step that always fails after painting once.
    #[derive(Clone)]
    struct Faulty(Primitive);

    impl Drawable for Faulty {
        fn kind(&self) -> &'static str {
            "faulty"
        }

        fn base(&self) -> &Primitive {
            &self.0
        }

        fn base_mut(&mut self) -> &mut Primitive {
            &mut self.0
        }

        fn render(&self, surface: &mut dyn Surface) -> Result<()> {
            surface.fill_rect(0.0, 0.0, 1.0, 1.0, Color::BLACK);
            Err(Error::Render("boom".into()))
        }
    }

    #[test]
    fn anchor_defaults_to_centre() {
        let p = Primitive::new(10.0, 10.0, 20.0, 30.0);
        assert_eq!((p.anchor_x, p.anchor_y), (10.0, 15.0));
        assert_eq!(p.pivot(), Vec2::new(20.0, 25.0));
        assert!(!p.hidden);
    }

    #[test]
    fn draw_applies_pivot_transform() {
        let mut rect = Rect::new(10.0, 10.0, 20.0, 20.0, Color::rgb(255, 0, 0));
        rect.base.rotation = 90.0;
        let mut surface = RecordingSurface::new(100, 50);
        rect.draw(&mut surface).unwrap();

        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::Save);
        assert_eq!(commands[1], DrawCommand::Translate { x: 20.0, y: 20.0 });
        match commands[2] {
            DrawCommand::Rotate { radians } => {
                assert!((radians - std::f32::consts::FRAC_PI_2).abs() < 1e-6)
            }
            ref other => panic!("expected rotate, got {other:?}"),
        }
        assert_eq!(commands[3], DrawCommand::Translate { x: -20.0, y: -20.0 });
        assert!(matches!(commands[4], DrawCommand::FillRect { .. }));
        assert_eq!(commands[5], DrawCommand::Restore);
        assert_eq!(commands.len(), 6);
    }

    #[test]
    fn draw_moves_before_rendering() {
        let mut rect = Rect::new(0.0, 0.0, 4.0, 4.0, Color::BLACK);
        rect.base.xv = 2.0;
        rect.base.yv = -1.0;
        let mut surface = RecordingSurface::new(10, 10);
        rect.draw(&mut surface).unwrap();
        rect.draw(&mut surface).unwrap();

        assert_eq!(rect.base.position(), Vec2::new(4.0, -2.0));
        let last = surface.paints().last().cloned().cloned();
        assert_eq!(
            last,
            Some(DrawCommand::FillRect {
                x: 4.0,
                y: -2.0,
                w: 4.0,
                h: 4.0,
                color: Color::BLACK
            })
        );
    }

    #[test]
    fn hidden_primitives_move_but_do_not_paint() {
        let mut rect = Rect::new(0.0, 0.0, 4.0, 4.0, Color::BLACK);
        rect.base.xv = 1.0;
        rect.hide();
        let mut surface = RecordingSurface::new(10, 10);
        rect.draw(&mut surface).unwrap();

        assert_eq!(rect.base.x, 1.0);
        assert!(surface.paints().is_empty());
        assert_eq!(surface.depth(), 0);

        rect.show();
        rect.draw(&mut surface).unwrap();
        assert_eq!(surface.paints().len(), 1);
    }

    #[test]
    fn failing_render_still_restores() {
        let mut faulty = Faulty(Primitive::new(0.0, 0.0, 2.0, 2.0));
        let mut surface = RecordingSurface::new(10, 10);
        assert!(faulty.draw(&mut surface).is_err());
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.commands().last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn mutators_touch_only_their_fields() {
        let mut rect = Rect::new(1.0, 2.0, 3.0, 4.0, Color::BLACK);
        rect.move_to(5.0, 6.0);
        rect.move_by(-1.0, 1.0);
        rect.anchor(0.0, 0.0);
        assert_eq!(rect.base.position(), Vec2::new(4.0, 7.0));
        assert_eq!((rect.base.w, rect.base.h), (3.0, 4.0));
        assert_eq!(rect.base.pivot(), Vec2::new(4.0, 7.0));
    }

    #[test]
    fn set_props_is_all_or_nothing() {
        let mut rect = Rect::new(0.0, 0.0, 1.0, 1.0, Color::BLACK);
        let err = rect
            .set_props(&Props::new().position(9.0, 9.0).font("Mono"))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Props(PropsError::NotApplicable { field: "font", kind: "rect" })
        ));
        assert_eq!(rect.base.x, 0.0);

        rect.set_props(&Props::new().velocity(1.0, 2.0).hidden(true).dimensions(-3.0, 5.0))
            .unwrap();
        assert_eq!(rect.base.velocity(), Vec2::new(1.0, 2.0));
        assert!(rect.is_hidden());
        // negative sizes pass through unchecked
        assert_eq!(rect.base.w, -3.0);
    }

    #[test]
    fn boxed_drawables_draw_in_order() {
        let mut items: Vec<Box<dyn Drawable>> = vec![
            Box::new(Rect::new(0.0, 0.0, 1.0, 1.0, Color::BLACK)),
            Box::new(Rect::new(2.0, 0.0, 1.0, 1.0, Color::WHITE)),
        ];
        let mut surface = RecordingSurface::new(10, 10);
        for item in &mut items {
            item.draw(&mut surface).unwrap();
        }
        assert_eq!(surface.paints().len(), 2);
    }
}
