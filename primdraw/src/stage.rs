use std::collections::HashMap;

use crate::{
    color::Color,
    config::StageConfig,
    error::{Error, Result},
    primitive::Drawable,
    render::Surface,
};

/// Something that can hand out drawing surfaces by identifier.
pub trait SurfaceHost {
    type Surface: Surface;

    /// Take the surface registered as `id`, if any.
    fn take_surface(&mut self, id: &str) -> Option<Self::Surface>;
}

impl<S: Surface> SurfaceHost for HashMap<String, S> {
    type Surface = S;

    fn take_surface(&mut self, id: &str) -> Option<S> {
        self.remove(id)
    }
}

/// Region and color for [`Stage::clear`]. Unset fields cover the whole
/// surface with the stage's default color.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClearArgs {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub w: Option<f32>,
    pub h: Option<f32>,
    pub color: Option<Color>,
}

impl ClearArgs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rect(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// A drawing surface bound by [`Stage::setup`], with its size and default
/// clear color.
///
/// All drawing goes through a stage (or a surface borrowed from one), so
/// nothing can be drawn before setup.
#[derive(Debug)]
pub struct Stage<S: Surface> {
    id: String,
    surface: S,
    color: Color,
}

impl<S: Surface> Stage<S> {
    /// Bind the surface `config.id` from `host` and size it to `config.w` x `config.h`.
    pub fn setup<H>(config: &StageConfig, host: &mut H) -> Result<Self>
    where
        H: SurfaceHost<Surface = S>,
    {
        let surface = host
            .take_surface(&config.id)
            .ok_or_else(|| Error::SurfaceNotFound(config.id.clone()))?;
        Self::bind(config, surface)
    }

    /// Bind an already constructed surface.
    pub fn bind(config: &StageConfig, mut surface: S) -> Result<Self> {
        if config.w == 0 || config.h == 0 {
            return Err(Error::InvalidSize {
                width: config.w,
                height: config.h,
            });
        }
        let color = Color::parse(config.color_or_default())?;
        surface.resize(config.w, config.h);
        log::debug!(
            "Stage {:?} set up at {}x{} with color {}",
            config.id,
            config.w,
            config.h,
            color
        );

        Ok(Self {
            id: config.id.clone(),
            surface,
            color,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Default clear color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Fill a region, by default the whole surface in the default color.
    pub fn clear(&mut self, args: ClearArgs) {
        let x = args.x.unwrap_or(0.0);
        let y = args.y.unwrap_or(0.0);
        let w = args.w.unwrap_or(self.width() as f32);
        let h = args.h.unwrap_or(self.height() as f32);
        let color = args.color.unwrap_or(self.color);
        self.surface.fill_rect(x, y, w, h, color);
    }

    /// Fill the whole surface with the default color.
    pub fn clear_all(&mut self) {
        self.clear(ClearArgs::default());
    }

    /// Draw one primitive onto this stage.
    pub fn draw<D: Drawable + ?Sized>(&mut self, item: &mut D) -> Result<()> {
        item.draw(&mut self.surface)
    }

    /// Direct access to the underlying surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingSurface};

    fn host() -> HashMap<String, RecordingSurface> {
        HashMap::from([("c".to_string(), RecordingSurface::new(1, 1))])
    }

    #[test]
    fn setup_sizes_surface() {
        let stage = Stage::setup(&StageConfig::new("c", 100, 50), &mut host()).unwrap();
        assert_eq!((stage.width(), stage.height()), (100, 50));
        assert_eq!(stage.color(), Color::WHITE);
        assert_eq!(stage.id(), "c");
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = Stage::setup(&StageConfig::new("nope", 10, 10), &mut host()).unwrap_err();
        assert!(matches!(err, Error::SurfaceNotFound(id) if id == "nope"));
    }

    #[test]
    fn zero_size_and_bad_color_are_rejected() {
        assert!(matches!(
            Stage::setup(&StageConfig::new("c", 0, 10), &mut host()),
            Err(Error::InvalidSize { width: 0, height: 10 })
        ));
        assert!(matches!(
            Stage::setup(&StageConfig::new("c", 10, 10).with_color("bogus"), &mut host()),
            Err(Error::InvalidColor(_))
        ));
    }

    #[test]
    fn clear_defaults_to_full_surface() {
        let config = StageConfig::new("c", 100, 50).with_color("#000");
        let mut stage = Stage::setup(&config, &mut host()).unwrap();
        stage.clear_all();
        stage.clear(ClearArgs::new().rect(1.0, 2.0, 3.0, 4.0));
        stage.clear(ClearArgs::new().color(Color::rgb(255, 0, 0)));

        assert_eq!(
            stage.surface().commands(),
            &[
                DrawCommand::FillRect {
                    x: 0.0,
                    y: 0.0,
                    w: 100.0,
                    h: 50.0,
                    color: Color::BLACK
                },
                DrawCommand::FillRect {
                    x: 1.0,
                    y: 2.0,
                    w: 3.0,
                    h: 4.0,
                    color: Color::BLACK
                },
                DrawCommand::FillRect {
                    x: 0.0,
                    y: 0.0,
                    w: 100.0,
                    h: 50.0,
                    color: Color::rgb(255, 0, 0)
                },
            ]
        );
    }
}
