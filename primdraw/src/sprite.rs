use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use anyhow::{anyhow, Result as AnyResult};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use image::RgbaImage;

use crate::{
    error::Result,
    primitive::{Drawable, Primitive},
    props::Props,
    render::Surface,
};

enum Slot {
    Pending(Receiver<AnyResult<RgbaImage>>),
    Ready(Arc<RgbaImage>),
    Failed,
}

fn settle(outcome: AnyResult<RgbaImage>) -> Slot {
    match outcome {
        Ok(image) => Slot::Ready(Arc::new(image)),
        Err(e) => {
            log::warn!("{e:#}");
            Slot::Failed
        }
    }
}

/// Shared handle to an image that may still be decoding.
///
/// Cloning the handle aliases the same image. Loading happens on a background
/// thread; there is no completion callback, [`get`](Self::get) simply returns
/// `None` until the image is available.
#[derive(Clone)]
pub struct ImageHandle {
    slot: Arc<Mutex<Slot>>,
}

impl ImageHandle {
    /// Start decoding the file at `path` in the background.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path: PathBuf = path.as_ref().to_path_buf();
        Self::spawn(move || {
            image::open(&path)
                .map(|img| img.to_rgba8())
                .map_err(|e| anyhow!("Failed to load image {:?}: {}", path, e))
        })
    }

    /// Start decoding encoded image bytes in the background.
    pub fn load_bytes(bytes: Vec<u8>) -> Self {
        Self::spawn(move || {
            image::load_from_memory(&bytes)
                .map(|img| img.to_rgba8())
                .map_err(|e| anyhow!("Failed to decode image bytes: {}", e))
        })
    }

    /// A handle that is already loaded.
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::Ready(Arc::new(image)))),
        }
    }

    /// A handle completed by sending on the returned channel.
    pub fn pending() -> (Self, Sender<AnyResult<RgbaImage>>) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let handle = Self {
            slot: Arc::new(Mutex::new(Slot::Pending(rx))),
        };
        (handle, tx)
    }

    fn spawn(decode: impl FnOnce() -> AnyResult<RgbaImage> + Send + 'static) -> Self {
        let (handle, tx) = Self::pending();
        let spawned = thread::Builder::new()
            .name("primdraw-image".into())
            .spawn(move || {
                // receiver gone means every handle was dropped
                let _ = tx.send(decode());
            });
        if let Err(e) = spawned {
            log::warn!("Failed to start image loader: {e}");
            *handle.lock() = Slot::Failed;
        }
        handle
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The decoded image, if loading has finished successfully.
    pub fn get(&self) -> Option<Arc<RgbaImage>> {
        let mut slot = self.lock();
        if let Slot::Pending(rx) = &*slot {
            let next = match rx.try_recv() {
                Ok(outcome) => settle(outcome),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => Slot::Failed,
            };
            *slot = next;
        }
        match &*slot {
            Slot::Ready(image) => Some(Arc::clone(image)),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.get().is_some()
    }

    /// Block until loading finishes. Returns whether an image is available.
    pub fn wait(&self) -> bool {
        let rx = match &*self.lock() {
            Slot::Pending(rx) => rx.clone(),
            Slot::Ready(_) => return true,
            Slot::Failed => return false,
        };
        let next = match rx.recv() {
            Ok(outcome) => settle(outcome),
            Err(_) => Slot::Failed,
        };
        let mut slot = self.lock();
        // a concurrent `get` may have settled it already
        if matches!(*slot, Slot::Pending(_)) {
            *slot = next;
        }
        matches!(*slot, Slot::Ready(_))
    }

    /// Whether both handles alias the same image.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.lock() {
            Slot::Pending(_) => "pending".to_string(),
            Slot::Ready(image) => format!("{}x{}", image.width(), image.height()),
            Slot::Failed => "failed".to_string(),
        };
        f.debug_tuple("ImageHandle").field(&state).finish()
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// An image scaled into the rectangle `(x, y, w, h)`.
///
/// Drawing before the image has loaded paints nothing and is not an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub base: Primitive,
    pub image: ImageHandle,
}

impl Sprite {
    /// Create a sprite and begin loading its image from `path`.
    pub fn new<P: AsRef<Path>>(path: P, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::from_handle(ImageHandle::load(path), x, y, w, h)
    }

    pub fn from_handle(image: ImageHandle, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            base: Primitive::new(x, y, w, h),
            image,
        }
    }

    pub fn with_props<P: AsRef<Path>>(
        path: P,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        props: &Props,
    ) -> Result<Self> {
        let mut sprite = Self::new(path, x, y, w, h);
        sprite.set_props(props)?;
        Ok(sprite)
    }
}

impl Drawable for Sprite {
    fn kind(&self) -> &'static str {
        "sprite"
    }

    fn base(&self) -> &Primitive {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Primitive {
        &mut self.base
    }

    fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        if let Some(image) = self.image.get() {
            let b = &self.base;
            surface.draw_image(&image, b.x, b.y, b.w, b.h);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingSurface};

    #[test]
    fn unloaded_sprite_draws_nothing() {
        let (handle, tx) = ImageHandle::pending();
        let mut sprite = Sprite::from_handle(handle, 0.0, 0.0, 8.0, 8.0);
        let mut surface = RecordingSurface::new(16, 16);

        sprite.draw(&mut surface).unwrap();
        assert!(surface.paints().is_empty());

        tx.send(Ok(RgbaImage::new(2, 2))).unwrap();
        sprite.draw(&mut surface).unwrap();
        assert_eq!(
            surface.paints(),
            vec![&DrawCommand::DrawImage {
                size: (2, 2),
                x: 0.0,
                y: 0.0,
                w: 8.0,
                h: 8.0
            }]
        );
    }

    #[test]
    fn clones_share_the_image() {
        let (handle, tx) = ImageHandle::pending();
        let sprite = Sprite::from_handle(handle, 0.0, 0.0, 4.0, 4.0);
        let copy = sprite.clone_with(&Props::new().position(5.0, 5.0)).unwrap();

        assert!(copy.image.ptr_eq(&sprite.image));
        tx.send(Ok(RgbaImage::new(1, 1))).unwrap();
        assert!(sprite.image.is_loaded());
        assert!(copy.image.is_loaded());
        assert_eq!(sprite.base.x, 0.0);
    }

    #[test]
    fn sprites_reject_color_props() {
        let image = ImageHandle::from_image(RgbaImage::new(1, 1));
        let mut sprite = Sprite::from_handle(image, 0.0, 0.0, 1.0, 1.0);
        assert!(sprite.set_props(&Props::new().color(crate::Color::BLACK)).is_err());
    }

    #[test]
    fn missing_file_never_loads() {
        let handle = ImageHandle::load("/definitely/not/here.png");
        assert!(!handle.wait());
        assert!(!handle.is_loaded());
    }

    #[test]
    fn decode_failure_is_silent() {
        let handle = ImageHandle::load_bytes(b"not an image".to_vec());
        assert!(!handle.wait());
        let mut sprite = Sprite::from_handle(handle, 0.0, 0.0, 1.0, 1.0);
        let mut surface = RecordingSurface::new(4, 4);
        assert!(sprite.draw(&mut surface).is_ok());
        assert!(surface.paints().is_empty());
    }
}
