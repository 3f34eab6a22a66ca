use std::{fs, io::Cursor, path::Path, sync::Arc};

use anyhow::{anyhow, Result as AnyResult};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::{Error, Result};

/// A single playable audio resource, as seen by [`Sound`].
pub trait Player {
    /// Stop playback and rewind to the beginning, leaving the player paused.
    fn reload(&mut self) -> AnyResult<()>;

    fn set_volume(&mut self, volume: f32);

    fn set_looping(&mut self, looping: bool);

    fn play(&mut self);

    /// Suspend playback at the current position.
    fn pause(&mut self);

    fn is_paused(&self) -> bool;
}

/// An audio clip with a fixed loop setting and an adjustable volume.
///
/// [`play`](Self::play) always restarts from the beginning: playing a sound
/// that is already playing cuts the previous playback short instead of
/// overlapping it, and playing after [`pause`](Self::pause) does not resume.
pub struct Sound<P: Player = RodioPlayer> {
    player: P,
    volume: f32,
    looping: bool,
}

impl<P: Player> Sound<P> {
    /// Wrap `player`. The loop setting is applied once here and never changes.
    pub fn new(mut player: P, volume: f32, looping: bool) -> Self {
        player.set_looping(looping);
        Self {
            player,
            volume: volume.clamp(0.0, 1.0),
            looping,
        }
    }

    /// Rewind to the start without playing.
    pub fn reset(&mut self) -> Result<()> {
        self.player.reload().map_err(Error::Audio)
    }

    /// Rewind, apply the volume, then play from the start.
    pub fn play(&mut self) -> Result<()> {
        self.reset()?;
        self.player.set_volume(self.volume);
        self.player.play();
        Ok(())
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn is_paused(&self) -> bool {
        self.player.is_paused()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Set the volume (0.0 to 1.0) used by the next [`play`](Self::play).
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

/// [`Player`] backed by a rodio sink.
///
/// The encoded clip is kept in memory; each reload decodes it again into a
/// fresh, paused sink.
pub struct RodioPlayer {
    handle: OutputStreamHandle,
    data: Arc<[u8]>,
    sink: Option<Sink>,
    volume: f32,
    looping: bool,
}

impl RodioPlayer {
    /// Create a player for encoded audio bytes. The bytes are decoded once to
    /// check the format.
    pub fn new(handle: OutputStreamHandle, data: impl Into<Arc<[u8]>>) -> AnyResult<Self> {
        let data = data.into();
        Decoder::new(Cursor::new(Arc::clone(&data)))
            .map_err(|e| anyhow!("Failed to decode sound: {}", e))?;
        Ok(Self {
            handle,
            data,
            sink: None,
            volume: 1.0,
            looping: false,
        })
    }
}

impl Player for RodioPlayer {
    fn reload(&mut self) -> AnyResult<()> {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }

        let source = Decoder::new(Cursor::new(Arc::clone(&self.data)))
            .map_err(|e| anyhow!("Failed to decode sound: {}", e))?;
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| anyhow!("Failed to create audio sink: {}", e))?;
        sink.pause();
        sink.set_volume(self.volume);
        if self.looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }

        self.sink = Some(sink);
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn is_paused(&self) -> bool {
        self.sink.as_ref().map_or(true, Sink::is_paused)
    }
}

/// The default audio output device.
///
/// Sounds created from a device stop producing output once the device is
/// dropped, so keep it alive for as long as sounds are used.
pub struct AudioDevice {
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
}

impl AudioDevice {
    /// Open the default output device.
    ///
    /// A missing device is not an error: the device is reported as
    /// unavailable and creating sounds from it fails.
    pub fn new() -> Self {
        match OutputStream::try_default() {
            Ok((stream, stream_handle)) => Self {
                _stream: Some(stream),
                stream_handle: Some(stream_handle),
            },
            Err(e) => {
                log::warn!("Failed to initialize audio: {}. Audio will be unavailable.", e);
                Self {
                    _stream: None,
                    stream_handle: None,
                }
            }
        }
    }

    /// Check if audio is available and working.
    pub fn is_available(&self) -> bool {
        self.stream_handle.is_some()
    }

    /// Load a sound from a file path.
    pub fn sound<P: AsRef<Path>>(&self, path: P, volume: f32, looping: bool) -> Result<Sound> {
        let bytes = fs::read(path.as_ref()).map_err(|e| {
            Error::Audio(anyhow!(
                "Failed to open sound file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        self.sound_from_bytes(bytes, volume, looping)
    }

    /// Load a sound from encoded bytes (useful for embedded assets).
    pub fn sound_from_bytes(
        &self,
        bytes: impl Into<Arc<[u8]>>,
        volume: f32,
        looping: bool,
    ) -> Result<Sound> {
        let handle = self
            .stream_handle
            .clone()
            .ok_or_else(|| Error::Audio(anyhow!("Audio system is not available")))?;
        let player = RodioPlayer::new(handle, bytes).map_err(Error::Audio)?;
        log::debug!("Loaded sound (volume {volume}, looping {looping})");
        Ok(Sound::new(player, volume, looping))
    }
}

impl Default for AudioDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Player with a virtual playback clock.
    #[derive(Default)]
    struct ScriptedPlayer {
        position: f32,
        playing: bool,
        volume: f32,
        looping: bool,
        reloads: usize,
        fail_reload: bool,
    }

    impl ScriptedPlayer {
        fn advance(&mut self, secs: f32) {
            if self.playing {
                self.position += secs;
            }
        }
    }

    impl Player for ScriptedPlayer {
        fn reload(&mut self) -> AnyResult<()> {
            if self.fail_reload {
                return Err(anyhow!("device lost"));
            }
            self.reloads += 1;
            self.position = 0.0;
            self.playing = false;
            Ok(())
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }

        fn set_looping(&mut self, looping: bool) {
            self.looping = looping;
        }

        fn play(&mut self) {
            self.playing = true;
        }

        fn pause(&mut self) {
            self.playing = false;
        }

        fn is_paused(&self) -> bool {
            !self.playing
        }
    }

    #[test]
    fn second_play_restarts_from_zero() {
        let mut sound = Sound::new(ScriptedPlayer::default(), 0.5, false);
        sound.play().unwrap();
        sound.player.advance(1.5);
        assert_eq!(sound.player().position, 1.5);

        sound.play().unwrap();
        assert_eq!(sound.player().position, 0.0);
        assert!(!sound.is_paused());
        assert_eq!(sound.player().reloads, 2);
    }

    #[test]
    fn play_after_pause_does_not_resume() {
        let mut sound = Sound::new(ScriptedPlayer::default(), 1.0, false);
        sound.play().unwrap();
        sound.player.advance(2.0);
        sound.pause();
        assert!(sound.is_paused());
        assert_eq!(sound.player().position, 2.0);

        sound.play().unwrap();
        assert_eq!(sound.player().position, 0.0);
    }

    #[test]
    fn volume_is_applied_on_play() {
        let mut sound = Sound::new(ScriptedPlayer::default(), 0.25, true);
        assert!(sound.player().looping);
        assert!(sound.is_looping());
        assert_eq!(sound.player().volume, 0.0);

        sound.play().unwrap();
        assert_eq!(sound.player().volume, 0.25);

        sound.set_volume(3.0);
        assert_eq!(sound.volume(), 1.0);
        sound.play().unwrap();
        assert_eq!(sound.player().volume, 1.0);
    }

    #[test]
    fn reset_rewinds_without_playing() {
        let mut sound = Sound::new(ScriptedPlayer::default(), 1.0, false);
        sound.play().unwrap();
        sound.player.advance(0.5);
        sound.reset().unwrap();
        assert!(sound.is_paused());
        assert_eq!(sound.player().position, 0.0);
    }

    #[test]
    fn reload_failure_surfaces_as_audio_error() {
        let player = ScriptedPlayer {
            fail_reload: true,
            ..ScriptedPlayer::default()
        };
        let mut sound = Sound::new(player, 1.0, false);
        assert!(matches!(sound.play(), Err(Error::Audio(_))));
    }
}
