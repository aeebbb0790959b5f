use std::collections::HashMap;

use chime_assets::{AssetHandle, AssetServer, AudioClip};
use chime_core::{Clock, TimerHandle, TimerQueue, Transform};
use chime_scene::{ObjectId, Scene};
use glam::Vec3;
use tracing::{debug, info, warn};

use crate::backend::{AudioOutput, NullOutput, OutputRoute, VoiceId, VoiceParams};
use crate::config::{AudioConfig, SoundPlayerConfig};
use crate::emitter::{AudioEmitter, EmitterState, PlaybackSettings, EMITTER_NAME};
use crate::error::AudioError;
use crate::spatial::{blend_spatial, Listener};

/// Plays sounds by spawning a temporary emitter object per sound.
///
/// One-shot emitters destroy themselves shortly after their clip ends; looped
/// emitters live until [`SoundPlayer::stop`]. Clips requested by name are
/// loaded through the scene's [`AssetServer`] on first use and remembered.
///
/// Failures never propagate: they are logged as warnings and the call returns
/// `None` instead of an emitter.
pub struct SoundPlayer {
    output: Box<dyn AudioOutput>,
    config: SoundPlayerConfig,
    route: OutputRoute,
    listener: Listener,
    loaded_sounds: HashMap<String, AssetHandle<AudioClip>>,
    cleanup_timers: TimerQueue<ObjectId>,
    pending_cleanups: HashMap<ObjectId, TimerHandle>,
    voices: HashMap<ObjectId, VoiceId>,
    /// `GameTime::frame_count` of the frame last advanced in `update`.
    last_frame: Option<u64>,
}

impl SoundPlayer {
    pub fn new(output: Box<dyn AudioOutput>, config: SoundPlayerConfig) -> Self {
        info!("Sound player ready (anchor {:?})", config.anchor);
        Self {
            output,
            config,
            route: OutputRoute::Main,
            listener: Listener::default(),
            loaded_sounds: HashMap::new(),
            cleanup_timers: TimerQueue::new(),
            pending_cleanups: HashMap::new(),
            voices: HashMap::new(),
            last_frame: None,
        }
    }

    /// A player that tracks emitters without producing any sound.
    pub fn headless(config: SoundPlayerConfig) -> Self {
        Self::new(Box::new(NullOutput::new()), config)
    }

    /// Settings used by name-based playback: the anchor position, full
    /// volume, flat, routed through the player's route.
    pub fn default_settings(&self) -> PlaybackSettings {
        PlaybackSettings::at(self.config.anchor)
    }

    // ---- Playback ----

    /// Play the clip registered under `name` at the anchor position.
    pub fn play_by_name(&mut self, scene: &mut Scene, name: &str) -> Option<ObjectId> {
        if let Some(&clip) = self.loaded_sounds.get(name) {
            return self.play(scene, Some(clip), self.default_settings());
        }

        let Some(assets) = scene.resource_mut::<AssetServer>() else {
            warn!("Tried to play sound '{}', but the scene has no AssetServer", name);
            return None;
        };
        match assets.load_clip(name) {
            Ok(clip) => {
                self.loaded_sounds.insert(name.to_string(), clip);
                self.play(scene, Some(clip), self.default_settings())
            }
            Err(e) => {
                warn!("Tried to play sound from name, but failed: {} ({})", name, e);
                None
            }
        }
    }

    /// Play a clip at the anchor position with the given volume.
    pub fn play_clip(
        &mut self,
        scene: &mut Scene,
        clip: Option<AssetHandle<AudioClip>>,
        volume: f64,
    ) -> Option<ObjectId> {
        let settings = self.default_settings().with_volume(volume);
        self.play(scene, clip, settings)
    }

    /// Play a clip once. The emitter is destroyed `cleanup_padding` seconds
    /// after the clip ends.
    pub fn play(
        &mut self,
        scene: &mut Scene,
        clip: Option<AssetHandle<AudioClip>>,
        settings: PlaybackSettings,
    ) -> Option<ObjectId> {
        let Some(handle) = clip else {
            warn!("Audio clip is not assigned to a value!");
            return None;
        };
        let Some(clip) = Self::resolve_clip(scene, handle) else {
            warn!("Audio clip {} is not loaded", handle.id());
            return None;
        };

        let id = self.create_emitter(scene, handle, settings.position);
        if let Some(emitter) = scene.get_mut::<AudioEmitter>(id) {
            emitter.volume = settings.volume;
            emitter.spatial_blend = settings.spatial_blend;
            emitter.route = settings.route.unwrap_or(self.route);
        }
        if let Err(e) = self.start_emitter(scene, id, &clip) {
            warn!("Failed to play sound '{}': {}", clip.name(), e);
            scene.destroy(id);
            return None;
        }

        let lifetime = self.config.emitter_lifetime(clip.duration());
        if let Err(e) = scene.destroy_after(id, lifetime) {
            warn!("Could not schedule cleanup of emitter {}: {}", id, e);
        }

        // Delayed destroys run on game time and would never fire while the
        // game is frozen, so also count down in real time.
        if scene.time().is_frozen() {
            let timer = self.cleanup_timers.once(lifetime, Clock::Real, id);
            self.pending_cleanups.insert(id, timer);
        }

        debug!(
            "Playing '{}' on emitter {} for {:.2}s",
            clip.name(),
            id,
            lifetime.as_secs_f32()
        );
        Some(id)
    }

    /// Play a clip on repeat. Nothing cleans the emitter up: call
    /// [`stop`](Self::stop) when it should end.
    pub fn play_looped(
        &mut self,
        scene: &mut Scene,
        clip: AssetHandle<AudioClip>,
        position: Vec3,
    ) -> Option<ObjectId> {
        let Some(data) = Self::resolve_clip(scene, clip) else {
            warn!("Audio clip {} is not loaded", clip.id());
            return None;
        };

        let id = self.create_emitter(scene, clip, position);
        if let Some(emitter) = scene.get_mut::<AudioEmitter>(id) {
            emitter.looping = true;
        }
        if let Err(e) = self.start_emitter(scene, id, &data) {
            warn!("Failed to loop sound '{}': {}", data.name(), e);
            scene.destroy(id);
            return None;
        }

        debug!("Looping '{}' on emitter {}", data.name(), id);
        Some(id)
    }

    /// Stop an emitter's sound and destroy it now, cancelling any cleanup
    /// still pending for it. Returns `false` if the emitter was already gone.
    pub fn stop(&mut self, scene: &mut Scene, emitter: ObjectId) -> bool {
        if let Some(voice) = self.voices.remove(&emitter) {
            self.output.stop(voice);
        }
        if let Some(timer) = self.pending_cleanups.remove(&emitter) {
            self.cleanup_timers.cancel(timer);
        }
        scene.destroy(emitter)
    }

    fn resolve_clip(scene: &Scene, handle: AssetHandle<AudioClip>) -> Option<AudioClip> {
        scene.resource::<AssetServer>()?.get_clip(handle).cloned()
    }

    fn create_emitter(&self, scene: &mut Scene, clip: AssetHandle<AudioClip>, position: Vec3) -> ObjectId {
        scene.spawn_with(
            EMITTER_NAME,
            Transform::from_position(position),
            AudioEmitter::new(clip),
        )
    }

    fn start_emitter(&mut self, scene: &mut Scene, id: ObjectId, clip: &AudioClip) -> Result<VoiceId, AudioError> {
        let position = scene.transform(id).map_or(self.config.anchor, |t| t.position);
        let emitter = scene
            .get_mut::<AudioEmitter>(id)
            .ok_or_else(|| AudioError::PlaybackFailed(format!("object {} has no emitter", id)))?;

        let params = self.voice_params(emitter, position);
        let voice = self.output.start(clip, &params)?;
        emitter.voice = Some(voice);
        emitter.state = EmitterState::Playing;
        self.voices.insert(id, voice);
        Ok(voice)
    }

    fn voice_params(&self, emitter: &AudioEmitter, position: Vec3) -> VoiceParams {
        let spatial = blend_spatial(&self.listener, position, emitter.spatial_blend);
        VoiceParams {
            volume: emitter.volume * self.config.volumes.effective_sfx_volume() * spatial.volume,
            panning: spatial.panning,
            looping: emitter.looping,
            route: emitter.route,
        }
    }

    // ---- Per-frame ----

    /// Call once per frame, after [`Scene::advance`].
    ///
    /// Runs real-time cleanups, stops voices whose emitter was destroyed,
    /// marks finished emitters as stopped and re-applies spatial parameters
    /// for emitters that moved. Each scene frame's time is consumed once:
    /// calling this again before the next `advance` does not move any clock.
    pub fn update(&mut self, scene: &mut Scene) {
        let frame = scene.time().frame_count;
        if self.last_frame != Some(frame) {
            self.last_frame = Some(frame);
            self.advance_clocks(scene);
        }

        let output = &mut self.output;
        self.voices.retain(|id, voice| {
            let alive = scene.is_alive(*id);
            if !alive {
                output.stop(*voice);
            }
            alive
        });
        let timers = &mut self.cleanup_timers;
        self.pending_cleanups.retain(|id, timer| {
            let alive = scene.is_alive(*id);
            if !alive {
                timers.cancel(*timer);
            }
            alive
        });

        let active: Vec<(ObjectId, VoiceId)> = self.voices.iter().map(|(id, voice)| (*id, *voice)).collect();
        for (id, voice) in active {
            if !self.output.is_playing(voice) {
                if let Some(emitter) = scene.get_mut::<AudioEmitter>(id) {
                    emitter.state = EmitterState::Stopped;
                }
                self.voices.remove(&id);
                continue;
            }
            let spatial = scene
                .get::<AudioEmitter>(id)
                .is_some_and(|emitter| emitter.spatial_blend > 0.0);
            if spatial {
                self.refresh_voice(scene, id, voice);
            }
        }
    }

    fn advance_clocks(&mut self, scene: &mut Scene) {
        self.output.advance(scene.time().real_delta());

        for id in self.cleanup_timers.tick(scene.time()) {
            self.pending_cleanups.remove(&id);
            // The emitter may already be gone, and its slot may hold a new object.
            if scene.destroy(id) {
                debug!("Cleaned up emitter {} in real time", id);
            }
        }
    }

    fn refresh_voice(&mut self, scene: &Scene, id: ObjectId, voice: VoiceId) {
        let (Some(emitter), Some(transform)) = (scene.get::<AudioEmitter>(id), scene.transform(id)) else {
            return;
        };
        let params = self.voice_params(emitter, transform.position);
        if let Err(e) = self.output.set_params(voice, params.volume, params.panning) {
            debug!("Could not update voice for emitter {}: {}", id, e);
        }
    }

    // ---- Configuration ----

    /// Apply new volume settings to future and currently playing sounds.
    pub fn update_volumes(&mut self, scene: &Scene, volumes: AudioConfig) {
        self.config.volumes = volumes;
        let active: Vec<(ObjectId, VoiceId)> = self.voices.iter().map(|(id, voice)| (*id, *voice)).collect();
        for (id, voice) in active {
            self.refresh_voice(scene, id, voice);
        }
    }

    /// Update the listener position and orientation for spatial audio.
    pub fn set_listener(&mut self, position: Vec3, forward: Vec3, up: Vec3) {
        self.listener = Listener { position, forward, up };
    }

    /// Place the listener at a transform, e.g. the camera's.
    pub fn set_listener_from(&mut self, transform: &Transform) {
        self.set_listener(transform.position, transform.forward(), transform.up());
    }

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    /// Route one-shot sounds through `route` unless their settings say otherwise.
    pub fn set_route(&mut self, route: OutputRoute) {
        self.route = route;
    }

    pub fn route(&self) -> OutputRoute {
        self.route
    }

    pub fn config(&self) -> &SoundPlayerConfig {
        &self.config
    }

    // ---- Introspection ----

    /// The clip remembered for a name, if it has been played before.
    pub fn cached(&self, name: &str) -> Option<AssetHandle<AudioClip>> {
        self.loaded_sounds.get(name).copied()
    }

    /// Number of names in the clip cache.
    pub fn cache_len(&self) -> usize {
        self.loaded_sounds.len()
    }

    /// Number of real-time cleanups still waiting to fire.
    pub fn pending_cleanups(&self) -> usize {
        self.pending_cleanups.len()
    }

    /// Number of emitters whose voice is still tracked as playing.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn output(&self) -> &dyn AudioOutput {
        self.output.as_ref()
    }

    pub fn output_mut(&mut self) -> &mut dyn AudioOutput {
        self.output.as_mut()
    }
}
