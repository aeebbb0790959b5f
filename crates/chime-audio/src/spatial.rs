use glam::Vec3;

/// Listener state for spatial audio calculations.
#[derive(Debug, Clone)]
pub struct Listener {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: -Vec3::Z,
            up: Vec3::Y,
        }
    }
}

/// Parameters computed for a sound emitter relative to the listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialParams {
    /// Volume attenuation factor (0.0–1.0).
    pub volume: f64,
    /// Stereo panning (-1.0 = full left, 0.0 = center, 1.0 = full right).
    pub panning: f64,
}

impl SpatialParams {
    /// No attenuation, centered.
    pub const FLAT: SpatialParams = SpatialParams {
        volume: 1.0,
        panning: 0.0,
    };
}

/// Maximum distance at which a sound is audible.
const MAX_DISTANCE: f32 = 100.0;

/// Minimum distance before attenuation begins.
const MIN_DISTANCE: f32 = 1.0;

/// Compute spatial audio parameters for an emitter position relative to a listener.
///
/// Uses inverse-distance attenuation clamped between `MIN_DISTANCE` and `MAX_DISTANCE`.
/// Panning is derived from the angle between the listener's right vector and the
/// direction to the emitter.
pub fn compute_spatial(listener: &Listener, emitter_pos: Vec3) -> SpatialParams {
    let to_emitter = emitter_pos - listener.position;
    let distance = to_emitter.length();

    if distance < f32::EPSILON {
        return SpatialParams::FLAT;
    }

    let clamped = distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    let volume = (MIN_DISTANCE / clamped) as f64;

    let right = listener.forward.cross(listener.up).normalize_or_zero();
    let panning = to_emitter.normalize().dot(right) as f64;

    SpatialParams {
        volume: volume.clamp(0.0, 1.0),
        panning: panning.clamp(-1.0, 1.0),
    }
}

/// Mix flat (2D) playback with positional (3D) playback.
///
/// `blend` 0.0 ignores position entirely, 1.0 uses the full spatial result.
pub fn blend_spatial(listener: &Listener, emitter_pos: Vec3, blend: f32) -> SpatialParams {
    let blend = blend.clamp(0.0, 1.0) as f64;
    if blend == 0.0 {
        return SpatialParams::FLAT;
    }
    let spatial = compute_spatial(listener, emitter_pos);
    SpatialParams {
        volume: 1.0 + (spatial.volume - 1.0) * blend,
        panning: spatial.panning * blend,
    }
}
