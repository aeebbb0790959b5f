//! Chime - plays sounds through temporary scene emitters
//!
//! Usage: `chime [--paused] [--write-settings] <name>...`
//!
//! Each name is resolved against the configured asset root (or manifest) and
//! played once. With `--paused` game time is frozen for the whole run, so the
//! emitters are cleaned up on real time instead.

mod settings;

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chime_assets::{AssetServer, ClipManifest};
use chime_audio::{AudioEmitter, AudioOutput, KiraBackend, NullOutput, SoundPlayer};
use chime_core::GameTime;
use chime_scene::Scene;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::Settings;

/// Frame rate of the playback loop.
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Give up after this long even if emitters are still alive.
const MAX_RUN_TIME: Duration = Duration::from_secs(60);

struct Args {
    paused: bool,
    write_settings: bool,
    names: Vec<String>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut paused = false;
        let mut write_settings = false;
        let mut names = Vec::new();
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--paused" => paused = true,
                "--write-settings" => write_settings = true,
                flag if flag.starts_with("--") => anyhow::bail!("unknown flag {}", flag),
                _ => names.push(arg),
            }
        }
        if names.is_empty() && !write_settings {
            anyhow::bail!("usage: chime [--paused] [--write-settings] <name>...");
        }
        Ok(Self {
            paused,
            write_settings,
            names,
        })
    }
}

fn open_output() -> Box<dyn AudioOutput> {
    match KiraBackend::new() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            warn!("{}, continuing without sound", e);
            Box::new(NullOutput::new())
        }
    }
}

fn build_scene(settings: &Settings) -> Result<Scene> {
    let mut assets = AssetServer::new(&settings.assets.root);
    if let Some(manifest) = &settings.assets.manifest {
        let path = settings.assets.root.join(manifest);
        let manifest = ClipManifest::load(&path)
            .with_context(|| format!("Failed to load clip manifest {}", path.display()))?;
        assets = assets.with_manifest(manifest);
    }

    let mut scene = Scene::new(GameTime::new(settings.time.clone()));
    scene.insert_resource(assets);
    Ok(scene)
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let args = Args::parse()?;
    let settings = Settings::load();
    if args.write_settings {
        settings.save().context("Failed to write settings")?;
        if args.names.is_empty() {
            return Ok(());
        }
    }

    let mut scene = build_scene(&settings)?;
    let mut player = SoundPlayer::new(open_output(), settings.player_config());

    if args.paused {
        info!("Game time paused");
        scene.time_mut().pause();
    }

    let played = args
        .names
        .iter()
        .filter(|name| player.play_by_name(&mut scene, name).is_some())
        .count();
    info!("Playing {} of {} sounds", played, args.names.len());

    let start = Instant::now();
    let mut last_frame = start;
    while scene.iter::<AudioEmitter>().next().is_some() {
        if start.elapsed() > MAX_RUN_TIME {
            warn!("Emitters still alive after {:?}, giving up", MAX_RUN_TIME);
            break;
        }
        thread::sleep(FRAME_TIME);

        let now = Instant::now();
        scene.advance((now - last_frame).as_secs_f32());
        last_frame = now;
        player.update(&mut scene);
    }

    info!("Done after {:.2}s", start.elapsed().as_secs_f32());
    Ok(())
}
