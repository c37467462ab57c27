mod gpu;
mod library;
mod sim;
mod store;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use winit::{
    event::*,
    event_loop::{EventLoop, EventLoopWindowTarget},
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use tree_core::{
    FrameLoop, GestureCell, InferenceWorker, ModeRequest, SceneConfig,
};

use gpu::GpuRenderer;
use sim::{Pose, SharedControl, SimControl, SimulatedHand};
use store::DirPhotoStore;

/// Gesture-driven ornament tree.
///
/// Keys: H toggles the simulated hand, P/F/O/N set pinch/fist/open/relaxed,
/// 1/2 force aggregated/dispersed, R rebuilds the population, X deletes the
/// focused photo, C clears every photo. Drop image files on the window to
/// import them; imports are kept in the photo store between runs.
#[derive(Parser, Debug)]
#[command(name = "grand-tree", version)]
struct Args {
    /// Ornaments in the tree population
    #[arg(long)]
    tree_count: Option<usize>,

    /// Dust particles
    #[arg(long)]
    dust_count: Option<usize>,

    /// Falling snow and stars
    #[arg(long)]
    falling_count: Option<usize>,

    /// Pointer-driven rotation speed while dispersed
    #[arg(long)]
    rotation_speed: Option<f32>,

    /// Focus grab radius in normalized screen units
    #[arg(long)]
    grab_radius: Option<f32>,

    /// Seed for a reproducible layout
    #[arg(long)]
    seed: Option<u64>,

    /// Directory of photos to preload
    #[arg(long)]
    photos: Option<PathBuf>,

    /// Directory holding imported photos between runs
    #[arg(long, default_value = "grand-tree-photos")]
    store: PathBuf,

    /// Run without hand input
    #[arg(long)]
    no_hand: bool,
}

impl Args {
    fn scene_config(&self) -> SceneConfig {
        let mut config = SceneConfig::default();
        if let Some(v) = self.tree_count {
            config.tree_count = v;
        }
        if let Some(v) = self.dust_count {
            config.dust_count = v;
        }
        if let Some(v) = self.falling_count {
            config.falling_count = v;
        }
        if let Some(v) = self.rotation_speed {
            config.rotation_speed = v;
        }
        if let Some(v) = self.grab_radius {
            config.grab_radius = v;
        }
        config
    }
}

struct App {
    frame_loop: FrameLoop,
    store: DirPhotoStore,
    control: SharedControl,
}

impl App {
    fn set_control(&self, f: impl FnOnce(&mut SimControl)) {
        match self.control.lock() {
            Ok(mut control) => f(&mut control),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    fn handle_key(&mut self, key: Key<&str>, elwt: &EventLoopWindowTarget<()>) {
        match key {
            Key::Named(NamedKey::Escape) => elwt.exit(),
            Key::Character(c) => match c.to_ascii_lowercase().as_str() {
                "h" => self.set_control(|c| c.present = !c.present),
                "p" => self.set_pose(Pose::Pinch),
                "f" => self.set_pose(Pose::Fist),
                "o" => self.set_pose(Pose::Open),
                "n" => self.set_pose(Pose::Relaxed),
                "1" => self.frame_loop.force_mode(ModeRequest::Aggregate),
                "2" => self.frame_loop.force_mode(ModeRequest::Disperse),
                "r" => {
                    let config = self.frame_loop.scene().config().clone();
                    self.frame_loop
                        .rebuild_population(config.tree_count, config.dust_count);
                    self.frame_loop.rebuild_falling(config.falling_count);
                }
                "x" => self.delete_focused(),
                "c" => {
                    if let Err(e) = self.frame_loop.clear_photos(&mut self.store) {
                        log::error!("[photos] clear failed: {e}");
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn set_pose(&self, pose: Pose) {
        self.set_control(|c| {
            c.present = true;
            c.pose = pose;
        });
    }

    fn delete_focused(&mut self) {
        let Some(target) = self.frame_loop.motion().focus_target() else {
            return;
        };
        let Some(photo_id) = self
            .frame_loop
            .scene()
            .get(target)
            .and_then(|o| o.photo_id())
            .map(str::to_string)
        else {
            return;
        };
        if let Err(e) = self.frame_loop.delete_photo(&mut self.store, &photo_id) {
            log::error!("[photos] delete failed: {e}");
        }
    }

    fn import_file(&mut self, path: &std::path::Path) {
        let result = std::fs::read(path)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| Ok(self.frame_loop.import_photo(&mut self.store, bytes)?));
        if let Err(e) = result {
            log::error!("[photos] import of {} failed: {e}", path.display());
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = args.scene_config();
    let mut frame_loop = FrameLoop::new(config, args.seed).context("invalid scene options")?;

    if let Some(dir) = &args.photos {
        let assets = library::load_static_photos(dir)
            .with_context(|| format!("reading photos from {}", dir.display()))?;
        for asset in assets {
            if let Err(e) = frame_loop.add_photo(asset) {
                log::warn!("[photos] {e}");
            }
        }
    }
    let store = DirPhotoStore::open(&args.store)
        .with_context(|| format!("opening photo store {}", args.store.display()))?;
    let restored = frame_loop.restore_photos(&store)?;
    log::info!("[photos] restored {restored} stored photos");
    frame_loop.ensure_default_photo();

    // Hand inference runs on its own thread and hands results over through
    // the latest-sample cell.
    let control: SharedControl = Arc::new(Mutex::new(SimControl::default()));
    let cell = GestureCell::new();
    frame_loop.attach_gestures(cell.reader());
    let source = if args.no_hand {
        SimulatedHand::unavailable(Arc::clone(&control))
    } else {
        SimulatedHand::new(Arc::clone(&control))
    };
    let worker = InferenceWorker::spawn(source, cell)?;

    let mut app = App {
        frame_loop,
        store,
        control,
    };

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Grand Tree")
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(GpuRenderer::new(&window))?;
    let size = window.inner_size();
    app.frame_loop
        .camera_mut()
        .set_aspect(size.width, size.height);

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                gpu.resize(size);
                app.frame_loop
                    .camera_mut()
                    .set_aspect(size.width, size.height);
            }
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                let size = gpu.window.inner_size();
                let uv = Vec2::new(
                    position.x as f32 / size.width.max(1) as f32,
                    position.y as f32 / size.height.max(1) as f32,
                );
                app.set_control(|c| c.cursor = uv);
            }
            WindowEvent::DroppedFile(path) => app.import_file(&path),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => app.handle_key(logical_key.as_ref(), elwt),
            _ => {}
        },
        Event::AboutToWait => match app.frame_loop.tick(&mut gpu) {
            Ok(()) => gpu.window.request_redraw(),
            Err(e) => {
                log::error!("[gpu] {e:#}");
                elwt.exit();
            }
        },
        _ => {}
    })?;

    worker.shutdown();
    Ok(())
}
