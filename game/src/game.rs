use engine::{Assets, Event, Game, KeyCode, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::drop::DropOutcome;
use crate::round::Round;
use crate::shape::ShapeKind;

/// Edge length of the generated stand-in textures.
pub const FALLBACK_TEXTURE_SIZE: u32 = 256;

/// The matching scene: owns the current round and reacts to engine events.
pub struct ShapesGame {
    config: GameConfig,
    rng: StdRng,
    round: Option<Round>,
}

impl ShapesGame {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            round: None,
        }
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Tears down the current round, if any, and lays out a new one.
    pub fn start_round(&mut self, scene: &mut Scene) {
        if let Some(old) = self.round.take() {
            old.teardown(scene);
        }
        self.round = Some(Round::generate(scene, &mut self.rng));
    }

    fn load_texture(&self, assets: &mut Assets, kind: ShapeKind) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let path = self.config.asset_dir.join(format!("{}.png", kind.name()));
            match assets.load_file(kind.name(), &path) {
                Ok(()) => return,
                Err(err) => log::warn!("{err}; using generated {} texture", kind.name()),
            }
        }
        assets.insert(kind.name(), kind.rasterize(FALLBACK_TEXTURE_SIZE));
    }
}

impl Game for ShapesGame {
    fn preload(&mut self, assets: &mut Assets) {
        for kind in ShapeKind::ALL {
            self.load_texture(assets, kind);
        }
    }

    fn handle(&mut self, scene: &mut Scene, event: &Event) {
        if let Event::Init | Event::Key(KeyCode::KeyR) = event {
            self.start_round(scene);
            return;
        }
        let Some(round) = self.round.as_mut() else {
            log::debug!("no round yet, ignoring {event:?}");
            return;
        };
        match event {
            Event::DragStart { visual, .. } => {
                round.drag_start(scene, *visual);
            }
            Event::Drag { visual, position } => {
                round.drag_move(scene, *visual, *position);
            }
            Event::DragEnd { visual } => {
                round.drag_end(scene, *visual);
            }
            Event::Drop { visual, .. } => {
                if let Some(DropOutcome::Matched { .. }) = round.resolve_drop(scene, *visual) {
                    if round.is_complete() {
                        log::info!("all shapes matched, press R for a new round");
                    }
                }
            }
            Event::DragLeave { visual, zone } => {
                log::debug!("{visual:?} left drop zone {zone:?}");
            }
            Event::Resize { width, height } => {
                let viewport = glam::Vec2::new(*width as f32, *height as f32);
                round.resize(scene, viewport, self.config.resize_policy);
            }
            Event::Init | Event::Key(_) => {}
        }
    }
}
