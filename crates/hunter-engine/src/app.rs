//! Application lifecycle management.
//!
//! Headless game loop: load content, build the world, then step it with
//! scripted input and draw every frame into the log renderer.

use anyhow::{Context, Result};
use tracing::{debug, info};

use hunter_gameplay::content::Content;
use hunter_gameplay::events::GameEvent;
use hunter_gameplay::world::World;

use crate::config::EngineConfig;
use crate::input::ScriptedInput;
use crate::renderer::LogRenderer;
use crate::timing::FrameTiming;

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames stepped
    pub frames: u32,
    /// World time at the end of the run, in milliseconds
    pub clock_ms: u64,
    /// Events drained from the bus
    pub events: usize,
    /// NPCs that noticed the player
    pub notices: usize,
    /// Dialog sessions opened
    pub dialogs_started: usize,
    /// Dialog sessions closed
    pub dialogs_ended: usize,
    /// Blits issued
    pub blits: u64,
}

impl RunSummary {
    fn record(&mut self, event: &GameEvent) {
        self.events += 1;
        match event {
            GameEvent::NpcNoticedPlayer { .. } => self.notices += 1,
            GameEvent::DialogStarted { .. } => self.dialogs_started += 1,
            GameEvent::DialogEnded { .. } => self.dialogs_ended += 1,
            _ => {},
        }
    }
}

/// Log one world event the way presentation code would react to it.
fn log_event(frame: u32, event: &GameEvent) {
    match event {
        GameEvent::NpcNoticedPlayer { character, .. } => {
            info!(frame, %character, "NPC noticed the player");
        },
        GameEvent::NoticeIndicator { visible } => {
            debug!(frame, visible, "notice indicator");
        },
        GameEvent::DialogStarted { character, .. } => {
            info!(frame, %character, "dialog started");
        },
        GameEvent::DialogLineShown { index, text, .. } => {
            info!(frame, index, "{text}");
        },
        GameEvent::DialogLineRetired { index, .. } => {
            debug!(frame, index, "dialog line retired");
        },
        GameEvent::DialogEnded { character, .. } => {
            info!(frame, %character, "dialog ended");
        },
    }
}

/// Run the game headless for `config.frames` frames.
pub fn run(config: &EngineConfig) -> Result<RunSummary> {
    let content = Content::load(&config.content_path).with_context(|| {
        format!(
            "Failed to load content from {}",
            config.content_path.display()
        )
    })?;
    let map = content.map(&config.map)?;
    let mut world = World::setup(map, &config.spawn, &content, config.gameplay.clone())
        .with_context(|| format!("Failed to set up map '{}'", config.map))?;

    let mut timing = FrameTiming::new(config.target_fps, config.max_dt).with_pacing(config.realtime);
    let mut input = ScriptedInput::new(config.input_script.clone());
    let mut renderer = LogRenderer::new();
    let mut summary = RunSummary::default();

    info!(
        frames = config.frames,
        scripted = config.scripted_frames(),
        realtime = config.realtime,
        "Starting run"
    );

    timing.reset();
    for frame in 0..config.frames {
        let dt = if config.realtime {
            timing.delta_time()
        } else {
            timing.nominal_dt()
        };

        world.update(dt, input.next_frame());
        for event in world.event_bus().drain() {
            log_event(frame, &event);
            summary.record(&event);
        }

        renderer.begin_frame();
        world.draw(&mut renderer);
        renderer.present();

        summary.frames += 1;
        timing.sleep_remainder();
    }

    summary.clock_ms = world.clock_ms();
    summary.blits = renderer.total_blits();
    if !input.is_finished() {
        debug!("run ended before the input script did");
    }

    info!(
        frames = summary.frames,
        clock_ms = summary.clock_ms,
        events = summary.events,
        dialogs = summary.dialogs_ended,
        blits = summary.blits,
        "Run complete"
    );
    Ok(summary)
}
