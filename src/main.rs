//! Vibe Oracle CLI — play a generative session live or render it to WAV.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use vibe_oracle::audio::{render_to_wav, AudioEngine};
use vibe_oracle::config::{self, EngineConfig};
use vibe_oracle::control::{control_channel, ControlEvent, ControlParam, ControlUpdate, Controller};
use vibe_oracle::emotion::Emotion;
use vibe_oracle::osc::OscListener;
use vibe_oracle::scheduler::Notification;
use vibe_oracle::session::Engine;
use vibe_oracle::style::{oracle_pick, MixRecipe, Style, StyleSet, MIX_RECIPES};

/// Length of an exported render when `--seconds` is not given.
const DEFAULT_EXPORT_SECS: f64 = 30.0;
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "vibe-oracle")]
#[command(version, about = "Generative multi-style music sessions", long_about = None)]
struct Cli {
    /// Style to layer (repeat up to three times). The first one leads.
    #[arg(short, long = "style")]
    styles: Vec<Style>,

    /// Play a curated mix recipe instead of explicit styles
    #[arg(short, long, conflicts_with = "styles")]
    recipe: Option<String>,

    /// Emotion to apply (happy, sad, angry, calm, excited, none)
    #[arg(short, long)]
    emotion: Option<String>,

    /// Stop after this many seconds (default: play until Ctrl-C; 30 for --export)
    #[arg(long)]
    seconds: Option<f64>,

    /// Seed for a reproducible performance
    #[arg(long)]
    seed: Option<u64>,

    /// Tempo override in BPM (60-200)
    #[arg(long)]
    bpm: Option<f64>,

    /// Filter amount (0-100)
    #[arg(long)]
    filter: Option<f64>,

    /// Reverb amount (0-100)
    #[arg(long)]
    reverb: Option<f64>,

    /// Volume (0-100)
    #[arg(long)]
    volume: Option<f64>,

    /// Render offline to this WAV file instead of playing
    #[arg(long)]
    export: Option<PathBuf>,

    /// Listen for OSC control messages
    #[arg(long)]
    osc: bool,

    /// Config file (default: ~/.vibe-oracle/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// List styles, recipes and emotions, then exit
    #[arg(long)]
    list: bool,
}

impl Cli {
    fn control_update(&self) -> ControlUpdate {
        [
            (ControlParam::Bpm, self.bpm),
            (ControlParam::Filter, self.filter),
            (ControlParam::Reverb, self.reverb),
            (ControlParam::Volume, self.volume),
        ]
        .into_iter()
        .fold(ControlUpdate::default(), |update, (param, value)| match value {
            Some(v) => update.with(param, v),
            None => update,
        })
    }

    fn style_set(&self, seed: Option<u64>) -> Result<StyleSet, Box<dyn std::error::Error>> {
        if let Some(id) = &self.recipe {
            return Ok(MixRecipe::find(id)?.style_set());
        }
        if !self.styles.is_empty() {
            return Ok(StyleSet::truncated(&self.styles)?);
        }
        let picked = match seed {
            Some(seed) => oracle_pick(&mut ChaCha8Rng::seed_from_u64(seed)),
            None => oracle_pick(&mut rand::thread_rng()),
        };
        println!("the oracle picks: {picked}");
        Ok(picked)
    }
}

fn print_catalogue() {
    println!("styles:");
    for style in Style::ALL {
        println!("  {:<12} {:>5.0} bpm", style.name(), style.base_tempo());
    }
    println!("recipes:");
    for recipe in &MIX_RECIPES {
        println!(
            "  {:<16} {} — {}",
            recipe.id,
            recipe.style_set(),
            recipe.description
        );
    }
    println!("emotions:");
    for emotion in Emotion::ALL {
        let p = emotion.params();
        println!("  {:<8} x{:.1} tempo", emotion.name(), p.bpm_multiplier);
    }
}

fn export(
    path: &Path,
    config: &EngineConfig,
    styles: StyleSet,
    update: ControlUpdate,
    seconds: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = Engine::new(config.offline_sample_rate(), config);
    engine.start(&styles);
    engine.update_controls(update);
    println!("rendering {seconds:.1}s of {styles} to {}", path.display());
    render_to_wav(&mut engine, seconds, config.offline_channels(), path)?;
    Ok(())
}

fn describe(notification: Notification) {
    match notification {
        Notification::SectionChanged(section) => println!("== {section} =="),
        Notification::ChordChanged(chord) => println!("   {chord}"),
    }
}

fn play(
    cli: &Cli,
    config: &EngineConfig,
    styles: StyleSet,
    update: ControlUpdate,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = AudioEngine::new(config)?;
    println!(
        "audio: {} Hz, {} ch — playing {styles}",
        engine.sample_rate(),
        engine.channels()
    );

    let mut notifications = engine.subscribe()?;
    let mut controller = Controller::new();
    controller.dispatch(&mut engine, ControlEvent::Start(styles))?;
    if !update.is_empty() {
        engine.update_controls(update)?;
    }

    let (control_tx, control_rx) = control_channel();
    let _osc = if cli.osc || config.osc.enabled {
        match OscListener::start(&config.osc, control_tx) {
            Ok(listener) => {
                println!("osc: listening on port {}", listener.port());
                Some(listener)
            }
            Err(e) => {
                warn!(error = %e, port = config.osc.listen_port, "osc listener failed to start");
                None
            }
        }
    } else {
        None
    };

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    let deadline = cli.seconds.map(|s| Instant::now() + Duration::from_secs_f64(s.max(0.0)));

    while running.load(Ordering::SeqCst) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        for notification in notifications.drain() {
            describe(notification);
        }
        for event in control_rx.drain() {
            if let Err(e) = controller.dispatch(&mut engine, event) {
                warn!(error = %e, "dropped control event");
            }
        }
        thread::sleep(POLL_INTERVAL);
    }

    engine.stop_session()?;
    // Let the stop reach the audio thread before the stream is dropped.
    thread::sleep(Duration::from_millis(200));
    info!("session ended");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if cli.list {
        print_catalogue();
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => config::load_from(path)?,
        None => config::load_config()?,
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(name) = &cli.emotion {
        config.emotion = Emotion::parse_optional(name)?;
    }

    let styles = cli.style_set(config.seed)?;
    let update = cli.control_update();

    match &cli.export {
        Some(path) => export(
            path,
            &config,
            styles,
            update,
            cli.seconds.unwrap_or(DEFAULT_EXPORT_SECS),
        ),
        None => play(&cli, &config, styles, update),
    }
}
