//! Purgetui — tile-purge puzzle games (fragments and edgeflow) in the terminal.

mod app;
mod board;
mod game;
mod highscores;
mod input;
mod refill;
mod settle;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};

/// Options derived from CLI that affect game behaviour (variant, tile kinds,
/// minimum group size, timers, determinism).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub variant: Variant,
    pub difficulty: Difficulty,
    /// Number of tile kinds in play.
    pub kinds: u8,
    /// Smallest clickable group.
    pub min_group: usize,
    /// Deterministic RNG seed; None uses OS entropy.
    pub seed: Option<u64>,
    pub animations: bool,
    /// Edgeflow countdown in seconds.
    pub time_limit: u32,
    /// Fragments board-push interval in ms (before level speed-up).
    pub push_interval_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig {
        variant: args.variant,
        difficulty: args.difficulty,
        kinds: args.difficulty.kind_count(),
        min_group: args.min_group,
        seed: args.seed,
        animations: !args.no_animation,
        time_limit: args.time_limit,
        push_interval_ms: args.push_interval_ms,
    };
    let mut app = App::new(args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Tile-purge puzzle games in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "purgetui",
    version,
    about = "Tile-purge puzzles in the terminal. Pop connected groups, detonate bombs, keep the board alive.",
    long_about = "Purgetui bundles two tile-purge puzzles sharing one engine.\n\n\
        fragments: tiles fall down and columns close toward the centre; a fresh row pushes in \
        from the bottom on a timer, and the game ends when the board overflows.\n\n\
        edgeflow: gravity points wherever the holes vote it to, the board refills in place, \
        and you race a countdown clock.\n\n\
        CONTROLS (normal):\n  Arrows      Move cursor   Enter/Space  Pop group / detonate\n  Tab         Hint          P            Pause      Q / Esc    Quit\n\n\
        CONTROLS (vim):\n  h/j/k/l     Move cursor   Space        Pop        o          Hint\n  p           Pause         q            Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme) and --seed for a reproducible board."
)]
pub struct Args {
    /// Game variant: fragments (falling tiles + row push) or edgeflow (voted gravity + refill).
    #[arg(short = 'g', long, default_value = "fragments")]
    pub variant: Variant,

    /// Difficulty: easy (4 kinds), medium (5 kinds), hard (6 kinds + faster timers).
    #[arg(short, long, default_value = "easy")]
    pub difficulty: Difficulty,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Board width in columns.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: u16,

    /// Board height in rows.
    #[arg(long, default_value = "12", value_name = "ROWS")]
    pub height: u16,

    /// Smallest group that can be popped.
    #[arg(long, default_value = "3", value_name = "N")]
    pub min_group: usize,

    /// RNG seed for a reproducible board and refills.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// In variant 'edgeflow': time limit in seconds.
    #[arg(long, default_value = "180", value_name = "SECS")]
    pub time_limit: u32,

    /// In variant 'fragments': base interval between board pushes in ms.
    #[arg(long, default_value = "9000", value_name = "MS")]
    pub push_interval_ms: u64,

    /// Disable removal/spawn animations (instant resolution).
    #[arg(long)]
    pub no_animation: bool,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Skip main menu and start game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    #[default]
    Fragments,
    Edgeflow,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fragments => "fragments",
            Self::Edgeflow => "edgeflow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Tile kinds in play; more kinds mean rarer matches.
    pub fn kind_count(self) -> u8 {
        match self {
            Self::Easy => 4,
            Self::Medium => 5,
            Self::Hard => 6,
        }
    }

    /// Push-interval scale for fragments (hard pushes sooner).
    pub fn push_scale(self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Medium => 0.75,
            Self::Hard => 0.55,
        }
    }
}
