//! Tetritui: classic tetromino falling-block puzzle game in the terminal.

mod app;
mod input;
mod piece;
mod playfield;
mod session;
mod theme;
mod ui;

use session::DEFAULT_LEVEL;

use anyhow::Result;
use app::App;
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let mut app = App::new(&args, theme);
    app.run()
}

/// Classic tetromino puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tetritui",
    version,
    about = "Classic tetromino falling-block puzzle in the terminal. Stack pieces, clear full rows, chase 1024.",
    long_about = "Tetritui is a terminal rendition of the classic falling-block puzzle.\n\n\
        Pieces fall into a 16x30 well; completed rows clear and score. The game ends when a \
        fresh piece has no room to fall, or with a little celebration when the score reaches 1024.\n\n\
        CONTROLS:\n  Left/a      Move left    Right/d    Move right   Down/s   Soft drop\n  \
        j / k       Rotate       Space/Enter Hard drop   Q / Esc  Quit\n\n\
        Use --theme to load a btop-style theme file, or --palette for high-contrast/colorblind colours."
)]
pub struct Args {
    /// Starting level [1-9]; higher levels descend faster. Out-of-range
    /// values are clamped.
    #[arg(short, long, default_value_t = DEFAULT_LEVEL, value_name = "N")]
    pub level: u32,

    /// Path to theme file (btop-style theme[key]="value").
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: theme::Palette,

    /// Skip the splash and key-help screens and start playing immediately.
    #[arg(long)]
    pub no_splash: bool,
}
