// Copyright (c) 2026 rezky_nightky

mod advance;
mod animation;
mod columns;
mod config;
mod frame;
mod glyph;
mod grid;
mod paint;
mod palette;
mod rain;
mod runtime;
mod terminal;
mod timer;

use std::env;
use std::fs::OpenOptions;
use std::path::Path;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use log::info;
use rand::Rng;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::animation::Animation;
use crate::config::{color_enabled_stdout, print_list_palettes, Args, RainConfig};
use crate::frame::Frame;
use crate::paint::Painter;
use crate::palette::parse_palette_name;
use crate::rain::Rainfall;
use crate::runtime::ColorMode;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

/// Longest wait between loop turns when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(100);

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{}", msg);
    std::process::exit(1);
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }

    ColorMode::Color16
}

fn parse_color_mode(m: u16) -> Result<ColorMode, String> {
    match m {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        _ => Err(format!(
            "invalid --colormode: {} (allowed: 0,16,8/256,24/32)",
            m
        )),
    }
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        Some(m) => parse_color_mode(m).unwrap_or_else(|e| fail(e)),
        None => detect_color_mode_auto(),
    }
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

/// Logs go to a file only: the animation owns the terminal screen.
fn init_logging(path: Option<&Path>) -> std::io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn duration_limit(v: Option<f64>) -> Option<Duration> {
    let s = v?;
    if !s.is_finite() {
        fail(format!(
            "failed to apply --duration {} (must be a finite number)",
            s
        ));
    }
    if s <= 0.0 {
        return None;
    }
    if !(0.1..=86400.0).contains(&s) {
        fail(format!(
            "failed to apply --duration {} (min 0.1 max 86400)",
            s
        ));
    }
    Some(Duration::from_secs_f64(s))
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    let cmd = Args::command()
        .styles(clap_styles())
        .help_template(help_template);
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_palettes {
        print_list_palettes();
        return Ok(());
    }

    if args.check_bitcolor {
        let colorterm = env::var("COLORTERM").unwrap_or_default();
        let term = env::var("TERM").unwrap_or_default();
        let or_unset = |v: &str| if v.is_empty() { "(unset)".to_string() } else { v.to_string() };
        println!("BITCOLOR CHECK:");
        println!("  COLORTERM: {}", or_unset(&colorterm));
        println!("  TERM: {}", or_unset(&term));
        println!("  auto_detected: {}", color_mode_label(detect_color_mode_auto()));
        println!("  effective: {}", color_mode_label(detect_color_mode(&args)));
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", env!("RAINFALL_BUILD"));
        let sha = env!("RAINFALL_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);
    let initial_palette = parse_palette_name(&args.palette).unwrap_or_else(|e| fail(e));
    let run_for = duration_limit(args.duration);

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        fail(format!("failed to open log file: {}", e));
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let cfg = RainConfig {
        initial_palette,
        ..RainConfig::default()
    };
    let rain = Rainfall::with_seed(cfg, seed).unwrap_or_else(|e| fail(e));
    info!(
        "starting: seed {}, color mode {}, palette {}",
        seed,
        color_mode_label(color_mode),
        initial_palette
    );

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let painter = Painter::new(color_mode);
    let mut frame = Frame::new(w, h, painter.page_bg());

    let start_time = Instant::now();
    let end_time = run_for.map(|d| start_time + d);
    let mut anim = Animation::mount(rain, start_time);

    'run: loop {
        let mut pending_resize: Option<(u16, u16)> = None;
        while Terminal::poll_event(Duration::from_millis(0))? {
            match Terminal::read_event()? {
                Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                Event::Key(k) if k.kind == KeyEventKind::Press => match (k.code, k.modifiers) {
                    (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => break 'run,
                    (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => break 'run,
                    _ => {}
                },
                _ => {}
            }
        }

        let now = Instant::now();
        if end_time.is_some_and(|end| now >= end) {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            frame = Frame::new(nw, nh, painter.page_bg());
            anim.request_paint();
        }

        anim.update(now);
        if anim.take_paint_request() {
            painter.paint(anim.rain(), &mut frame);
            if frame.is_dirty() {
                term.draw(&mut frame)?;
            }
        }

        let now = Instant::now();
        let mut timeout = anim
            .next_deadline()
            .map(|d| d.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL);
        if let Some(end) = end_time {
            timeout = timeout.min(end.saturating_duration_since(now));
        }
        let _ = Terminal::poll_event(timeout)?;
    }

    anim.unmount();
    drop(term);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mode_values() {
        assert_eq!(parse_color_mode(0), Ok(ColorMode::Mono));
        assert_eq!(parse_color_mode(16), Ok(ColorMode::Color16));
        assert_eq!(parse_color_mode(8), Ok(ColorMode::Color256));
        assert_eq!(parse_color_mode(256), Ok(ColorMode::Color256));
        assert_eq!(parse_color_mode(24), Ok(ColorMode::TrueColor));
        assert_eq!(parse_color_mode(32), Ok(ColorMode::TrueColor));
        assert!(parse_color_mode(7).is_err());
    }

    #[test]
    fn non_positive_duration_disables_limit() {
        assert_eq!(duration_limit(None), None);
        assert_eq!(duration_limit(Some(0.0)), None);
        assert_eq!(duration_limit(Some(-3.0)), None);
        assert_eq!(duration_limit(Some(1.5)), Some(Duration::from_millis(1500)));
    }
}
