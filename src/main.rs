// Copyright (c) 2026 rezky_nightky

use std::env;
use std::path::Path;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Color;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use rainfield::canvas::Canvas;
use rainfield::config::{
    default_params_usage_for_help, detect_color_mode, effective_locale, locale_is_utf8,
    print_list_charsets, Args,
};
use rainfield::frame::Frame;
use rainfield::palette::ColorMode;
use rainfield::schedule::RefreshClock;
use rainfield::terminal::{restore_terminal_best_effort, Terminal};
use rainfield::viewport::{ViewportHub, ViewportSize};
use rainfield::{RainError, RainField};

/// Event wait while stopped, so resizes and keys stay responsive.
const IDLE_WAIT: Duration = Duration::from_millis(250);

fn build_info() -> &'static str {
    env!("RAINFIELD_BUILD")
}

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

fn install_restore_hooks() {
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
}

fn init_logging(path: &Path) -> Result<(), RainError> {
    let file = std::fs::File::create(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .write_style(env_logger::WriteStyle::Never)
        .init();
    Ok(())
}

enum Action {
    Quit,
    Toggle,
    Resize(u16, u16),
    Ignore,
}

fn classify(ev: Event, screensaver: bool) -> Action {
    match ev {
        Event::Resize(w, h) => Action::Resize(w, h),
        Event::Key(k) if k.kind == KeyEventKind::Press => {
            if screensaver {
                return Action::Quit;
            }
            match (k.code, k.modifiers) {
                (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => Action::Quit,
                (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Action::Quit,
                (KeyCode::Char('p'), _) | (KeyCode::Char(' '), _) => Action::Toggle,
                _ => Action::Ignore,
            }
        }
        _ => Action::Ignore,
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), RainError> {
    install_restore_hooks();

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_charsets {
        print_list_charsets();
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let config = args.rain_config()?;
    let fps = args.target_fps()?;
    let duration = args.duration_secs()?;
    let (lc_all, lc_ctype, lang) = (
        env::var("LC_ALL").ok(),
        env::var("LC_CTYPE").ok(),
        env::var("LANG").ok(),
    );
    let utf8 = locale_is_utf8(effective_locale(
        lc_all.as_deref(),
        lc_ctype.as_deref(),
        lang.as_deref(),
    ));
    let alphabet = args.alphabet(utf8)?;
    let color_mode = match args.forced_color_mode()? {
        Some(m) => m,
        None => detect_color_mode(
            &env::var("COLORTERM").unwrap_or_default(),
            &env::var("TERM").unwrap_or_default(),
        ),
    };
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let bg = if color_mode == ColorMode::Mono {
        None
    } else {
        Some(Color::Black)
    };

    let mut term = Terminal::new()?;
    let (cols, rows) = term.size()?;
    let cell = config.glyph_cell_px;
    let size = ViewportSize::from_cells(cols, rows, cell);
    info!(
        "terminal {}x{} cells, color mode {}, {} fps",
        cols,
        rows,
        color_mode.label(),
        fps
    );

    let canvas = Canvas::new(size.width_px, size.height_px, cell);
    let mut hub = ViewportHub::new(size);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut field = RainField::new(
        canvas.clone(),
        &mut hub,
        RefreshClock::new(fps),
        rng,
        alphabet,
        config,
    )?;
    let mut frame = Frame::new(cols, rows, bg);

    let start_time = Instant::now();
    let end_time = duration.map(|s| start_time + Duration::from_secs_f64(s));
    field.start();

    'outer: loop {
        let now = Instant::now();
        if end_time.is_some_and(|end| now >= end) {
            break;
        }

        let mut timeout = field.scheduler().time_until_due(now).unwrap_or(IDLE_WAIT);
        if let Some(end) = end_time {
            timeout = timeout.min(end.saturating_duration_since(now));
        }

        let mut ready = Terminal::poll_event(timeout)?;
        while ready {
            match classify(Terminal::read_event()?, args.screensaver) {
                Action::Quit => break 'outer,
                Action::Toggle if field.is_running() => field.stop(),
                Action::Toggle => field.start(),
                Action::Resize(w, h) => hub.notify(ViewportSize::from_cells(w, h, cell)),
                Action::Ignore => {}
            }
            ready = Terminal::poll_event(Duration::ZERO)?;
        }

        if field.pump() {
            canvas.compose(&mut frame, color_mode, bg);
            if frame.has_changes() {
                term.draw(&mut frame)?;
            }
        }
    }

    field.stop();
    let frames = field.frames_drawn();
    drop(field);
    drop(term);

    if args.perf_stats {
        let elapsed_s = start_time.elapsed().as_secs_f64().max(0.000_001);
        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", fps);
        println!("  frames: {}", frames);
        println!("  avg_fps: {:.3}", frames as f64 / elapsed_s);
    }

    Ok(())
}
