// Copyright (c) 2026 rezky_nightky

mod color;
mod config;
mod frame;
mod grid;
mod logger;
mod mover;
mod occupancy;
mod rain;
mod random;
mod render;
mod schedule;
mod spawner;
mod terminal;

use std::env;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{Args, Settings};
use crate::rain::{Applied, Rain};
use crate::random::StdRandom;
use crate::render::{RenderStyle, Renderer, TerminalRenderer};
use crate::schedule::Scheduler;
use crate::terminal::{restore_terminal_best_effort, Terminal};

fn build_info() -> &'static str {
    env!("RAINGRID_BUILD")
}

fn default_to_ascii() -> bool {
    let lang = env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
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

    let args = Args::parse();

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        let sha = env!("RAINGRID_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let settings = match Settings::from_args(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    logger::set_verbose(settings.verbose);

    for warning in settings.interval_warnings() {
        crate::log!("warn"; "{}", warning);
    }
    crate::debug!(
        "config";
        "spawn {:?}, fall {:?}, reset {:?}, color {}, cell width {}",
        settings.intervals.spawn,
        settings.intervals.fall,
        settings.intervals.reset,
        settings.color_mode.label(),
        settings.cell_width
    );

    let style = RenderStyle {
        color_mode: settings.color_mode,
        color_bg: settings.color_bg,
        cell_width: settings.cell_width,
        ascii: default_to_ascii(),
    };
    let mut renderer = TerminalRenderer::new(style)?;
    let (w, h) = renderer.size();
    let (rows, cols) = settings.grid_size(w, h);

    let mut rain = Rain::new(rows, cols, StdRandom::new(settings.seed));
    let start_time = Instant::now();
    let end_time = settings.duration.map(|d| start_time + d);
    let mut scheduler = Scheduler::start(rain.epoch(), settings.intervals, start_time);
    renderer.render(rain.grid())?;

    let mut running = true;
    while running {
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if is_quit_key(k.code, k.modifiers) {
                            running = false;
                        }
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            if end_time.is_some_and(|end| now >= end) {
                running = false;
            }
            if !running || pending_resize.is_some() {
                break;
            }

            let deadline = scheduler.next_deadline();
            if now >= deadline {
                break;
            }
            let mut timeout = deadline - now;
            if let Some(end) = end_time {
                timeout = timeout.min(end.saturating_duration_since(now));
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        let mut dirty = false;

        if let Some((nw, nh)) = pending_resize {
            renderer.resize(nw, nh);
            let dims = settings.grid_size(nw, nh);
            if dims != rain.dims() {
                let epoch = rain.reinit(dims.0, dims.1);
                scheduler = Scheduler::start(epoch, settings.intervals, Instant::now());
            }
            dirty = true;
        }

        for tick in scheduler.due(Instant::now()) {
            if rain.apply(tick) == Applied::Committed {
                dirty = true;
            }
        }

        if dirty {
            renderer.render(rain.grid())?;
        }
    }

    drop(renderer);

    let stats = rain.stats();
    crate::debug!(
        "rain";
        "{:.1}s: {} waves, {} skipped, {} falls, {} resets, {} reinits",
        start_time.elapsed().as_secs_f64(),
        stats.waves,
        stats.skipped_waves,
        stats.falls,
        stats.resets,
        stats.reinits
    );
    crate::debug!(
        "rain";
        "final {}x{} grid: {} lit cells, {} occupied columns",
        rain.dims().0,
        rain.dims().1,
        rain.grid().lit_count(),
        rain.state().occupied.len()
    );

    Ok(())
}
