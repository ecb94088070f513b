use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::fs;
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::canvas::{render_scene, Canvas};
use crate::config::VizConfig;
use crate::console::{parse_command, Command, HELP};
use crate::error::{Error, Result};
use crate::harness::{Control, Event, Harness};

/// What a console line produced: text for the user, and whether the
/// session should end.
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn lines(lines: Vec<String>) -> Self {
        Reply { lines, quit: false }
    }
}

/// Draw the harness's current scene at the configured size.
pub fn render_frame(harness: &Harness, config: &VizConfig, focused: Option<usize>) -> Canvas {
    let mut canvas = Canvas::new(config.width, config.height);
    render_scene(&mut canvas, harness.scene(), &harness.overlay(focused), config.background, config.point_radius);
    canvas
}

pub fn save_snapshot(harness: &Harness, config: &VizConfig, path: &Path) -> Result<()> {
    render_frame(harness, config, None).save_png(path)?;
    info!(path = %path.display(), "snapshot written");
    Ok(())
}

pub fn export_dataset(harness: &Harness, path: &Path) -> Result<()> {
    let json = harness.dataset().to_json().map_err(Error::Export)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "dataset exported");
    Ok(())
}

/// Run one console line against the harness.
pub fn execute(harness: &mut Harness, config: &VizConfig, line: &str) -> Reply {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(err) => return Reply::lines(vec![err.to_string()]),
    };

    match command {
        Command::Event(event) => match harness.handle(event) {
            Ok(lines) => Reply::lines(lines),
            Err(err) => Reply::lines(vec![err.to_string()]),
        },
        Command::Controls => Reply::lines(harness.overlay(None).controls),
        Command::Summary => Reply::lines(harness.summary()),
        Command::Snapshot(path) => Reply::lines(vec![match save_snapshot(harness, config, &path) {
            Ok(()) => format!("saved {}", path.display()),
            Err(err) => format!("error: {}", err),
        }]),
        Command::Export(path) => Reply::lines(vec![match export_dataset(harness, &path) {
            Ok(()) => format!("exported {}", path.display()),
            Err(err) => format!("error: {}", err),
        }]),
        Command::Help => Reply::lines(HELP.iter().map(|s| s.to_string()).collect()),
        Command::Quit => Reply { lines: vec!["goodbye".to_string()], quit: true },
    }
}

/// Map a key press onto the focused control.
fn key_event(key: Key, control: &Control) -> Option<Event> {
    let name = control.name().to_string();
    match (key, control) {
        (Key::Left, Control::Slider { .. } | Control::Radio { .. }) => Some(Event::Nudge { name, steps: -1 }),
        (Key::Right, Control::Slider { .. } | Control::Radio { .. }) => Some(Event::Nudge { name, steps: 1 }),
        (Key::Enter, Control::Button { .. }) => Some(Event::Button(name)),
        _ => None,
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Window loop on the calling thread. Console lines arrive over `lines`;
/// returns when the window closes, Escape is pressed or `/quit` is read.
pub fn run_window(harness: &mut Harness, config: &VizConfig, lines: Receiver<String>) -> Result<()> {
    let mut window = Window::new(harness.title(), config.width, config.height, WindowOptions::default())?;
    window.set_target_fps(config.target_fps);
    info!(demo = harness.title(), width = config.width, height = config.height, "window opened");

    let interval = Duration::from_millis(config.animation_interval_ms);
    let mut focused = (!harness.controls().is_empty()).then_some(0);
    let mut paused = false;
    let mut last_tick = Instant::now();
    let mut console_open = true;
    let mut canvas = render_frame(harness, config, focused);
    let mut drawn = (harness.scene().revision, focused);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        for key in window.get_keys_pressed(KeyRepeat::No) {
            let count = harness.controls().len();
            match key {
                Key::Up if count > 0 => focused = focused.map(|i| (i + count - 1) % count),
                Key::Down if count > 0 => focused = focused.map(|i| (i + 1) % count),
                Key::Space => {
                    paused = !paused;
                    println!("animation {}", if paused { "paused" } else { "running" });
                }
                _ => {
                    let event = focused
                        .and_then(|i| harness.controls().get(i))
                        .and_then(|control| key_event(key, control));
                    if let Some(event) = event {
                        debug!(?key, "key event");
                        match harness.handle(event) {
                            Ok(lines) => print_lines(&lines),
                            Err(err) => println!("{}", err),
                        }
                    }
                }
            }
        }

        while console_open {
            match lines.try_recv() {
                Ok(line) => {
                    let reply = execute(harness, config, &line);
                    print_lines(&reply.lines);
                    if reply.quit {
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => console_open = false,
            }
        }

        if harness.is_animated() && !paused && last_tick.elapsed() >= interval {
            last_tick = Instant::now();
            if let Err(err) = harness.handle(Event::Tick) {
                println!("{}", err);
            }
        }

        if drawn != (harness.scene().revision, focused) {
            canvas = render_frame(harness, config, focused);
            drawn = (harness.scene().revision, focused);
        }
        window.update_with_buffer(&canvas.buffer, canvas.width, canvas.height)?;
    }

    info!("window closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demos::DemoKind;

    #[test]
    fn arrow_keys_map_to_nudges() {
        let slider = Control::slider("time", 0.1, 10.0, 0.1, 1.0);
        assert_eq!(key_event(Key::Right, &slider), Some(Event::Nudge { name: "time".into(), steps: 1 }));
        assert_eq!(key_event(Key::Enter, &slider), None);
        let button = Control::button("next");
        assert_eq!(key_event(Key::Enter, &button), Some(Event::Button("next".into())));
        assert_eq!(key_event(Key::Left, &button), None);
    }

    #[test]
    fn execute_reports_errors_without_changing_state() {
        let config = VizConfig::default();
        let mut harness = Harness::new(DemoKind::Universe.build(config.seed));
        let before = harness.scene().clone();

        let reply = execute(&mut harness, &config, "/set omega_m 2");
        assert_eq!(reply.lines, vec!["omega_m = 2 is outside [0, 1]".to_string()]);
        let reply = execute(&mut harness, &config, "/set omega_m");
        assert_eq!(reply.lines, vec!["usage: /set <slider> <value>".to_string()]);
        assert!(!reply.quit);
        assert_eq!(harness.scene(), &before);

        let reply = execute(&mut harness, &config, "/set omega_m 0.5");
        assert!(reply.lines[0].starts_with("Omega_lambda (Dark Energy): "));
        assert!(execute(&mut harness, &config, "/quit").quit);
    }

    #[test]
    fn export_failures_are_reported_as_export_errors() {
        let json = serde_json::from_str::<u8>("x").unwrap_err();
        assert!(Error::Export(json).to_string().starts_with("dataset export failed: "));

        let config = VizConfig::default();
        let mut harness = Harness::new(DemoKind::Knots.build(config.seed));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(matches!(export_dataset(&harness, &path), Err(Error::Io(_))));
        let reply = execute(&mut harness, &config, &format!("/export {}", path.display()));
        assert!(reply.lines[0].starts_with("error: io error: "));
    }

    #[test]
    fn tick_advances_rotation() {
        let config = VizConfig::default();
        let mut harness = Harness::new(DemoKind::TesseractRotation.build(config.seed));
        let reply = execute(&mut harness, &config, "/tick");
        assert!(reply.lines.is_empty());
        assert_eq!(harness.params().counter("frame"), 1);
    }
}
