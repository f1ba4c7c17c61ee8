//! Replays a recorded landmark stream through the gesture controller.
//!
//! Usage: `gesture-mouse <landmarks.jsonl> [annotated.png]`
//!
//! Every recorded frame is processed like a live camera frame. Cursor movements are logged instead
//! of being sent to the OS. If an output path is given, the overlays of the last frame are written
//! to it.

use std::{env, path::PathBuf, process};

use anyhow::Context;
use gesture_mouse::{
    config::Config,
    controller::GestureController,
    cursor::{LogCursor, ScreenBounds},
    hand::replay::ReplayLandmarker,
    image::{Color, Image},
};

fn main() -> Result<(), gesture_mouse::Error> {
    gesture_mouse::init_logger!();

    let mut args = env::args_os().skip(1);
    let (recording, output) = match (args.next(), args.next(), args.next()) {
        (Some(recording), output, None) => (PathBuf::from(recording), output.map(PathBuf::from)),
        _ => {
            eprintln!("usage: gesture-mouse <landmarks.jsonl> [annotated.png]");
            process::exit(2);
        }
    };

    let config = Config::from_env().context("invalid configuration")?;
    let camera = config.cursor.camera;
    let sink = ScreenBounds::new(LogCursor, config.cursor.screen);
    let mut controller = GestureController::new(config, sink)?;
    let mut landmarker = ReplayLandmarker::open(&recording)?;

    // There is no camera image, so landmarks are drawn on a blank frame.
    let mut image = Image::from_resolution(camera);
    let (mut frames, mut tracked) = (0, 0);
    while !landmarker.is_exhausted() {
        image.clear(Color::BLACK);
        let report = controller.track(&mut landmarker, &mut image)?;
        frames += 1;
        if report.hand.is_some() {
            tracked += 1;
        }
    }

    log::info!(
        "replayed {} frames, hand visible in {}, final cursor position {}",
        frames,
        tracked,
        controller.cursor_state().position(),
    );

    if let Some(path) = output {
        image.save(&path)?;
        log::info!("wrote last frame to {}", path.display());
    }

    Ok(())
}
