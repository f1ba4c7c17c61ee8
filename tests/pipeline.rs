use approx::assert_abs_diff_eq;
use gesture_mouse::{
    config::Config,
    controller::GestureController,
    cursor::{CursorError, CursorPos, CursorSink, ScreenBounds},
    hand::{
        features::Finger,
        landmark::{HandLandmarker, HandLandmarks, Handedness},
        replay::ReplayLandmarker,
    },
    image::{Color, Image},
    resolution::Resolution,
};

#[derive(Default)]
struct Recorder(Vec<CursorPos>);

impl CursorSink for Recorder {
    fn move_to(&mut self, pos: CursorPos) -> Result<(), CursorError> {
        self.0.push(pos);
        Ok(())
    }
}

/// One recorded frame with a pointing right hand whose index fingertip is at pixel `(x, y)` of a
/// 640x480 frame.
fn pointing_frame(x: u32, y: u32) -> String {
    let mut points = vec![[0.5f32, 0.9f32]; 21];
    // index finger PIP below the tip
    points[6] = [0.5, 0.8];
    points[8] = [(x as f32 + 0.5) / 640.0, (y as f32 + 0.5) / 480.0];
    let points = points
        .iter()
        .map(|[x, y]| format!("[{x},{y}]"))
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"hands":[{{"handedness":"Right","score":0.97,"landmarks":[{points}]}}]}}"#)
}

fn recording(frames: &[Option<(u32, u32)>]) -> ReplayLandmarker {
    let data = frames
        .iter()
        .map(|frame| match frame {
            Some((x, y)) => pointing_frame(*x, *y),
            None => r#"{"hands":[]}"#.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    ReplayLandmarker::from_reader(data.as_bytes()).unwrap()
}

#[test]
fn replay_converges_to_pointed_position() {
    let mut landmarker = recording(&vec![Some((320, 140)); 120]);
    let config = Config {
        draw: false,
        ..Config::default()
    };
    let mut controller = GestureController::new(config, Recorder::default()).unwrap();

    let mut image = Image::from_resolution(Resolution::VGA);
    while !landmarker.is_exhausted() {
        let report = controller.track(&mut landmarker, &mut image).unwrap();
        let hand = report.hand.expect("hand should be visible in every frame");
        assert!(hand.fingers.is_up(Finger::Index));
        assert!(!hand.fingers.is_up(Finger::Middle));
    }

    let pos = controller.cursor_state().position();
    assert_abs_diff_eq!(pos.x, 960.0, epsilon = 0.01);
    assert_abs_diff_eq!(pos.y, 540.0, epsilon = 0.01);
    assert_eq!(controller.into_sink().0.len(), 120);
}

#[test]
fn frames_without_hands_do_not_move_the_cursor() {
    let mut landmarker = recording(&[Some((540, 280)), None, None, Some((540, 280))]);
    let config = Config {
        cursor: gesture_mouse::cursor::CursorConfig {
            smoothing: 1,
            ..Default::default()
        },
        draw: false,
        ..Config::default()
    };
    let mut controller = GestureController::new(config, Recorder::default()).unwrap();
    let mut image = Image::from_resolution(Resolution::VGA);

    let mut visible = Vec::new();
    while !landmarker.is_exhausted() {
        let report = controller.track(&mut landmarker, &mut image).unwrap();
        visible.push(report.hand.is_some());
    }

    assert_eq!(visible, [true, false, false, true]);
    assert_eq!(
        controller.into_sink().0,
        [CursorPos::new(1920.0, 1080.0), CursorPos::new(1920.0, 1080.0)]
    );
}

#[test]
fn off_screen_positions_are_rejected_but_tracking_continues() {
    // Pointing at the bottom right corner of the camera frame extrapolates past the screen.
    let mut landmarker = recording(&[Some((639, 479)), Some((639, 479)), Some((320, 140))]);
    let config = Config {
        cursor: gesture_mouse::cursor::CursorConfig {
            smoothing: 1,
            ..Default::default()
        },
        draw: false,
        ..Config::default()
    };
    let screen = config.cursor.screen;
    let sink = ScreenBounds::new(Recorder::default(), screen);
    let mut controller = GestureController::new(config, sink).unwrap();
    let mut image = Image::from_resolution(Resolution::VGA);

    let mut results = Vec::new();
    while !landmarker.is_exhausted() {
        let report = controller.track(&mut landmarker, &mut image).unwrap();
        results.push(report.hand.unwrap().moved);
    }

    assert!(matches!(results[0], Err(CursorError::OutOfBounds { .. })));
    assert!(matches!(results[1], Err(CursorError::OutOfBounds { .. })));
    assert_eq!(results[2], Ok(()));
    let moves = controller.into_sink().into_inner().0;
    assert_eq!(moves.len(), 1);
    assert_abs_diff_eq!(moves[0].x, 960.0, epsilon = 1e-3);
    assert_abs_diff_eq!(moves[0].y, 540.0, epsilon = 1e-3);
}

#[test]
fn overlays_are_drawn_on_the_mirrored_frame() {
    let mut landmarker = recording(&[Some((200, 100))]);
    let mut controller = GestureController::new(Config::default(), Recorder::default()).unwrap();

    let mut image = Image::from_resolution(Resolution::VGA);
    image.clear(Color::BLACK);
    image.set(0, 479, Color::WHITE);
    controller.track(&mut landmarker, &mut image).unwrap();

    // mirrored before drawing
    assert_eq!(image.get(639, 479), Color::WHITE);
    assert_eq!(image.get(0, 479), Color::BLACK);
    // fingertip circle
    assert_eq!(image.get(200, 100), Color::MAGENTA);
}

#[test]
fn missing_recording_is_an_error() {
    let err = ReplayLandmarker::open("does/not/exist.jsonl").unwrap_err();
    assert!(format!("{err:#}").contains("does/not/exist.jsonl"));
}

#[test]
fn demo_recording() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/sweep.jsonl");
    let mut landmarker = ReplayLandmarker::open(path).unwrap();
    assert_eq!(landmarker.remaining(), 40);

    let mut controller = GestureController::new(Config::default(), Recorder::default()).unwrap();
    let mut image = Image::from_resolution(Resolution::VGA);
    let mut visible = 0;
    while !landmarker.is_exhausted() {
        let report = controller.track(&mut landmarker, &mut image).unwrap();
        if let Some(hand) = report.hand {
            visible += 1;
            assert_eq!(format!("{:?}", hand.fingers), "11000");
            assert_eq!(hand.fingers.count(), 2);
        }
    }
    assert_eq!(visible, 36);

    // The fingertip sweeps to the right, so the cursor does too.
    let moves = controller.into_sink().0;
    assert_eq!(moves.len(), 36);
    assert!(moves.windows(2).all(|w| w[1].x > w[0].x));
}

/// Landmarker that reports a hand with the index fingertip far to the right of the frame.
struct Runaway;

impl HandLandmarker for Runaway {
    fn detect(&mut self, _image: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
        let mut points = vec![[0.5, 0.5]; 21];
        points[8] = [1e10, 0.5];
        Ok(vec![HandLandmarks::new(Handedness::Right, 1.0, points)])
    }
}

#[test]
fn runaway_landmarks_do_not_stop_tracking() {
    let mut controller = GestureController::new(Config::default(), Recorder::default()).unwrap();
    let mut image = Image::from_resolution(Resolution::VGA);
    for _ in 0..3 {
        let report = controller.track(&mut Runaway, &mut image).unwrap();
        assert_eq!(report.hands, 1);
        assert!(report.hand.is_none());
    }
    assert!(controller.into_sink().0.is_empty());
}
