//! Replay of recorded landmark streams.
//!
//! Landmark models are often run out of process (eg. a MediaPipe script printing its results),
//! which makes it convenient to record their output once and feed it back later. The recording
//! format is JSON Lines: one JSON object per camera frame, listing every detected hand.
//!
//! ```json
//! {"hands":[{"handedness":"Right","score":0.93,"landmarks":[[0.51,0.72],[0.48,0.66],...]}]}
//! {"hands":[]}
//! ```
//!
//! Blank lines are skipped and do not count as frames.

use std::{collections::VecDeque, fs::File, io::BufRead, io::BufReader, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::{
    hand::landmark::{HandLandmarker, HandLandmarks},
    image::Image,
};

#[derive(Deserialize)]
struct Frame {
    hands: Vec<HandLandmarks>,
}

/// A [`HandLandmarker`] that returns recorded results, one frame per call to `detect`.
///
/// Once all frames have been returned, every further call reports no hands.
#[derive(Debug, Default)]
pub struct ReplayLandmarker {
    frames: VecDeque<Vec<HandLandmarks>>,
}

impl ReplayLandmarker {
    /// Loads a recording from the file system.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open landmark recording '{}'", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to load landmark recording '{}'", path.display()))
    }

    /// Parses a recording from a buffered reader.
    ///
    /// Every hand must pass [`HandLandmarks::validate`].
    pub fn from_reader<R: BufRead>(reader: R) -> anyhow::Result<Self> {
        let mut frames = VecDeque::new();
        for (i, line) in reader.lines().enumerate() {
            let lineno = i + 1;
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let frame: Frame = serde_json::from_str(&line)
                .with_context(|| format!("invalid frame on line {lineno}"))?;
            for (i, hand) in frame.hands.iter().enumerate() {
                hand.validate()
                    .with_context(|| format!("invalid hand #{i} on line {lineno}"))?;
            }
            frames.push_back(frame.hands);
        }

        log::debug!("loaded landmark recording with {} frames", frames.len());
        Ok(Self { frames })
    }

    /// Returns the number of frames that have not been replayed yet.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

impl HandLandmarker for ReplayLandmarker {
    fn detect(&mut self, image: &Image) -> anyhow::Result<Vec<HandLandmarks>> {
        let hands = self.frames.pop_front().unwrap_or_default();
        log::trace!("replaying {} hands for {:?}", hands.len(), image);
        Ok(hands)
    }
}
