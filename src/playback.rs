//! Replay of a written artifact
//!
//! Rebuilds per-agent trajectories from the interval records and steps a
//! frame cursor over them. A frame index addresses records, so frame `n`
//! shows every point contributed by the first `n + 1` records.

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::Result;
use crate::core::types::{AgentId, AgentState, WorldSnapshot};
use crate::store::Interval;

pub type Records = Vec<Interval<WorldSnapshot>>;

/// Parse an artifact document
pub fn parse_artifact(content: &str) -> Result<Records> {
    Ok(serde_json::from_str(content)?)
}

pub fn load_artifact(path: &Path) -> Result<Records> {
    let content = std::fs::read_to_string(path)?;
    parse_artifact(&content)
}

/// Ordered states of one agent with the record each came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub frames: Vec<usize>,
    pub states: Vec<AgentState>,
}

impl Track {
    pub fn xs(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.y).collect()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Newest state recorded at or before `frame`
    pub fn state_at(&self, frame: usize) -> Option<&AgentState> {
        let count = self.frames.partition_point(|&f| f <= frame);
        count.checked_sub(1).map(|i| &self.states[i])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectories {
    tracks: BTreeMap<AgentId, Track>,
}

impl Trajectories {
    pub fn from_records(records: &[Interval<WorldSnapshot>]) -> Self {
        let mut tracks: BTreeMap<AgentId, Track> = BTreeMap::new();
        for (frame, record) in records.iter().enumerate() {
            for (id, state) in record.value() {
                let track = tracks.entry(*id).or_default();
                track.frames.push(frame);
                track.states.push(*state);
            }
        }
        Self { tracks }
    }

    pub fn get(&self, id: AgentId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.tracks.keys().copied()
    }

    /// Extent of every recorded position, `None` when nothing was recorded
    pub fn bounds(&self) -> Option<Bounds> {
        let mut points = self.tracks.values().flat_map(|t| t.states.iter());
        let first = points.next()?;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(points.fold(init, |b, s| Bounds {
            min_x: b.min_x.min(s.x),
            max_x: b.max_x.max(s.x),
            min_y: b.min_y.min(s.y),
            max_y: b.max_y.max(s.y),
        }))
    }

    /// Every track cut to its first `index + 1` points
    pub fn visible(&self, index: usize) -> BTreeMap<AgentId, &[AgentState]> {
        self.tracks
            .iter()
            .map(|(id, track)| {
                let end = (index + 1).min(track.states.len());
                (*id, &track.states[..end])
            })
            .collect()
    }
}

/// Frame cursor over `0..=max_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    index: usize,
    max_index: usize,
    playing: bool,
}

impl Playback {
    /// Cursor for an artifact with `frame_count` records
    pub fn new(frame_count: usize) -> Self {
        Self {
            index: 0,
            max_index: frame_count.saturating_sub(1),
            playing: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Start playing; a finished playback starts over
    pub fn play(&mut self) {
        if self.index >= self.max_index {
            self.reset();
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn reset(&mut self) {
        self.playing = false;
        self.index = 0;
    }

    pub fn skip_to_end(&mut self) {
        self.playing = false;
        self.index = self.max_index;
    }

    pub fn step_forward(&mut self) {
        self.index = (self.index + 1).min(self.max_index);
    }

    pub fn step_back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn seek(&mut self, index: usize) {
        self.index = index.min(self.max_index);
    }

    /// Advance one frame while playing. Stops at the last frame.
    pub fn tick(&mut self) -> bool {
        if !self.playing {
            return false;
        }
        if self.index >= self.max_index {
            self.playing = false;
            return false;
        }
        self.index += 1;
        true
    }
}
