//! In-memory stand-in for a channel line-up and program schedule.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, DurationRound, Utc};
use tuner_core::PagingState;
use tuner_model::{Channel, ItemId, Program};

/// Length of one program slot.
const SLOT_MINUTES: i64 = 30;

/// Generates channels `id-<n>` and half-hour programs around a fixed "now".
#[derive(Debug, Clone)]
pub struct FakeSource {
    channel_count: u32,
    playing: u32,
    programs_per_fetch: usize,
    now: DateTime<Utc>,
    /// Channels read from a line-up file, replacing the generated ones.
    lineup: Option<Vec<Channel>>,
}

impl FakeSource {
    pub fn new(channel_count: u32, playing: u32, programs_per_fetch: usize, now: DateTime<Utc>) -> Self {
        Self {
            channel_count,
            playing: playing.min(channel_count.saturating_sub(1)),
            programs_per_fetch: programs_per_fetch.max(1),
            now,
            lineup: None,
        }
    }

    /// Serve `channels` instead of the generated `id-<n>` line-up.
    pub fn with_lineup(mut self, channels: Vec<Channel>) -> Self {
        self.lineup = Some(channels);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The line-up, generated or loaded.
    pub fn channels(&self) -> Vec<Channel> {
        if let Some(lineup) = &self.lineup {
            return lineup.clone();
        }
        (0..self.channel_count)
            .map(|n| {
                Channel::new(format!("id-{n}"), n)
                    .with_image(format!("https://picsum.photos/id/1{n}/200/300"))
                    .playing(n == self.playing)
            })
            .collect()
    }

    /// Programs for `channel` centred on the slot airing now.
    pub fn programs(&self, channel: &ItemId) -> Vec<Program> {
        let slot = Duration::minutes(SLOT_MINUTES);
        let current = self.now.duration_trunc(slot).unwrap_or(self.now);
        let before = (self.programs_per_fetch / 2) as i32;
        let first = current - slot * before;
        self.schedule(channel, first, self.programs_per_fetch)
    }

    /// The page adjoining `edge`: the programs ending at `edge` for
    /// `PagingStart`, the programs starting at `edge` for `PagingEnd`.
    pub fn page(&self, channel: &ItemId, state: PagingState, edge: DateTime<Utc>) -> Vec<Program> {
        let count = self.programs_per_fetch;
        match state {
            PagingState::PagingStart => {
                let first = edge - Duration::minutes(SLOT_MINUTES) * count as i32;
                self.schedule(channel, first, count)
            }
            PagingState::PagingEnd => self.schedule(channel, edge, count),
            PagingState::None => self.programs(channel),
        }
    }

    fn schedule(&self, channel: &ItemId, first: DateTime<Utc>, count: usize) -> Vec<Program> {
        let slot = Duration::minutes(SLOT_MINUTES);
        (0..count)
            .map(|i| {
                let start = first + slot * i as i32;
                let end = start + slot;
                let ordinal = start.timestamp() / slot.num_seconds();
                Program::new(
                    format!("{channel}/{}", start.format("%Y%m%dT%H%M")),
                    format!("{channel} {}", start.format("%H:%M")),
                    ordinal,
                )
                .with_window(start, end)
                .playing(start <= self.now && self.now < end)
            })
            .collect()
    }
}

/// Read a JSON array of channels.
pub fn load_lineup(path: &Path) -> Result<Vec<Channel>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read channel line-up {}", path.display()))?;
    let channels: Vec<Channel> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid channel line-up {}", path.display()))?;
    if channels.is_empty() {
        bail!("channel line-up {} lists no channels", path.display());
    }
    Ok(channels)
}
