//! Shared fixtures for tuner-core integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tuner_core::{CarouselEvent, EventBus};
use tuner_model::{Channel, Program};

/// Start of the fixture schedule.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 11, 29, 18, 0, 0).unwrap()
}

/// `n` channels `id-0..id-n`, with `playing` tuned in.
pub fn channels(n: u32, playing: Option<u32>) -> Vec<Channel> {
    (0..n)
        .map(|i| Channel::new(format!("id-{i}"), i).playing(Some(i) == playing))
        .collect()
}

/// Half-hour programs for `channel` starting `first_slot` slots after the
/// epoch; `playing` is a slot number.
pub fn programs(channel: &str, first_slot: i64, n: i64, playing: Option<i64>) -> Vec<Program> {
    (first_slot..first_slot + n)
        .map(|slot| {
            let start = epoch() + Duration::minutes(30 * slot);
            Program::new(
                format!("{channel}/{slot}"),
                format!("{channel} show {slot}"),
                slot,
            )
            .with_window(start, start + Duration::minutes(30))
            .playing(Some(slot) == playing)
        })
        .collect()
}

/// Records every event a bus emits.
#[derive(Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<CarouselEvent>>>);

impl Recorder {
    pub fn attach(bus: &mut EventBus) -> Self {
        let recorder = Self::default();
        let sink = Rc::clone(&recorder.0);
        bus.subscribe(move |event: &CarouselEvent| sink.borrow_mut().push(event.clone()));
        recorder
    }

    pub fn take(&self) -> Vec<CarouselEvent> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.take().iter().map(|e| e.kind.name()).collect()
    }
}
