//! Guide overlay flows driven through remote keys and ticks.

use std::time::{Duration, Instant};

use tuner_core::{
    AxisKey, CarouselEventKind, GuideController, GuideEffect, PagingState, RemoteKey,
    RuntimeConfig, VisibilityState,
};
use tuner_model::{CarouselItem, ItemId};

#[path = "support/mod.rs"]
mod support;

use support::{Recorder, channels, programs};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn only_fetch(effects: &[GuideEffect]) -> (tuner_core::FetchTicket, ItemId) {
    match effects {
        [GuideEffect::FetchPrograms { ticket, channel }] => (*ticket, channel.clone()),
        other => panic!("expected a single program fetch, got {other:?}"),
    }
}

/// Guide with 30 channels (`id-0` playing) and its programs loaded.
fn loaded_guide(t0: Instant) -> GuideController {
    let mut guide = GuideController::default();
    let (ticket, channel) = only_fetch(&guide.set_channels(channels(30, Some(0))));
    assert_eq!(channel.as_str(), "id-0");
    assert!(guide.programs_loaded(ticket, &channel, programs("id-0", 0, 24, Some(12)), t0));
    guide
}

fn show_overlay(guide: &mut GuideController, now: Instant) {
    guide.handle_key(RemoteKey::Down, now);
    assert_eq!(guide.program_bar().state(), VisibilityState::HintVisible);
    assert_eq!(guide.channel_stack().state(), VisibilityState::Gone);
    guide.handle_key(RemoteKey::Down, now);
    assert!(guide.program_bar().is_fully_visible());
    assert!(guide.channel_stack().is_fully_visible());
}

#[test]
fn initial_programs_anchor_on_the_airing_program() {
    let t0 = Instant::now();
    let guide = loaded_guide(t0);
    assert_eq!(guide.programs().focus_index(), Some(12));
    assert_eq!(guide.programs().commit_index(), Some(12));
    assert_eq!(guide.programs_channel().map(ItemId::as_str), Some("id-0"));
    assert!(!guide.is_awaiting_programs());
}

#[test]
fn up_is_ignored_while_the_stack_is_hidden() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);
    guide.handle_key(RemoteKey::Up, t0);
    assert_eq!(guide.channels().focused_item().map(|c| c.number), Some(0));
    assert!(guide.tick(t0 + ms(500)).is_empty());
}

#[test]
fn channel_focus_fetch_is_debounced() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);
    show_overlay(&mut guide, t0);

    guide.handle_key(RemoteKey::Down, t0);
    guide.handle_key(RemoteKey::Down, t0 + ms(150));
    assert!(guide.tick(t0 + ms(300)).is_empty());

    let (_, channel) = only_fetch(&guide.tick(t0 + ms(350)));
    assert_eq!(channel.as_str(), "id-2");
    assert!(guide.tick(t0 + ms(1_000)).is_empty());
}

#[test]
fn stale_program_responses_are_dropped() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);
    show_overlay(&mut guide, t0);

    guide.handle_key(RemoteKey::Down, t0);
    let (first, first_channel) = only_fetch(&guide.tick(t0 + ms(200)));
    guide.handle_key(RemoteKey::Down, t0 + ms(250));
    let (second, second_channel) = only_fetch(&guide.tick(t0 + ms(450)));

    assert!(!guide.programs_loaded(first, &first_channel, programs("id-1", 0, 24, None), t0));
    assert_eq!(guide.programs_channel().map(ItemId::as_str), Some("id-0"));
    assert!(guide.programs_loaded(second, &second_channel, programs("id-2", 0, 24, None), t0));
    assert_eq!(guide.programs_channel().map(ItemId::as_str), Some("id-2"));
    // Browsing another channel's programs starts from the middle.
    assert_eq!(guide.programs().focus_index(), Some(12));
}

#[test]
fn auto_hide_restores_the_playing_channel() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);
    show_overlay(&mut guide, t0);
    guide.handle_key(RemoteKey::Down, t0 + ms(10));
    guide.tick(t0 + ms(210));
    assert_eq!(guide.channels().focused_item().map(|c| c.number), Some(1));

    let idle = t0 + ms(10) + guide.config().auto_hide();
    assert!(guide.tick(idle - ms(1)).is_empty());
    assert!(guide.tick(idle).is_empty());
    assert!(guide.channel_stack().is_leaving());
    assert!(guide.program_bar().is_leaving());

    let (_, channel) = only_fetch(&guide.tick(idle + ms(200)));
    assert_eq!(channel.as_str(), "id-0");
    assert_eq!(guide.channel_stack().state(), VisibilityState::Gone);
    assert_eq!(guide.program_bar().state(), VisibilityState::Gone);
    assert!(guide.channels().is_committed_focused());
    assert_eq!(guide.channels().focused_item().map(|c| c.number), Some(0));
}

#[test]
fn key_during_fade_does_not_restore() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);
    show_overlay(&mut guide, t0);

    guide.handle_key(RemoteKey::Back, t0 + ms(100));
    assert!(guide.channel_stack().is_leaving());
    guide.handle_key(RemoteKey::Down, t0 + ms(150));
    assert!(guide.program_bar().is_fully_visible());
    assert!(guide.channel_stack().is_fully_visible());
    assert!(guide.tick(t0 + ms(400)).is_empty());
}

#[test]
fn channel_up_while_hidden_reveals_the_overlay_once_loaded() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);

    assert!(guide.handle_key(RemoteKey::ChannelUp, t0).is_empty());
    assert_eq!(guide.channels().committed_item().map(|c| c.number), Some(29));

    let (ticket, channel) = only_fetch(&guide.tick(t0));
    assert_eq!(channel.as_str(), "id-29");
    assert_eq!(guide.channel_stack().state(), VisibilityState::Gone);

    assert!(guide.programs_loaded(ticket, &channel, programs("id-29", 0, 24, Some(7)), t0));
    assert!(guide.program_bar().is_fully_visible());
    assert!(guide.channel_stack().is_fully_visible());
    assert_eq!(guide.programs().focus_index(), Some(7));
}

#[test]
fn program_bar_requests_and_merges_the_next_page() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);
    let threshold = RuntimeConfig::default().paging_trigger_threshold();
    let steps = 24 - 12 - 1 - threshold;

    for _ in 0..steps - 1 {
        assert!(guide.handle_key(RemoteKey::Right, t0).is_empty());
    }
    let effects = guide.handle_key(RemoteKey::Right, t0);
    let [
        GuideEffect::FetchProgramPage {
            ticket,
            channel,
            state,
            anchor,
        },
    ] = effects.as_slice()
    else {
        panic!("expected a page request, got {effects:?}");
    };
    assert_eq!(*state, PagingState::PagingEnd);
    assert_eq!(channel.as_str(), "id-0");
    assert_eq!(
        *anchor,
        guide.programs().focused_item().and_then(|p| p.start_at())
    );

    let focus = guide.programs().focused_item().map(|p| p.id.clone());
    assert!(guide.program_page_loaded(*ticket, channel, programs("id-0", 24, 12, None)));
    assert!(!guide.program_page_loaded(*ticket, channel, programs("id-0", 36, 12, None)));
    assert_eq!(guide.programs().len(), 36);
    assert_eq!(guide.programs().focused_item().map(|p| p.id.clone()), focus);
    assert_eq!(guide.programs().paging_state(), PagingState::None);
}

#[test]
fn select_commits_program_and_channel() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);
    let recorder = Recorder::attach(guide.bus_mut());
    show_overlay(&mut guide, t0);

    guide.handle_key(RemoteKey::Down, t0);
    let (ticket, channel) = only_fetch(&guide.tick(t0 + ms(200)));
    guide.programs_loaded(ticket, &channel, programs("id-1", 0, 24, None), t0);
    guide.handle_key(RemoteKey::Right, t0 + ms(300));
    recorder.take();

    guide.handle_key(RemoteKey::Select, t0 + ms(400));
    let commits: Vec<AxisKey> = recorder
        .take()
        .into_iter()
        .filter(|e| matches!(e.kind, CarouselEventKind::CommitChanged { .. }))
        .map(|e| e.axis)
        .collect();
    assert_eq!(commits, [AxisKey::ProgramBar, AxisKey::ChannelStack]);
    assert_eq!(guide.channels().committed_item().map(|c| c.number), Some(1));
    assert_eq!(guide.programs().commit_index(), Some(13));

    // Selecting the committed program again changes nothing.
    guide.handle_key(RemoteKey::Select, t0 + ms(500));
    assert!(recorder.take().is_empty());
}

#[test]
fn select_while_hinting_reveals_instead_of_committing() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);
    guide.handle_key(RemoteKey::Down, t0);
    guide.handle_key(RemoteKey::Right, t0);
    guide.handle_key(RemoteKey::Select, t0);

    assert!(guide.program_bar().is_fully_visible());
    assert_eq!(guide.programs().commit_index(), Some(12));
    assert!(!guide.programs().has_committed_since_setup());
}

#[test]
fn next_deadline_tracks_pending_work() {
    let t0 = Instant::now();
    let mut guide = loaded_guide(t0);
    assert_eq!(guide.next_deadline(), None);

    guide.handle_key(RemoteKey::Down, t0);
    assert_eq!(guide.next_deadline(), Some(t0 + guide.config().auto_hide()));
    guide.handle_key(RemoteKey::Back, t0 + ms(10));
    assert_eq!(
        guide.next_deadline(),
        Some(t0 + ms(10) + guide.config().fade_timings().fade_out)
    );
}
