//! Integration tests for HeartbeatToggle

mod common;
use common::*;

use strike_clock::heartbeat::{BEAT_INTERVAL, BEEP, BEEP_OFFSET, DUB, DUB_OFFSET, LUB};
use strike_clock::{HeartbeatToggle, Millis, ServiceTiming, Timestamp, Tone, ToneSynth};

#[derive(Default)]
struct Speaker {
    muted: bool,
    played: Vec<(Tone, Millis)>,
}

impl ToneSynth for Speaker {
    fn play(&mut self, tone: &Tone, offset: Millis) {
        self.played.push((*tone, offset));
    }

    fn is_running(&self) -> bool {
        !self.muted
    }
}

#[test]
fn enabled_heartbeat_plays_lub_dub_every_interval() {
    let timer = MockTimeSource::new();
    let mut heartbeat = HeartbeatToggle::<Timestamp, _>::new(&timer);
    let mut speaker = Speaker::default();
    let mut never = || false;

    assert_eq!(heartbeat.enable(), ServiceTiming::Delay(BEAT_INTERVAL));

    for _ in 0..3 {
        timer.advance(BEAT_INTERVAL.0);
        let timing = heartbeat.service(&mut speaker, &mut never);
        assert_eq!(timing, ServiceTiming::Delay(BEAT_INTERVAL));
    }

    assert_eq!(speaker.played.len(), 6);
    assert_eq!(speaker.played[0], (LUB, Millis(0)));
    assert_eq!(speaker.played[1], (DUB, DUB_OFFSET));
}

#[test]
fn beep_follows_the_roll() {
    let timer = MockTimeSource::new();
    let mut heartbeat = HeartbeatToggle::<Timestamp, _>::new(&timer);
    let mut speaker = Speaker::default();
    let mut rolls = [true, false, true].into_iter();
    let mut chance = move || rolls.next().unwrap_or(false);

    heartbeat.enable();
    for _ in 0..3 {
        timer.advance(BEAT_INTERVAL.0);
        heartbeat.service(&mut speaker, &mut chance);
    }

    let beeps: Vec<Millis> = speaker
        .played
        .iter()
        .filter(|(tone, _)| *tone == BEEP)
        .map(|(_, offset)| *offset)
        .collect();
    assert_eq!(beeps, [BEEP_OFFSET, BEEP_OFFSET]);
    assert_eq!(speaker.played.len(), 8);
}

#[test]
fn suspended_backend_drops_beats() {
    let timer = MockTimeSource::new();
    let mut heartbeat = HeartbeatToggle::<Timestamp, _>::new(&timer);
    let mut speaker = Speaker {
        muted: true,
        ..Speaker::default()
    };
    let mut always = || true;

    heartbeat.enable();
    timer.advance(BEAT_INTERVAL.0);
    heartbeat.service(&mut speaker, &mut always);
    assert!(speaker.played.is_empty());

    speaker.muted = false;
    timer.advance(BEAT_INTERVAL.0);
    heartbeat.service(&mut speaker, &mut always);
    assert_eq!(speaker.played.len(), 3);
}

#[test]
fn toggle_off_stops_scheduling() {
    let timer = MockTimeSource::new();
    let mut heartbeat = HeartbeatToggle::<Timestamp, _>::new(&timer);
    let mut speaker = Speaker::default();
    let mut never = || false;

    assert!(heartbeat.toggle());
    assert!(!heartbeat.toggle());

    timer.advance(10 * BEAT_INTERVAL.0);
    assert_eq!(
        heartbeat.service(&mut speaker, &mut never),
        ServiceTiming::Complete
    );
    assert!(speaker.played.is_empty());
}

#[test]
fn late_host_plays_one_beat_and_stays_on_the_grid() {
    let timer = MockTimeSource::new();
    let mut heartbeat = HeartbeatToggle::<Timestamp, _>::new(&timer);
    let mut speaker = Speaker::default();
    let mut never = || false;

    heartbeat.enable();
    // Three and a bit intervals late.
    timer.advance(3 * BEAT_INTERVAL.0 + 100);
    let timing = heartbeat.service(&mut speaker, &mut never);

    assert_eq!(speaker.played.len(), 2);
    assert_eq!(timing, ServiceTiming::Delay(Millis(BEAT_INTERVAL.0 - 100)));
}
