//! ShutterBank + StatusIndicator ordering against a shared call trace.

use shutterctl::app::ports::UnitState;
use shutterctl::config::{ShutterConfig, SystemConfig};
use shutterctl::drivers::status_led::StatusIndicator;
use shutterctl::shutter::ShutterBank;

use super::mock_hw::{Call, MockIndicator, MockSurface, Trace, trace};

fn build(
    cfg: &SystemConfig,
    trace: &Trace,
) -> (ShutterBank<MockSurface>, StatusIndicator<MockIndicator>) {
    let bank = ShutterBank::from_config(&cfg.shutters, cfg.colours, |index, _| MockSurface {
        index,
        trace: trace.clone(),
    });
    let led = StatusIndicator::new(cfg.indicator, MockIndicator { trace: trace.clone() });
    (bank, led)
}

fn shutter_of(call: &Call) -> Option<usize> {
    match call {
        Call::Begin { shutter, .. } | Call::SetRange { shutter, .. } | Call::Commit { shutter } => {
            Some(*shutter)
        }
        _ => None,
    }
}

#[test]
fn init_all_starts_each_shutter_open_in_order() {
    let cfg = SystemConfig::default();
    let t = trace();
    let (mut bank, _led) = build(&cfg, &t);
    t.borrow_mut().clear();

    bank.init_all();

    let calls = t.borrow();
    let mut expected = Vec::new();
    for (i, s) in cfg.shutters.iter().enumerate() {
        expected.push(Call::Begin { shutter: i, units: s.capacity, channel: s.channel });
        expected.push(Call::SetRange { shutter: i, start: 0, count: s.capacity, state: UnitState::Open });
        expected.push(Call::Commit { shutter: i });
    }
    assert_eq!(*calls, expected);
}

#[test]
fn close_all_is_bracketed_by_status_signals() {
    let cfg = SystemConfig::default();
    let t = trace();
    let (mut bank, mut led) = build(&cfg, &t);
    bank.init_all();
    t.borrow_mut().clear();

    assert_eq!(bank.close_all(&mut led), 3);

    let calls = t.borrow();
    assert_eq!(calls.first(), Some(&Call::Show(cfg.colours.busy)));
    assert_eq!(calls.last(), Some(&Call::Show(cfg.colours.idle_closed)));

    // No status writes between the first and last shutter call.
    let inner = &calls[1..calls.len() - 1];
    assert!(inner.iter().all(|c| shutter_of(c).is_some()));

    // Shutters actuated strictly in index order.
    let order: Vec<usize> = inner.iter().filter_map(shutter_of).collect();
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(order, sorted);

    assert!(inner.contains(&Call::SetRange { shutter: 2, start: 0, count: 16, state: UnitState::Closed }));
}

#[test]
fn open_all_on_open_bank_still_signals() {
    let cfg = SystemConfig::default();
    let t = trace();
    let (mut bank, mut led) = build(&cfg, &t);
    bank.init_all();
    t.borrow_mut().clear();

    assert_eq!(bank.open_all(&mut led), 3);
    assert_eq!(
        *t.borrow(),
        vec![Call::Show(cfg.colours.busy), Call::Show(cfg.colours.idle_open)]
    );
}

#[test]
fn close_then_open_round_trips_every_shutter() {
    let cfg = SystemConfig::default();
    let t = trace();
    let (mut bank, mut led) = build(&cfg, &t);
    bank.init_all();

    bank.close_all(&mut led);
    assert!(bank.shutters().iter().all(|s| s.is_fully_closed()));
    bank.open_all(&mut led);
    assert!(bank.shutters().iter().all(|s| s.closed_units() == 0));
    assert_eq!(led.current_colour(), cfg.colours.idle_open);
}

#[test]
fn inert_shutter_keeps_books_but_never_touches_surface() {
    let mut cfg = SystemConfig::default();
    cfg.shutters[1] = ShutterConfig { channel: 200, capacity: 10 };
    let t = trace();
    let (mut bank, mut led) = build(&cfg, &t);

    bank.init_all();
    bank.close_all(&mut led);

    assert!(bank.shutters()[1].is_inert());
    assert_eq!(bank.shutters()[1].closed_units(), 10);
    assert!(t.borrow().iter().all(|c| shutter_of(c) != Some(1)));
    // The others still moved.
    assert!(t.borrow().iter().any(|c| shutter_of(c) == Some(2)));
}

#[test]
fn inert_indicator_does_not_block_the_bank() {
    let mut cfg = SystemConfig::default();
    cfg.indicator.blue_channel = 99;
    let t = trace();
    let (mut bank, mut led) = build(&cfg, &t);

    bank.init_all();
    assert_eq!(bank.close_all(&mut led), 3);
    assert!(led.is_inert());
    assert!(t.borrow().iter().all(|c| !matches!(c, Call::Show(_) | Call::Attach(_))));
    assert_eq!(led.current_colour(), cfg.colours.idle_closed);
}

#[test]
fn partial_moves_through_bank_access() {
    let cfg = SystemConfig::default();
    let t = trace();
    let (mut bank, _led) = build(&cfg, &t);
    bank.init_all();

    let s = bank.shutter_mut(0).unwrap();
    assert!(!s.close_count(3));
    assert!(!s.open_count(-1));
    assert_eq!(s.closed_units(), 3);
    assert!(s.open_count(10));
    assert_eq!(s.closed_units(), 0);
    assert!(bank.shutter_mut(7).is_none());
}
