//! Integration tests: host link → AppService → bank / sensor report.

use shutterctl::app::commands::Command;
use shutterctl::app::events::{AppEvent, Component};
use shutterctl::app::service::AppService;
use shutterctl::config::SystemConfig;
use shutterctl::error::CommsError;
use shutterctl::serial::command::{CommandId, ProtocolError};

use super::mock_hw::{
    Call, FixedAnalog, MockIndicator, MockSerial, MockSurface, NoDelay, RecordingSink, Trace, trace,
};

type App = AppService<MockSurface, MockIndicator>;

fn app(cfg: &SystemConfig, t: &Trace) -> App {
    AppService::new(cfg, MockIndicator { trace: t.clone() }, |index, _| MockSurface {
        index,
        trace: t.clone(),
    })
}

fn started(cfg: &SystemConfig, t: &Trace) -> App {
    let mut a = app(cfg, t);
    a.signal_booting();
    a.start(&mut RecordingSink::default());
    a
}

#[test]
fn boot_shows_booting_then_opens_everything() {
    let cfg = SystemConfig::default();
    let t = trace();
    let mut a = app(&cfg, &t);
    let mut sink = RecordingSink::default();

    a.signal_booting();
    a.start(&mut sink);

    let calls = t.borrow();
    let shows: Vec<&Call> = calls.iter().filter(|c| matches!(c, Call::Show(_))).collect();
    assert_eq!(
        shows,
        [
            &Call::Show(cfg.colours.booting),
            &Call::Show(cfg.colours.busy),
            &Call::Show(cfg.colours.idle_open),
        ]
    );
    assert!(a.bank().shutters().iter().all(|s| s.is_started() && s.is_fully_open()));
    assert_eq!(
        sink.events,
        vec![
            AppEvent::ShuttersOpened { fully_open: 3, total: 3 },
            AppEvent::Started { shutters: 3 },
        ]
    );
}

#[test]
fn inert_components_are_reported_at_start() {
    let mut cfg = SystemConfig::default();
    cfg.shutters[2].channel = 77;
    cfg.indicator.red_channel = 90;
    let t = trace();
    let mut a = app(&cfg, &t);
    let mut sink = RecordingSink::default();
    a.start(&mut sink);

    assert_eq!(
        &sink.events[..2],
        &[
            AppEvent::ComponentInert(Component::Shutter { index: 2, channel: 77 }),
            AppEvent::ComponentInert(Component::Indicator { channels: [90, 12, 13] }),
        ]
    );
    assert!(a.is_started());
}

#[test]
fn second_start_is_ignored() {
    let cfg = SystemConfig::default();
    let t = trace();
    let mut a = started(&cfg, &t);
    let mut sink = RecordingSink::default();
    a.start(&mut sink);
    assert!(sink.events.is_empty());
}

#[test]
fn close_command_closes_bank() {
    let cfg = SystemConfig::default();
    let t = trace();
    let mut a = started(&cfg, &t);
    let mut serial = MockSerial::new();
    let mut analog = FixedAnalog::new(&cfg, 0, 0);
    let mut sink = RecordingSink::default();

    serial.send("16\n");
    let cmd = a.tick(&mut serial, &mut analog, &mut NoDelay::default(), &mut sink);

    assert_eq!(cmd, Command::CloseAll);
    assert!(a.bank().shutters().iter().all(|s| s.is_fully_closed()));
    assert_eq!(a.indicator().current_colour(), cfg.colours.idle_closed);
    assert_eq!(
        sink.events,
        vec![
            AppEvent::CommandReceived(Command::CloseAll),
            AppEvent::ShuttersClosed { fully_closed: 3, total: 3 },
        ]
    );
    assert!(serial.tx.is_empty(), "shutter commands produce no host output");
}

#[test]
fn idle_cycle_does_nothing() {
    let cfg = SystemConfig::default();
    let t = trace();
    let mut a = started(&cfg, &t);
    t.borrow_mut().clear();
    let mut serial = MockSerial::new();
    let mut analog = FixedAnalog::new(&cfg, 0, 0);
    let mut sink = RecordingSink::default();

    let cmd = a.tick(&mut serial, &mut analog, &mut NoDelay::default(), &mut sink);

    assert_eq!(cmd, Command::None);
    assert!(t.borrow().is_empty());
    assert!(sink.events.is_empty());
    assert!(serial.tx.is_empty());
    assert_eq!(analog.reads, 0);
    assert_eq!(a.cycle_count(), 1);
}

#[test]
fn odd_code_is_reported_and_ignored() {
    let cfg = SystemConfig::default();
    let t = trace();
    let mut a = started(&cfg, &t);
    t.borrow_mut().clear();
    let mut serial = MockSerial::new();
    let mut analog = FixedAnalog::new(&cfg, 0, 0);
    let mut sink = RecordingSink::default();

    serial.send("7\n");
    let cmd = a.tick(&mut serial, &mut analog, &mut NoDelay::default(), &mut sink);

    assert_eq!(cmd, Command::None);
    assert_eq!(serial.output(), "ERROR: invalid value received... got '7'\n");
    assert!(matches!(
        sink.events.as_slice(),
        [AppEvent::ProtocolError(ProtocolError::InvalidValue(_))]
    ));
    assert!(t.borrow().is_empty());
}

#[test]
fn unmapped_even_code_is_echoed() {
    let cfg = SystemConfig::default();
    let t = trace();
    let mut a = started(&cfg, &t);
    let mut serial = MockSerial::new();
    let mut analog = FixedAnalog::new(&cfg, 0, 0);
    let mut sink = RecordingSink::default();

    serial.send("1000000\n");
    let cmd = a.tick(&mut serial, &mut analog, &mut NoDelay::default(), &mut sink);

    assert_eq!(cmd, Command::None);
    assert_eq!(serial.output(), "ERROR: unknown command id: 1000000\n");
    assert_eq!(
        sink.events,
        vec![AppEvent::ProtocolError(ProtocolError::UnknownCommand(CommandId::Value(1_000_000)))]
    );
}

#[test]
fn send_info_writes_sample_line() {
    let cfg = SystemConfig::default();
    let t = trace();
    let mut a = started(&cfg, &t);
    let mut serial = MockSerial::new();
    let mut analog = FixedAnalog::new(&cfg, 0, cfg.sensors.light.bright_raw);
    let mut sink = RecordingSink::default();

    serial.send("32\n");
    assert_eq!(
        a.tick(&mut serial, &mut analog, &mut NoDelay::default(), &mut sink),
        Command::SendInfo
    );
    assert_eq!(serial.output(), "-50.00;100.00\n");
    assert!(matches!(sink.events.last(), Some(AppEvent::SampleSent(_))));
}

#[test]
fn send_info_without_tx_space_writes_nothing() {
    let mut cfg = SystemConfig::default();
    cfg.serial.tx_max_polls = 1000;
    let t = trace();
    let mut a = started(&cfg, &t);
    let mut serial = MockSerial::new();
    serial.capacity = usize::from(cfg.serial.min_tx_free) - 1;
    let mut analog = FixedAnalog::new(&cfg, 0, 0);
    let mut sink = RecordingSink::default();
    let mut delay = NoDelay::default();

    serial.send("32\n");
    a.tick(&mut serial, &mut analog, &mut delay, &mut sink);

    assert!(serial.tx.is_empty());
    assert_eq!(analog.reads, 0, "no sampling before capacity");
    assert_eq!(sink.events.last(), Some(&AppEvent::SampleDropped(CommsError::TxTimeout)));
    assert!(delay.total_ns > 0);
}

#[test]
fn cancelled_report_is_dropped_once() {
    let cfg = SystemConfig::default();
    let t = trace();
    let mut a = started(&cfg, &t);
    let mut serial = MockSerial::new();
    let mut analog = FixedAnalog::new(&cfg, 0, 0);
    let mut sink = RecordingSink::default();

    a.cancel_flag().cancel();
    a.dispatch(Command::SendInfo, &mut serial, &mut analog, &mut NoDelay::default(), &mut sink);
    assert_eq!(sink.events.last(), Some(&AppEvent::SampleDropped(CommsError::TxCancelled)));
    assert!(serial.tx.is_empty());

    a.dispatch(Command::SendInfo, &mut serial, &mut analog, &mut NoDelay::default(), &mut sink);
    assert!(matches!(sink.events.last(), Some(AppEvent::SampleSent(_))));
}

#[test]
fn one_command_per_cycle() {
    let cfg = SystemConfig::default();
    let t = trace();
    let mut a = started(&cfg, &t);
    let mut serial = MockSerial::new();
    let mut analog = FixedAnalog::new(&cfg, 0, 0);
    let mut sink = RecordingSink::default();
    let mut delay = NoDelay::default();

    serial.send("16 8 16\n");
    let seen: Vec<Command> = (0..4)
        .map(|_| a.tick(&mut serial, &mut analog, &mut delay, &mut sink))
        .collect();
    assert_eq!(
        seen,
        [Command::CloseAll, Command::OpenAll, Command::CloseAll, Command::None]
    );
    assert!(a.bank().shutters().iter().all(|s| s.is_fully_closed()));
}

#[test]
fn custom_codes_are_honoured() {
    let mut cfg = SystemConfig::default();
    cfg.commands.open_all = 2;
    cfg.commands.close_all = 4;
    cfg.commands.send_info = 6;
    let t = trace();
    let mut a = started(&cfg, &t);
    let mut serial = MockSerial::new();
    let mut analog = FixedAnalog::new(&cfg, 0, 0);
    let mut sink = RecordingSink::default();

    serial.send("4\n8\n");
    let mut delay = NoDelay::default();
    assert_eq!(a.tick(&mut serial, &mut analog, &mut delay, &mut sink), Command::CloseAll);
    assert_eq!(a.tick(&mut serial, &mut analog, &mut delay, &mut sink), Command::None);
    assert_eq!(serial.output(), "ERROR: unknown command id: 8\n");
}
