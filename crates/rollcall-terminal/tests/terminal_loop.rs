//! Integration tests for the terminal loop
//!
//! The loop runs on a paused clock against a mock reader, a scripted
//! reporter and a mock indicator, so scan timing is exact.

use rollcall_core::{CardIdentifier, SessionState};
use rollcall_hardware::LedColor;
use rollcall_hardware::mock::{MockIndicator, MockIndicatorHandle, MockReader, MockReaderHandle};
use rollcall_network::mock::{MockReporter, MockReporterHandle};
use rollcall_terminal::{
    DedupPolicy, DeviceState, FeedbackConfig, FeedbackIndicator, ScanPipeline, Terminal,
    TerminalConfig,
};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{Instant, sleep};

type TestTerminal = Terminal<MockReader, MockReporter, MockIndicator>;

struct Rig {
    terminal: TestTerminal,
    cards: MockReaderHandle,
    service: MockReporterHandle,
    lamp: MockIndicatorHandle,
}

fn rig(latency: Duration, cooldown: Duration) -> Rig {
    let (reader, cards) = MockReader::new();
    let (reporter, service) = MockReporter::with_latency(latency);
    let (indicator, lamp) = MockIndicator::new();

    let pipeline = ScanPipeline::new(
        reporter,
        FeedbackIndicator::new(indicator, FeedbackConfig::default()),
        DeviceState::new(DedupPolicy::LastReported),
    );

    let terminal = Terminal::new(
        reader,
        pipeline,
        TerminalConfig {
            poll_interval: Duration::from_millis(10),
            scan_cooldown: cooldown,
        },
    )
    .unwrap();

    Rig {
        terminal,
        cards,
        service,
        lamp,
    }
}

/// A card presented while a scan is in flight is missed and counted
#[tokio::test(start_paused = true)]
async fn test_card_during_scan_is_missed() {
    let Rig {
        mut terminal,
        mut cards,
        service,
        lamp: _lamp,
    } = rig(Duration::from_millis(500), Duration::from_millis(200));
    service.respond(200, "Attendance marked successfully.");
    service.respond(200, "Attendance marked successfully.");

    let (stop, stopped) = oneshot::channel::<()>();

    let driver = async move {
        cards.present_card(vec![0x0A, 0x01]).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        cards.present_card(vec![0x0B, 0x02]).await.unwrap();
        sleep(Duration::from_secs(2)).await;
        cards.present_card(vec![0x0C, 0x03]).await.unwrap();
        sleep(Duration::from_secs(2)).await;
        let _ = stop.send(());
        cards
    };

    let (stats, _cards) = tokio::join!(
        terminal.run_until(async {
            let _ = stopped.await;
        }),
        driver
    );

    assert_eq!(stats.cards_read, 2);
    assert_eq!(stats.missed, 1);
    assert_eq!(stats.reported, 2);
    assert_eq!(
        service.submitted(),
        vec![
            CardIdentifier::normalize(&[0x0A, 0x01]),
            CardIdentifier::normalize(&[0x0C, 0x03])
        ]
    );
}

/// Shutdown stops polling but lets the in-flight scan finish
#[tokio::test(start_paused = true)]
async fn test_shutdown_waits_for_in_flight_scan() {
    let Rig {
        mut terminal,
        mut cards,
        service,
        lamp,
    } = rig(Duration::from_millis(500), Duration::ZERO);
    service.respond(201, "Admin session started successfully.");

    let (stop, stopped) = oneshot::channel::<()>();
    let started = Instant::now();

    let driver = async move {
        cards.present_card(vec![0x04, 0xA1]).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        let _ = stop.send(());
        cards
    };

    let (stats, _cards) = tokio::join!(
        terminal.run_until(async {
            let _ = stopped.await;
        }),
        driver
    );

    // Request latency plus the long session signal
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert_eq!(stats.reported, 1);
    assert_eq!(stats.sessions_started, 1);
    assert_eq!(lamp.current(), LedColor::Blue);

    let pipeline = terminal.pipeline().expect("pipeline returned after the scan");
    assert_eq!(pipeline.state().session_state(), SessionState::Active);
}

/// Nothing in flight: shutdown returns at once with the idle display shown
#[tokio::test(start_paused = true)]
async fn test_shutdown_when_idle() {
    let Rig {
        mut terminal,
        cards: _cards,
        service,
        lamp,
    } = rig(Duration::ZERO, Duration::ZERO);

    let started = Instant::now();
    let stats = terminal
        .run_until(sleep(Duration::from_millis(100)))
        .await;

    assert!(started.elapsed() < Duration::from_millis(200));
    assert_eq!(stats.cards_read, 0);
    assert_eq!(service.call_count(), 0);
    assert_eq!(lamp.history(), vec![LedColor::Off]);
}

/// Duplicate and failed scans flow through the loop and its counters
#[tokio::test(start_paused = true)]
async fn test_loop_counts_outcomes() {
    let Rig {
        mut terminal,
        mut cards,
        service,
        lamp: _lamp,
    } = rig(Duration::ZERO, Duration::from_millis(100));
    service.respond(200, "Attendance marked successfully.");

    let (stop, stopped) = oneshot::channel::<()>();

    let driver = async move {
        for uid in [vec![0x01, 0x02], vec![0x01, 0x02], vec![0xB2, 0x00]] {
            cards.present_card(uid).await.unwrap();
            sleep(Duration::from_secs(2)).await;
        }
        let _ = stop.send(());
        cards
    };

    let (stats, _cards) = tokio::join!(
        terminal.run_until(async {
            let _ = stopped.await;
        }),
        driver
    );

    assert_eq!(stats.cards_read, 3);
    assert_eq!(stats.reported, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.report_failures, 1);
    assert_eq!(stats.missed, 0);
}

/// A disconnected reader is reported once and polling goes on
#[tokio::test(start_paused = true)]
async fn test_reader_fault_is_counted_once() {
    let Rig {
        mut terminal,
        cards,
        service: _service,
        lamp: _lamp,
    } = rig(Duration::ZERO, Duration::ZERO);
    drop(cards);

    let stats = terminal.run_until(sleep(Duration::from_secs(1))).await;

    assert_eq!(stats.reader_faults, 1);
    assert_eq!(stats.cards_read, 0);
}
