use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;

use super::lock;
use crate::hardware::video::IsrSignal;

const NANOS_PER_MILLI: u64 = 1_000_000;
const TICK_INTERVAL_NS: u64 = NANOS_PER_MILLI;
/// 発火履歴として残す件数（古いものから捨てる）
pub const FIRED_HISTORY_LIMIT: usize = 256;

/// 割り込みとして発火させるイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    FrameStart,
    FrameComplete,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    at_ns: u64,
    event: SignalEvent,
    period_ns: Option<u64>,
}

#[derive(Debug, Default)]
struct ClockInner {
    now_ns: u64,
    next_tick_ns: u64,
    events: Vec<Scheduled>,
    isr: Option<IsrSignal>,
    fired: VecDeque<(u64, SignalEvent)>,
}

/// 仮想時間の時計
///
/// `DelayNs` で時間を進めると、その間に予定されたイベントを
/// 時刻順に割り込みハンドル ([`IsrSignal`]) へ発火する。1ms ごとのティックも送る。
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    inner: Arc<Mutex<ClockInner>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, isr: IsrSignal) {
        lock(&self.inner).isr = Some(isr);
    }

    pub fn now_ms(&self) -> u64 {
        lock(&self.inner).now_ns / NANOS_PER_MILLI
    }

    /// 現在時刻から `after_ms` 後にイベントを予約する
    pub fn schedule_in(&self, after_ms: u32, event: SignalEvent, period_ms: Option<u32>) {
        let mut inner = lock(&self.inner);
        let at_ns = inner.now_ns + after_ms as u64 * NANOS_PER_MILLI;
        inner.events.push(Scheduled {
            at_ns,
            event,
            period_ns: period_ms.map(|ms| (ms.max(1)) as u64 * NANOS_PER_MILLI),
        });
    }

    pub fn cancel_all(&self) {
        lock(&self.inner).events.clear();
    }

    pub fn pending_events(&self) -> usize {
        lock(&self.inner).events.len()
    }

    /// 直近の発火済みイベント (ミリ秒, 種類)。最大 [`FIRED_HISTORY_LIMIT`] 件
    pub fn fired(&self) -> Vec<(u64, SignalEvent)> {
        lock(&self.inner)
            .fired
            .iter()
            .map(|&(ns, event)| (ns / NANOS_PER_MILLI, event))
            .collect()
    }

    pub fn advance_ms(&self, ms: u32) {
        self.advance_ns(ms as u64 * NANOS_PER_MILLI);
    }

    fn advance_ns(&self, ns: u64) {
        let mut inner = lock(&self.inner);
        let target = inner.now_ns + ns;

        loop {
            let next_event = inner
                .events
                .iter()
                .enumerate()
                .filter(|(_, e)| e.at_ns <= target)
                .min_by_key(|(_, e)| e.at_ns)
                .map(|(i, e)| (i, *e));
            let next_tick = (inner.next_tick_ns <= target).then_some(inner.next_tick_ns);

            match (next_event, next_tick) {
                (Some((index, scheduled)), tick) if tick.map_or(true, |t| scheduled.at_ns <= t) => {
                    inner.now_ns = scheduled.at_ns;
                    match scheduled.period_ns {
                        Some(period) => inner.events[index].at_ns += period,
                        None => {
                            inner.events.remove(index);
                        }
                    }
                    if inner.fired.len() == FIRED_HISTORY_LIMIT {
                        inner.fired.pop_front();
                    }
                    inner.fired.push_back((scheduled.at_ns, scheduled.event));
                    if let Some(isr) = &inner.isr {
                        match scheduled.event {
                            SignalEvent::FrameStart => isr.on_frame_start(),
                            SignalEvent::FrameComplete => isr.on_frame_complete(),
                        }
                    }
                }
                (_, Some(tick)) => {
                    inner.now_ns = tick;
                    inner.next_tick_ns = tick + TICK_INTERVAL_NS;
                    if let Some(isr) = &inner.isr {
                        isr.on_tick((tick / NANOS_PER_MILLI) as u32);
                    }
                }
                (_, None) => break,
            }
        }

        inner.now_ns = target;
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance_ns(ns as u64);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::video::CaptureSignal;

    #[test]
    fn events_fire_when_time_passes() {
        let (isr, driver) = CaptureSignal::channel();
        let mut clock = SimClock::new();
        clock.attach(isr);
        clock.schedule_in(50, SignalEvent::FrameStart, None);
        clock.schedule_in(200, SignalEvent::FrameComplete, None);

        clock.delay_ms(49);
        assert!(!driver.frame_started());
        clock.delay_ms(1);
        assert!(driver.frame_started());
        assert!(!driver.frame_complete());
        clock.delay_ms(150);
        assert!(driver.frame_complete());
        assert_eq!(clock.pending_events(), 0);
        assert_eq!(
            clock.fired(),
            vec![(50, SignalEvent::FrameStart), (200, SignalEvent::FrameComplete)]
        );
    }

    #[test]
    fn periodic_events_repeat_until_cancelled() {
        let (isr, driver) = CaptureSignal::channel();
        let clock = SimClock::new();
        clock.attach(isr);
        clock.schedule_in(40, SignalEvent::FrameComplete, Some(40));

        clock.advance_ms(1000);
        assert_eq!(driver.frame_count(), 25);
        assert_eq!(driver.fps(), 25);

        clock.cancel_all();
        clock.advance_ms(1000);
        assert_eq!(driver.frame_count(), 25);
    }

    #[test]
    fn fired_history_keeps_only_recent_events() {
        let clock = SimClock::new();
        clock.schedule_in(40, SignalEvent::FrameComplete, Some(40));

        // 40ms 周期で 1000 件発火させる
        clock.advance_ms(40_000);
        let fired = clock.fired();
        assert_eq!(fired.len(), FIRED_HISTORY_LIMIT);
        assert_eq!(fired.last(), Some(&(40_000, SignalEvent::FrameComplete)));
        assert_eq!(
            fired.first(),
            Some(&(40_000 - 40 * (FIRED_HISTORY_LIMIT as u64 - 1), SignalEvent::FrameComplete))
        );
    }
}
