use embedded_hal::delay::DelayNs;

/// 待機結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready { elapsed_ms: u32 },
    TimedOut { elapsed_ms: u32 },
}

impl WaitOutcome {
    pub fn is_ready(self) -> bool {
        matches!(self, WaitOutcome::Ready { .. })
    }

    pub fn elapsed_ms(self) -> u32 {
        match self {
            WaitOutcome::Ready { elapsed_ms } | WaitOutcome::TimedOut { elapsed_ms } => elapsed_ms,
        }
    }
}

/// 協調的な待機プリミティブ
///
/// 上限時間つきで条件の成立を待つ。ポーリング以外（イベント待ちなど）に
/// 差し替えても呼び出し側の契約は変わらない。
pub trait SignalWait {
    fn wait_for(&mut self, timeout_ms: u32, ready: &mut dyn FnMut() -> bool) -> WaitOutcome;

    /// 条件なしで指定時間待つ
    fn settle(&mut self, ms: u32);
}

/// 固定間隔のポーリング待機
///
/// タイムアウト時は `timeout_ms` + 1 ポーリング間隔以内に戻る。
pub struct PollingWait<D: DelayNs> {
    delay: D,
    poll_interval_ms: u32,
}

impl<D: DelayNs> PollingWait<D> {
    pub fn new(delay: D, poll_interval_ms: u32) -> Self {
        PollingWait {
            delay,
            poll_interval_ms: poll_interval_ms.max(1),
        }
    }

    pub fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }
}

impl<D: DelayNs> SignalWait for PollingWait<D> {
    fn wait_for(&mut self, timeout_ms: u32, ready: &mut dyn FnMut() -> bool) -> WaitOutcome {
        let mut elapsed_ms = 0u32;
        loop {
            if ready() {
                return WaitOutcome::Ready { elapsed_ms };
            }
            if elapsed_ms >= timeout_ms {
                return WaitOutcome::TimedOut { elapsed_ms };
            }
            self.delay.delay_ms(self.poll_interval_ms);
            elapsed_ms = elapsed_ms.saturating_add(self.poll_interval_ms);
        }
    }

    fn settle(&mut self, ms: u32) {
        if ms > 0 {
            self.delay.delay_ms(ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingDelay {
        total_ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
        }
    }

    #[test]
    fn ready_condition_returns_immediately() {
        let mut wait = PollingWait::new(CountingDelay { total_ms: 0 }, 5);
        let outcome = wait.wait_for(100, &mut || true);
        assert_eq!(outcome, WaitOutcome::Ready { elapsed_ms: 0 });
    }

    #[test]
    fn timeout_is_bounded_by_one_interval() {
        let mut wait = PollingWait::new(CountingDelay { total_ms: 0 }, 30);
        let outcome = wait.wait_for(100, &mut || false);
        assert!(!outcome.is_ready());
        assert!(outcome.elapsed_ms() >= 100);
        assert!(outcome.elapsed_ms() < 100 + 30);
        assert_eq!(wait.delay.total_ms, outcome.elapsed_ms());
    }

    #[test]
    fn zero_interval_is_promoted_to_one_ms() {
        let wait = PollingWait::new(CountingDelay { total_ms: 0 }, 0);
        assert_eq!(wait.poll_interval_ms(), 1);
    }

    #[test]
    fn condition_observed_after_some_polls() {
        let mut wait = PollingWait::new(CountingDelay { total_ms: 0 }, 10);
        let mut polls = 0;
        let outcome = wait.wait_for(1000, &mut || {
            polls += 1;
            polls == 4
        });
        assert_eq!(outcome, WaitOutcome::Ready { elapsed_ms: 30 });
    }
}
