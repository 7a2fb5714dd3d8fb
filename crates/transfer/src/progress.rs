use std::sync::{Arc, Mutex};

/// Callback invoked with the percent complete of a transfer.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Converts bytes sent into a whole percent of `total`.
///
/// Rounds to nearest, but never reports 100 before every byte was sent.
/// An empty transfer is complete by definition.
pub fn percent_complete(sent: u64, total: u64) -> u8 {
    if total == 0 || sent >= total {
        return 100;
    }
    let rounded = (sent as u128 * 100 + total as u128 / 2) / total as u128;
    rounded.min(99) as u8
}

/// Tracks bytes handed to the transport for a single transfer.
///
/// Emits a percent only when it increases. Bytes handed to the transport
/// count up to 99; `100` is reserved for [`finish`](Self::finish), called
/// once storage has confirmed the write.
pub struct ProgressMeter {
    total: u64,
    state: Mutex<MeterState>,
    callback: ProgressCallback,
}

#[derive(Default)]
struct MeterState {
    sent: u64,
    reported: Option<u8>,
}

impl ProgressMeter {
    /// Creates a meter for a transfer of `total` bytes.
    pub fn new(total: u64, callback: ProgressCallback) -> Self {
        Self {
            total,
            state: Mutex::new(MeterState::default()),
            callback,
        }
    }

    /// Records `bytes` more sent.
    pub fn advance(&self, bytes: u64) {
        let pct = {
            let mut s = self.state.lock().unwrap_or_else(|e| e.into_inner());
            s.sent = s.sent.saturating_add(bytes);
            // Nothing to meter for an empty transfer.
            if self.total == 0 {
                return;
            }
            let pct = percent_complete(s.sent, self.total).min(99);
            Self::bump(&mut s, pct)
        };
        if let Some(pct) = pct {
            (self.callback)(pct);
        }
    }

    /// Marks the transfer confirmed complete, reporting 100 if not yet seen.
    pub fn finish(&self) {
        let pct = {
            let mut s = self.state.lock().unwrap_or_else(|e| e.into_inner());
            Self::bump(&mut s, 100)
        };
        if let Some(pct) = pct {
            (self.callback)(pct);
        }
    }

    /// Bytes recorded so far.
    pub fn sent(&self) -> u64 {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).sent
    }

    fn bump(s: &mut MeterState, pct: u8) -> Option<u8> {
        if s.reported.is_some_and(|last| pct <= last) {
            return None;
        }
        s.reported = Some(pct);
        Some(pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_meter(total: u64) -> (ProgressMeter, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let meter = ProgressMeter::new(
            total,
            Arc::new(move |pct| {
                s.lock().unwrap().push(pct);
            }),
        );
        (meter, seen)
    }

    #[test]
    fn percent_rounds_to_nearest() {
        assert_eq!(percent_complete(0, 200), 0);
        assert_eq!(percent_complete(1, 200), 1); // 0.5 rounds up
        assert_eq!(percent_complete(50, 200), 25);
        assert_eq!(percent_complete(333, 1000), 33);
        assert_eq!(percent_complete(335, 1000), 34);
    }

    #[test]
    fn percent_holds_at_99_until_complete() {
        assert_eq!(percent_complete(996, 1000), 99);
        assert_eq!(percent_complete(999, 1000), 99);
        assert_eq!(percent_complete(1000, 1000), 100);
    }

    #[test]
    fn percent_of_empty_transfer_is_complete() {
        assert_eq!(percent_complete(0, 0), 100);
    }

    #[test]
    fn meter_reports_only_increases() {
        let (meter, seen) = recording_meter(1000);
        meter.advance(100);
        meter.advance(1); // still 10%
        meter.advance(399);
        meter.advance(500);

        assert_eq!(*seen.lock().unwrap(), vec![10, 50, 99]);
        assert_eq!(meter.sent(), 1000);

        meter.finish();
        assert_eq!(*seen.lock().unwrap(), vec![10, 50, 99, 100]);
    }

    #[test]
    fn finish_reports_100_once() {
        let (meter, seen) = recording_meter(10);
        meter.advance(10);
        meter.finish();
        meter.finish();
        assert_eq!(*seen.lock().unwrap(), vec![99, 100]);
    }

    #[test]
    fn finish_completes_empty_transfer() {
        let (meter, seen) = recording_meter(0);
        meter.advance(0);
        assert!(seen.lock().unwrap().is_empty());
        meter.finish();
        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }
}
