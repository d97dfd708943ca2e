use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(200);

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used to drive debounce timing in tests
/// and in hosts with their own frame clock.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.lock().map(|now| *now).unwrap_or_else(|_| Instant::now())
    }
}

/// A search released by the debouncer. Its result may only be applied while
/// `seq` is still the latest issued sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
}

#[derive(Debug, Clone)]
struct Pending {
    ticket: SearchTicket,
    due: Instant,
}

/// Single owned timer. Arming it cancels whatever was armed before, and
/// every arm or cancel issues a new sequence number, so completions of
/// superseded searches can be recognized and dropped.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<Pending>,
    latest_seq: u64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            latest_seq: 0,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn schedule(&mut self, query: &str, now: Instant) -> u64 {
        self.latest_seq += 1;
        self.pending = Some(Pending {
            ticket: SearchTicket {
                seq: self.latest_seq,
                query: query.to_string(),
            },
            due: now + self.quiet_period,
        });
        self.latest_seq
    }

    /// Drops the armed timer and invalidates any dispatched ticket.
    /// Returns whether a timer was armed.
    pub fn cancel(&mut self) -> bool {
        self.latest_seq += 1;
        self.pending.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    /// Releases the armed search once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        let due = self.pending.as_ref()?.due;
        if now < due {
            return None;
        }
        self.pending.take().map(|pending| pending.ticket)
    }

    /// Releases the armed search immediately regardless of its deadline.
    pub fn flush(&mut self) -> Option<SearchTicket> {
        self.pending.take().map(|pending| pending.ticket)
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_seq
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Clock, Debouncer, ManualClock};

    #[test]
    fn rapid_input_releases_only_the_last_query() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(200));

        for query in ["b", "bm", "bmi"] {
            debouncer.schedule(query, clock.now());
            clock.advance(Duration::from_millis(50));
            assert!(debouncer.poll(clock.now()).is_none());
        }

        clock.advance(Duration::from_millis(200));
        let ticket = debouncer.poll(clock.now()).unwrap();
        assert_eq!(ticket.query, "bmi");
        assert!(debouncer.is_current(ticket.seq));
        assert!(debouncer.poll(clock.now()).is_none());
    }

    #[test]
    fn cancel_invalidates_dispatched_ticket() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule("bmi", clock.now());
        let ticket = debouncer.flush().unwrap();

        assert!(!debouncer.cancel());
        assert!(!debouncer.is_current(ticket.seq));
    }

    #[test]
    fn newer_schedule_supersedes_older_ticket() {
        let clock = ManualClock::new();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.schedule("bm", clock.now());
        let older = debouncer.poll(clock.now()).unwrap();
        let newer_seq = debouncer.schedule("bmi", clock.now());

        assert!(newer_seq > older.seq);
        assert!(!debouncer.is_current(older.seq));
        assert!(debouncer.is_current(newer_seq));
        assert_eq!(debouncer.deadline(), Some(clock.now()));
    }
}
