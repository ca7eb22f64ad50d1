//! Delayed delivery of replay ticks.
//!
//! A [`Scheduler`] arranges for a [`Tick`] to come back after a delay and
//! can cancel that arrangement. Two implementations are provided:
//!
//! - [`ThreadScheduler`]: a single timer thread delivering over an mpsc
//!   channel; cancelled ticks are never sent.
//! - [`ManualScheduler`]: a virtual clock driven by the caller, for tests
//!   and hosts with their own event loop.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// A scheduled advance, tagged with the generation it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick(pub u64);

/// Something that can deliver a [`Tick`] after a delay.
pub trait Scheduler {
    /// Identifies one scheduled tick for cancellation.
    type Handle;

    /// Arrange for `tick` to be delivered after `delay`.
    fn schedule(&mut self, delay: Duration, tick: Tick) -> Self::Handle;

    /// Make sure the tick behind `handle` is never delivered. Cancelling a
    /// tick that already fired is a no-op.
    fn cancel(&mut self, handle: Self::Handle);
}

// ---------------------------------------------------------------------------
// ThreadScheduler
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Command {
    Schedule { seq: u64, due: Instant, tick: Tick },
    Cancel(u64),
}

/// Delivers ticks from one background timer thread.
///
/// Ticks arrive on the [`Receiver`] returned by [`new`](Self::new), or on
/// the sender given to [`with_sender`](Self::with_sender). Schedule and
/// cancel requests reach the thread in order, so a tick cancelled before
/// its due time is never sent. The thread exits once the scheduler is
/// dropped or the tick receiver goes away.
#[derive(Debug)]
pub struct ThreadScheduler {
    commands: Sender<Command>,
    seq: u64,
}

impl ThreadScheduler {
    pub fn new() -> (Self, Receiver<Tick>) {
        let (tx, rx) = mpsc::channel();
        (Self::with_sender(tx), rx)
    }

    /// A scheduler delivering into an existing channel.
    pub fn with_sender(ticks: Sender<Tick>) -> Self {
        let (commands, inbox) = mpsc::channel();
        std::thread::spawn(move || timer_loop(inbox, ticks));
        Self { commands, seq: 0 }
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            log::warn!("timer thread is gone; tick dropped");
        }
    }
}

impl Scheduler for ThreadScheduler {
    type Handle = TimerId;

    fn schedule(&mut self, delay: Duration, tick: Tick) -> TimerId {
        let seq = self.seq;
        self.seq += 1;
        self.send(Command::Schedule {
            seq,
            due: Instant::now() + delay,
            tick,
        });
        TimerId(seq)
    }

    fn cancel(&mut self, handle: TimerId) {
        self.send(Command::Cancel(handle.0));
    }
}

/// Body of the timer thread: keep a heap of live timers, wait for the
/// earliest one or the next command, fire whatever is due.
fn timer_loop(inbox: Receiver<Command>, ticks: Sender<Tick>) {
    let mut heap: BinaryHeap<Reverse<Timer<Instant>>> = BinaryHeap::new();
    let mut cancelled = HashSet::new();
    loop {
        let next = match heap.peek() {
            Some(Reverse(t)) => inbox.recv_timeout(t.due.saturating_duration_since(Instant::now())),
            None => inbox.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        let mut command = match next {
            Ok(command) => Some(command),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => return,
        };
        // Apply everything queued so far before firing; a cancel that
        // was sent before the due time must win.
        while let Some(c) = command.take().or_else(|| inbox.try_recv().ok()) {
            match c {
                Command::Schedule { seq, due, tick } => heap.push(Reverse(Timer { due, seq, tick })),
                Command::Cancel(seq) => {
                    if heap.iter().any(|Reverse(t)| t.seq == seq) {
                        cancelled.insert(seq);
                    }
                }
            }
        }
        let now = Instant::now();
        while let Some(Reverse(t)) = heap.peek() {
            if t.due > now {
                break;
            }
            let Some(Reverse(timer)) = heap.pop() else {
                break;
            };
            if cancelled.remove(&timer.seq) {
                continue;
            }
            if ticks.send(timer.tick).is_err() {
                log::debug!("tick receiver closed; timer thread exiting");
                return;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

/// Handle of a tick queued on a [`ManualScheduler`] or [`ThreadScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Timer<T> {
    due: T,
    /// Insertion order; equal due times fire FIFO.
    seq: u64,
    tick: Tick,
}

/// A virtual clock. Nothing fires until the owner pops due ticks.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    seq: u64,
    heap: BinaryHeap<Reverse<Timer<Duration>>>,
    cancelled: HashSet<u64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of ticks still queued (cancelled ones excluded).
    pub fn pending(&self) -> usize {
        self.heap
            .iter()
            .filter(|Reverse(t)| !self.cancelled.contains(&t.seq))
            .count()
    }

    /// Due time of the next live tick.
    pub fn next_due(&mut self) -> Option<Duration> {
        self.drop_cancelled_head();
        self.heap.peek().map(|Reverse(t)| t.due)
    }

    /// Pop the earliest live tick due at or before `until`, moving the
    /// clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<Tick> {
        self.drop_cancelled_head();
        match self.heap.peek() {
            Some(Reverse(t)) if t.due <= until => {}
            _ => return None,
        }
        let Reverse(timer) = self.heap.pop()?;
        self.now = self.now.max(timer.due);
        Some(timer.tick)
    }

    /// Move the clock forward to `to` without firing anything.
    pub fn set_now(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    fn drop_cancelled_head(&mut self) {
        while let Some(Reverse(t)) = self.heap.peek() {
            if !self.cancelled.remove(&t.seq) {
                break;
            }
            self.heap.pop();
        }
    }
}

impl Scheduler for ManualScheduler {
    type Handle = TimerId;

    fn schedule(&mut self, delay: Duration, tick: Tick) -> TimerId {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Timer {
            due: self.now + delay,
            seq,
            tick,
        }));
        TimerId(seq)
    }

    fn cancel(&mut self, handle: TimerId) {
        if self.heap.iter().any(|Reverse(t)| t.seq == handle.0) {
            self.cancelled.insert(handle.0);
        }
    }
}
