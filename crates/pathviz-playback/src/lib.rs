//! **pathviz-playback**: timed replay of recorded search traces.
//!
//! A search run produces a [`SearchResult`](pathviz_search::SearchResult):
//! every intermediate grid plus a message. This crate turns that trace
//! into an animation with interactive controls.
//!
//! | Layer | Role |
//! |-------|------|
//! | [`Speed`] | Delay per tick and skip-ahead policy |
//! | [`Scheduler`] | Delivers [`Tick`]s after a delay ([`ThreadScheduler`], [`ManualScheduler`]) |
//! | [`Playback`] | State machine: start, pause, resume, step, fast-forward, jump, reset |
//! | [`Session`] | Grid editing, algorithm choice and on-demand search on top of a playback |
//!
//! # Driving a playback
//!
//! The host owns the tick loop. With a [`ThreadScheduler`] ticks arrive on a
//! channel and are handed back via [`Session::tick`]; with a
//! [`ManualScheduler`] the host moves a virtual clock:
//!
//! ```
//! use pathviz_playback::{ManualScheduler, Session, SessionConfig, PlaybackState};
//!
//! let config = SessionConfig { rows: 6, cols: 6, ..SessionConfig::default() };
//! let mut session = Session::new(config, ManualScheduler::new()).unwrap();
//! assert!(session.start().unwrap());
//! session.playback_mut().run_until_idle();
//! assert_eq!(session.state(), PlaybackState::Finished);
//! ```

pub mod error;
pub mod playback;
pub mod schedule;
pub mod session;
pub mod speed;

pub use error::{PlaybackError, SessionError};
pub use playback::{IDLE_MESSAGE, Playback, PlaybackConfig, PlaybackState, PlaybackView};
pub use schedule::{ManualScheduler, Scheduler, ThreadScheduler, Tick, TimerId};
pub use session::{Session, SessionConfig, UNREACHABLE_MESSAGE, fallback_endpoints};
pub use speed::Speed;
