use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

// States of the shared cell. Every transition is a single atomic operation, so a signal raised
// at any instant is seen by the next checkpoint and never lost.
const RUNNING: u8 = 0;
const PENDING: u8 = 1;
/// In a session opened by a signal.
const PAUSED: u8 = 2;
/// In a session opened by a breakpoint or step.
const HELD: u8 = 3;
/// In a session opened by a breakpoint or step, with a signal raised since.
const HELD_PENDING: u8 = 4;
const EXIT: u8 = 5;

/// Pause requests shared between the execution loop and an asynchronous signal source.
///
/// The first signal requests a pause at the next instruction boundary. A second signal, while
/// that pause is pending or its session is open, requests the program to exit.
///
/// A signal raised during a session opened by a breakpoint or step counts as a first signal, and
/// pauses again once that session resumes.
#[derive(Clone, Debug, Default)]
pub struct Interrupt(Arc<AtomicU8>);

/// What a call to [`Interrupt::raise`] achieved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    /// Execution will pause at the next checkpoint.
    Pause,
    /// Execution will not continue.
    ///
    /// If `was_paused`, the debugger is blocked waiting for input and will not reach a
    /// checkpoint on its own.
    Exit { was_paused: bool },
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Safe to call from any thread, at any time.
    pub fn raise(&self) -> Signal {
        let previous = self.update(|state| match state {
            RUNNING => Some(PENDING),
            HELD => Some(HELD_PENDING),
            _ => Some(EXIT),
        });
        match previous {
            Ok(RUNNING | HELD) => Signal::Pause,
            Ok(PAUSED | HELD_PENDING) => Signal::Exit { was_paused: true },
            _ => Signal::Exit { was_paused: false },
        }
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::SeqCst) == PENDING
    }

    pub fn should_exit(&self) -> bool {
        self.0.load(Ordering::SeqCst) == EXIT
    }

    /// Consume any pending request and enter a session.
    ///
    /// Returns `false` if an exit was requested instead.
    pub(super) fn pause(&self) -> bool {
        self.update(|state| match state {
            EXIT => None,
            PENDING => Some(PAUSED),
            _ => Some(HELD),
        })
        .is_ok()
    }

    /// Leave the session. A signal raised during a held session stays pending.
    ///
    /// Returns `false` if an exit was requested while paused.
    pub(super) fn resume(&self) -> bool {
        self.update(|state| match state {
            PAUSED | HELD => Some(RUNNING),
            HELD_PENDING => Some(PENDING),
            _ => None,
        })
        .is_ok()
    }

    fn update(&self, f: impl FnMut(u8) -> Option<u8>) -> Result<u8, u8> {
        self.0.fetch_update(Ordering::SeqCst, Ordering::SeqCst, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_signal_pauses() {
        let interrupt = Interrupt::new();
        assert!(!interrupt.is_pending());
        assert_eq!(interrupt.raise(), Signal::Pause);
        assert!(interrupt.is_pending());
        assert!(!interrupt.should_exit());
    }

    #[test]
    fn pausing_consumes_the_request() {
        let interrupt = Interrupt::new();
        interrupt.raise();
        assert!(interrupt.pause());
        assert!(!interrupt.is_pending());
        assert!(interrupt.resume());
        assert!(!interrupt.is_pending());
        assert!(!interrupt.should_exit());
    }

    #[test]
    fn second_signal_before_pause_exits() {
        let interrupt = Interrupt::new();
        interrupt.raise();
        assert_eq!(interrupt.raise(), Signal::Exit { was_paused: false });
        assert!(interrupt.should_exit());
        assert!(!interrupt.pause());
    }

    #[test]
    fn second_signal_while_paused_exits() {
        let interrupt = Interrupt::new();
        interrupt.raise();
        assert!(interrupt.pause());
        assert_eq!(interrupt.raise(), Signal::Exit { was_paused: true });
        assert!(!interrupt.resume());
        assert!(interrupt.should_exit());
    }

    #[test]
    fn first_signal_during_breakpoint_session_pauses_again() {
        let interrupt = Interrupt::new();
        assert!(interrupt.pause());
        assert_eq!(interrupt.raise(), Signal::Pause);
        assert!(!interrupt.should_exit());
        assert!(!interrupt.is_pending());

        assert!(interrupt.resume());
        assert!(interrupt.is_pending());
        assert!(interrupt.pause());
        assert!(interrupt.resume());
        assert!(!interrupt.is_pending());
    }

    #[test]
    fn second_signal_during_breakpoint_session_exits() {
        let interrupt = Interrupt::new();
        interrupt.pause();
        interrupt.raise();
        assert_eq!(interrupt.raise(), Signal::Exit { was_paused: true });
        assert!(!interrupt.resume());
        assert!(interrupt.should_exit());
    }

    #[test]
    fn signals_from_another_thread_are_observed() {
        let interrupt = Interrupt::new();
        let remote = interrupt.clone();
        std::thread::spawn(move || remote.raise())
            .join()
            .expect("signal thread panicked");
        assert!(interrupt.is_pending());
    }
}
