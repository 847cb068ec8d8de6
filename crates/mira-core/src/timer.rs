//! Periodic tasks driven by the event loop.
//!
//! A task does not run anything itself: the loop polls it with the current
//! time and does the work when it reports due. Dropping the task cancels it.

use std::time::{ Duration, Instant };


/// A self-rescheduling timer: first due after `initial_delay`, then every `interval`.
#[derive( Debug, Clone, Copy, PartialEq, Eq )]
pub struct PeriodicTask {
    next_due: Instant,
    interval: Duration,
}


impl PeriodicTask {
    pub fn start( now: Instant, initial_delay: Duration, interval: Duration ) -> Self {
        Self {
            next_due: now + initial_delay,
            interval,
        }
    }


    /// Returns true if the task is due, and reschedules it one interval from `now`.
    ///
    /// Fires at most once per call, so a stalled loop never causes a burst.
    pub fn poll( &mut self, now: Instant ) -> bool {
        if now < self.next_due {
            return false;
        }

        self.next_due = now + self.interval;
        true
    }


    pub fn next_due( &self ) -> Instant {
        self.next_due
    }
}


#[cfg( test )]
mod tests {
    use super::*;


    #[test]
    fn test_initial_delay_then_interval() {
        let t0 = Instant::now();
        let mut task = PeriodicTask::start( t0, Duration::from_secs( 2 ), Duration::from_secs( 10 ) );

        assert!( !task.poll( t0 ) );
        assert!( !task.poll( t0 + Duration::from_millis( 1999 ) ) );
        assert!( task.poll( t0 + Duration::from_secs( 2 ) ) );
        assert_eq!( task.next_due(), t0 + Duration::from_secs( 12 ) );

        assert!( !task.poll( t0 + Duration::from_secs( 11 ) ) );
        assert!( task.poll( t0 + Duration::from_secs( 12 ) ) );
    }


    #[test]
    fn test_late_poll_fires_once() {
        let t0 = Instant::now();
        let mut task = PeriodicTask::start( t0, Duration::ZERO, Duration::from_secs( 1 ) );

        let late = t0 + Duration::from_secs( 30 );
        assert!( task.poll( late ) );
        assert!( !task.poll( late ) );
        assert_eq!( task.next_due(), late + Duration::from_secs( 1 ) );
    }
}
