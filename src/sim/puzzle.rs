//! Math challenge sub-state machine
//!
//! Catching a hazard opens a challenge: one question from the external
//! puzzle provider, a fixed answer budget, and a single resolution. The
//! countdown is a tick counter advanced by the main `tick` only while the
//! session is in the Challenge phase, so it cannot run while the question is
//! still loading, and it stops existing the moment the challenge resolves.
//!
//! Resolution is write-once: a double-clicked submit or a timeout racing an
//! answer cannot resolve the challenge twice.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_HZ;
use crate::tuning::Tuning;

/// Where the challenge is in its loading lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChallengeStatus {
    /// Question fetch in flight; countdown not started
    Loading,
    /// Question ready; countdown running
    Ready {
        /// Opaque prompt asset reference (an image URL)
        prompt: String,
        /// Expected integer answer
        solution: i64,
    },
    /// Provider call failed; short grace period, then the game ends
    LoadFailed { grace_ticks: u32 },
}

/// How a challenge resolved. Everything except `Correct` ends the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeOutcome {
    Correct,
    Incorrect,
    TimedOut,
    Skipped,
}

impl ChallengeOutcome {
    pub fn ends_game(&self) -> bool {
        !matches!(self, ChallengeOutcome::Correct)
    }
}

/// What the UI should do after an image asset fails to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRetry {
    /// Try the asset again (attempt number, 1-based)
    Retry(u8),
    /// Retries exhausted; show the text-only prompt
    TextOnly,
}

/// An active math challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub status: ChallengeStatus,
    /// Answer budget remaining, in ticks; counts down only while Ready
    ticks_left: u32,
    /// Write-once resolution
    outcome: Option<ChallengeOutcome>,
    /// Grace budget applied when the provider call fails
    grace_budget: u32,
    asset_attempts: u8,
    max_asset_retries: u8,
    /// Set once image retries are exhausted
    pub text_only: bool,
}

impl Challenge {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            status: ChallengeStatus::Loading,
            ticks_left: tuning.challenge_secs * TICK_HZ as u32,
            outcome: None,
            grace_budget: tuning.challenge_grace_secs * TICK_HZ as u32,
            asset_attempts: 0,
            max_asset_retries: tuning.max_asset_retries,
            text_only: false,
        }
    }

    /// Deliver the fetched question. Ignored unless still Loading.
    pub fn question_loaded(&mut self, prompt: String, solution: i64) {
        if self.status == ChallengeStatus::Loading {
            self.status = ChallengeStatus::Ready { prompt, solution };
        }
    }

    /// Record a failed provider call. The challenge resolves toward game
    /// over once the grace period elapses, so a dead provider can never
    /// hang the session.
    pub fn load_failed(&mut self) {
        if self.status == ChallengeStatus::Loading {
            self.status = ChallengeStatus::LoadFailed {
                grace_ticks: self.grace_budget,
            };
        }
    }

    /// Compare a submitted answer against the solution. No-op while the
    /// question is loading or once resolved.
    pub fn submit_answer(&mut self, answer: i64) {
        if self.outcome.is_some() {
            return;
        }
        if let ChallengeStatus::Ready { solution, .. } = self.status {
            self.outcome = Some(if answer == solution {
                ChallengeOutcome::Correct
            } else {
                ChallengeOutcome::Incorrect
            });
        }
    }

    /// Explicit skip; ends the game like a timeout
    pub fn skip(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(ChallengeOutcome::Skipped);
        }
    }

    /// Advance the challenge's clocks by one tick
    pub fn advance_tick(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        match &mut self.status {
            ChallengeStatus::Loading => {}
            ChallengeStatus::Ready { .. } => {
                self.ticks_left = self.ticks_left.saturating_sub(1);
                if self.ticks_left == 0 {
                    self.outcome = Some(ChallengeOutcome::TimedOut);
                }
            }
            ChallengeStatus::LoadFailed { grace_ticks } => {
                *grace_ticks = grace_ticks.saturating_sub(1);
                if *grace_ticks == 0 {
                    self.outcome = Some(ChallengeOutcome::TimedOut);
                }
            }
        }
    }

    pub fn outcome(&self) -> Option<ChallengeOutcome> {
        self.outcome
    }

    /// Whole seconds left on the answer budget, for the countdown display
    pub fn seconds_left(&self) -> u32 {
        self.ticks_left.div_ceil(TICK_HZ as u32)
    }

    /// Register an image-asset load failure and decide the next step
    pub fn asset_failed(&mut self) -> ImageRetry {
        if self.asset_attempts < self.max_asset_retries {
            self.asset_attempts += 1;
            ImageRetry::Retry(self.asset_attempts)
        } else {
            self.text_only = true;
            ImageRetry::TextOnly
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_challenge(solution: i64) -> Challenge {
        let mut ch = Challenge::new(&Tuning::default());
        ch.question_loaded("https://example.com/q.png".into(), solution);
        ch
    }

    #[test]
    fn countdown_does_not_run_while_loading() {
        let mut ch = Challenge::new(&Tuning::default());
        let before = ch.seconds_left();
        for _ in 0..(5 * TICK_HZ) {
            ch.advance_tick();
        }
        assert_eq!(ch.seconds_left(), before);
        assert!(ch.outcome().is_none());
    }

    #[test]
    fn correct_answer_resolves_correct() {
        let mut ch = ready_challenge(42);
        ch.submit_answer(42);
        assert_eq!(ch.outcome(), Some(ChallengeOutcome::Correct));
    }

    #[test]
    fn wrong_answer_resolves_incorrect() {
        let mut ch = ready_challenge(42);
        ch.submit_answer(41);
        assert_eq!(ch.outcome(), Some(ChallengeOutcome::Incorrect));
        assert!(ch.outcome().unwrap().ends_game());
    }

    #[test]
    fn resolution_is_write_once() {
        let mut ch = ready_challenge(42);
        ch.submit_answer(41);
        ch.submit_answer(42); // double-click after a miss
        assert_eq!(ch.outcome(), Some(ChallengeOutcome::Incorrect));

        let mut ch = ready_challenge(42);
        ch.submit_answer(42);
        ch.skip();
        assert_eq!(ch.outcome(), Some(ChallengeOutcome::Correct));
    }

    #[test]
    fn countdown_expiry_times_out() {
        let tuning = Tuning::default();
        let mut ch = ready_challenge(42);
        for _ in 0..(tuning.challenge_secs as u64 * TICK_HZ) {
            ch.advance_tick();
        }
        assert_eq!(ch.outcome(), Some(ChallengeOutcome::TimedOut));
    }

    #[test]
    fn answer_before_expiry_beats_timeout() {
        let mut ch = ready_challenge(42);
        for _ in 0..TICK_HZ {
            ch.advance_tick();
        }
        ch.submit_answer(42);
        for _ in 0..(60 * TICK_HZ) {
            ch.advance_tick();
        }
        assert_eq!(ch.outcome(), Some(ChallengeOutcome::Correct));
    }

    #[test]
    fn provider_failure_times_out_within_grace() {
        let tuning = Tuning::default();
        let mut ch = Challenge::new(&tuning);
        ch.load_failed();
        for _ in 0..(tuning.challenge_grace_secs as u64 * TICK_HZ) {
            ch.advance_tick();
        }
        assert_eq!(ch.outcome(), Some(ChallengeOutcome::TimedOut));
    }

    #[test]
    fn answers_ignored_while_loading() {
        let mut ch = Challenge::new(&Tuning::default());
        ch.submit_answer(42);
        assert!(ch.outcome().is_none());
    }

    #[test]
    fn asset_retries_are_bounded() {
        let mut ch = ready_challenge(42);
        assert_eq!(ch.asset_failed(), ImageRetry::Retry(1));
        assert_eq!(ch.asset_failed(), ImageRetry::Retry(2));
        assert_eq!(ch.asset_failed(), ImageRetry::TextOnly);
        assert!(ch.text_only);
        // Submission still possible after fallback
        ch.submit_answer(42);
        assert_eq!(ch.outcome(), Some(ChallengeOutcome::Correct));
    }
}
