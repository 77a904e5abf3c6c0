//! IRC section 7702A Modified Endowment Contract (MEC) testing.
//!
//! Not named explicitly in spec.md's component design, but required by
//! the layer table (§2, L7) and the glossary's 7PP/MEC entries. Grounded
//! on `original_source/ihs_irc7702a.hpp`, scoped to the testable core --
//! cumulative-premium vs. cumulative-7-pay-premium comparison, a one-way
//! MEC latch, and material-change restart -- per SPEC_FULL.md §4.9.

use crate::params::MecStatus;

/// Per-contract 7-pay test state.
#[derive(Debug, Clone)]
pub struct Irc7702A {
    seven_pay_premium: f64,
    cum_7pp: f64,
    cum_premiums: f64,
    became_mec: bool,

    /// A parallel 7-pay stream restarted at the most recent material
    /// change, tested independently of the whole-contract stream (the
    /// statute tests each material change's own 7 years on its own
    /// terms).
    restarted_seven_pay_premium: Option<f64>,
    restarted_cum_7pp: f64,
    restarted_cum_premiums: f64,
}

impl Irc7702A {
    pub fn new(seven_pay_premium: f64) -> Self {
        Self {
            seven_pay_premium,
            cum_7pp: seven_pay_premium,
            cum_premiums: 0.0,
            became_mec: false,
            restarted_seven_pay_premium: None,
            restarted_cum_7pp: 0.0,
            restarted_cum_premiums: 0.0,
        }
    }

    pub fn is_mec(&self) -> bool {
        self.became_mec
    }

    pub fn status(&self) -> MecStatus {
        if self.became_mec {
            MecStatus::Mec
        } else {
            MecStatus::NotMec
        }
    }

    pub fn cum_premiums(&self) -> f64 {
        self.cum_premiums
    }

    pub fn cum_7pp(&self) -> f64 {
        self.cum_7pp
    }

    /// Record a premium payment, and restart the 7-pay test if
    /// `material_change` indicates a benefit increase not due to
    /// scheduled/guaranteed values. Once `became_mec` latches true it
    /// never clears: "once a MEC, always a MEC."
    pub fn update(
        &mut self,
        premium_paid: f64,
        material_change: bool,
        restarted_seven_pay_premium: Option<f64>,
    ) {
        self.cum_premiums += premium_paid;
        self.cum_7pp += self.seven_pay_premium;
        if self.cum_premiums > self.cum_7pp {
            self.became_mec = true;
            log::debug!("7702A: contract became a MEC on the whole-contract 7-pay test");
        }

        if material_change {
            self.restarted_seven_pay_premium = restarted_seven_pay_premium;
            self.restarted_cum_7pp = restarted_seven_pay_premium.unwrap_or(0.0);
            self.restarted_cum_premiums = 0.0;
            log::debug!("7702A: material change restarted the 7-pay test");
        } else if let Some(sp) = self.restarted_seven_pay_premium {
            self.restarted_cum_premiums += premium_paid;
            self.restarted_cum_7pp += sp;
            if self.restarted_cum_premiums > self.restarted_cum_7pp {
                self.became_mec = true;
                log::debug!("7702A: contract became a MEC on the restarted 7-pay test");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_compliant_when_premiums_track_seven_pay_premium() {
        let mut m = Irc7702A::new(1_000.0);
        for _ in 0..7 {
            m.update(1_000.0, false, None);
        }
        assert_eq!(m.status(), MecStatus::NotMec);
    }

    #[test]
    fn becomes_mec_when_premium_exceeds_cumulative_seven_pay_premium() {
        let mut m = Irc7702A::new(1_000.0);
        m.update(5_000.0, false, None);
        assert_eq!(m.status(), MecStatus::Mec);
    }

    #[test]
    fn once_mec_stays_mec_even_after_compliant_subsequent_payments() {
        let mut m = Irc7702A::new(1_000.0);
        m.update(5_000.0, false, None);
        assert!(m.is_mec());
        m.update(0.0, false, None);
        assert!(m.is_mec());
    }

    #[test]
    fn material_change_restarts_a_parallel_seven_pay_stream() {
        let mut m = Irc7702A::new(1_000.0);
        m.update(1_000.0, false, None);
        m.update(0.0, true, Some(2_000.0));
        assert!(!m.is_mec());
        m.update(5_000.0, false, None);
        assert!(m.is_mec());
    }
}
