//! GPT engine: the per-contract section 7702 state machine.
//!
//! Grounded on `original_source/gpt7702.{hpp,cpp}`. Dequeue order within
//! `update_gpt` is fixed: f1A_decrease -> exch_1035 -> adj_event ->
//! increment_boy -> force_out (see the transition table in
//! `gpt7702.hpp`'s doc comment, carried into SPEC_FULL.md §4.6).

use crate::error::{Lmi7702Error, Result};
use crate::params::{DefnLifeIns, GlpOrGsp, RoundTo};

use super::charges::GptScalarParms;
use super::commfns::GptCfTriad;

/// Mutable per-contract GPT state. Holds a `GptCfTriad` by value; the
/// triad is immutable once constructed and may be `Clone`d or wrapped in
/// an `Arc` by the caller to share across contracts cheaply.
#[derive(Debug)]
pub struct GptEngine {
    cf: GptCfTriad,
    s_parms: GptScalarParms,
    defn_life_ins: DefnLifeIns,
    duration: u32,
    fractional_duration: f64,

    /// Unrounded GLP: accumulated rounding error over 100 years would
    /// distort the guideline limit if this were stored rounded.
    glp: f64,
    cum_glp: f64,
    gsp: f64,

    cum_f1a: f64,
    forceout_amount: f64,
    rejected_pmt: f64,

    queued_exch_1035: bool,
    queued_exch_1035_amt: f64,
    queued_f1a_decrease: bool,
    queued_f1a_decrement: f64,
    queued_adj_event: bool,

    round_currency: RoundTo,
}

impl GptEngine {
    /// `initialize_gpt`: if issued today (duration 0, fractional_duration
    /// 0), compute GLP/GSP from first principles via the commutation
    /// triad; otherwise accept inforce values and, on an exact
    /// anniversary, advance `cum_glp` by one annual step.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize_gpt(
        cf: GptCfTriad,
        defn_life_ins: DefnLifeIns,
        fractional_duration: f64,
        inforce_glp: f64,
        inforce_cum_glp: f64,
        inforce_gsp: f64,
        inforce_cum_f1a: f64,
        parms: GptScalarParms,
    ) -> Result<Self> {
        parms.validate_all().map_err(Lmi7702Error::Validation)?;
        if !(0.0..1.0).contains(&fractional_duration) {
            return Err(Lmi7702Error::domain(format!(
                "initialize_gpt: fractional_duration {fractional_duration} outside [0, 1)"
            )));
        }

        let issued_today = parms.duration == 0 && fractional_duration == 0.0;

        let (glp, cum_glp, gsp) = if issued_today {
            let glp = cf.calculate_premium(GlpOrGsp::Glp, &parms)?;
            let gsp = cf.calculate_premium(GlpOrGsp::Gsp, &parms)?;
            (glp, glp, gsp)
        } else if fractional_duration == 0.0 {
            (inforce_glp, inforce_cum_glp + inforce_glp, inforce_gsp)
        } else {
            (inforce_glp, inforce_cum_glp, inforce_gsp)
        };

        let round_currency = RoundTo::cents();
        let duration = parms.duration;
        let engine = Self {
            cf,
            s_parms: parms,
            defn_life_ins,
            duration,
            fractional_duration,
            glp,
            cum_glp,
            gsp,
            cum_f1a: inforce_cum_f1a,
            forceout_amount: 0.0,
            rejected_pmt: 0.0,
            queued_exch_1035: false,
            queued_exch_1035_amt: 0.0,
            queued_f1a_decrease: false,
            queued_f1a_decrement: 0.0,
            queued_adj_event: false,
            round_currency,
        };

        debug_assert!(
            engine.defn_life_ins != DefnLifeIns::Gpt
                || engine.cum_f1a <= engine.guideline_limit() + 1e-6,
            "initialize_gpt: cum_f1a exceeds guideline_limit"
        );

        Ok(engine)
    }

    /// Round-down-to-cents(max(cum_glp, gsp)): the guideline limit against
    /// which `cum_f1A` is compared.
    pub fn guideline_limit(&self) -> f64 {
        let round_down = RoundTo::new(2, crate::params::RoundingStyle::Downward);
        round_down.round(self.cum_glp.max(self.gsp))
    }

    pub fn cum_f1a(&self) -> f64 {
        self.cum_f1a
    }

    pub fn cum_glp(&self) -> f64 {
        self.cum_glp
    }

    pub fn glp(&self) -> f64 {
        self.glp
    }

    pub fn gsp(&self) -> f64 {
        self.gsp
    }

    pub fn forceout_amount(&self) -> f64 {
        self.forceout_amount
    }

    pub fn rejected_pmt(&self) -> f64 {
        self.rejected_pmt
    }

    fn is_cvat(&self) -> bool {
        self.defn_life_ins == DefnLifeIns::Cvat
    }

    /// Queue an inbound section 1035 exchange. `gross` must be positive:
    /// the queued flag and its amount are consistent by construction
    /// (flag set iff amount nonzero).
    pub fn enqueue_exch_1035(&mut self, gross: f64) -> Result<()> {
        if gross <= 0.0 {
            return Err(Lmi7702Error::domain(
                "enqueue_exch_1035: gross amount must be positive",
            ));
        }
        self.queued_exch_1035 = true;
        self.queued_exch_1035_amt = gross;
        log::debug!("gpt engine: queued 1035 exchange of {gross}");
        Ok(())
    }

    /// Queue a premium withdrawal that decreases cumulative 7702(f)(1)(A)
    /// premiums paid.
    pub fn enqueue_f1a_decrease(&mut self, decrement: f64) -> Result<()> {
        if decrement <= 0.0 {
            return Err(Lmi7702Error::domain(
                "enqueue_f1a_decrease: decrement must be positive",
            ));
        }
        self.queued_f1a_decrease = true;
        self.queued_f1a_decrement = decrement;
        log::debug!("gpt engine: queued f1A decrease of {decrement}");
        Ok(())
    }

    /// Queue a guideline-adjustment event (DBO change, specamt change
    /// yielding a death-benefit change, or QAB change). No data is stored;
    /// the new scalar parameters are captured when `update_gpt` is next
    /// called.
    pub fn enqueue_adj_event(&mut self) {
        self.queued_adj_event = true;
        log::debug!("gpt engine: queued adjustment event");
    }

    /// Execute the A+B-C guideline adjustment against `new_parms` for
    /// both GLP and GSP: A is the stored premium before the change; B is
    /// the premium at `new_parms`; C is the premium at the old parameters
    /// evaluated at the new duration.
    fn adjust_guidelines(&mut self, new_parms: &GptScalarParms) -> Result<()> {
        let mut c_parms = self.s_parms;
        c_parms.duration = new_parms.duration;

        let a_glp = self.glp;
        let b_glp = self.cf.calculate_premium(GlpOrGsp::Glp, new_parms)?;
        let c_glp = self.cf.calculate_premium(GlpOrGsp::Glp, &c_parms)?;
        let new_glp = a_glp + b_glp - c_glp;

        let a_gsp = self.gsp;
        let b_gsp = self.cf.calculate_premium(GlpOrGsp::Gsp, new_parms)?;
        let c_gsp = self.cf.calculate_premium(GlpOrGsp::Gsp, &c_parms)?;
        let new_gsp = a_gsp + b_gsp - c_gsp;

        self.glp = new_glp;
        self.gsp = new_gsp;
        self.s_parms = *new_parms;
        Ok(())
    }

    /// `update_gpt`: process queued events in the fixed dequeue order,
    /// advance the policy year if warranted, and force out any excess.
    /// Returns the amount forced out.
    pub fn update_gpt(
        &mut self,
        parms: GptScalarParms,
        fractional_duration: f64,
        f2a_value: f64,
    ) -> Result<f64> {
        parms.validate_all().map_err(Lmi7702Error::Validation)?;

        if self.is_cvat() {
            self.s_parms = parms;
            self.fractional_duration = fractional_duration;
            return Ok(0.0);
        }

        let new_policy_year = fractional_duration == 0.0 && parms.duration == self.duration + 1;
        if parms.duration > self.duration + 1 {
            return Err(Lmi7702Error::domain(
                "update_gpt: duration may advance by at most one policy year per call",
            ));
        }

        if self.queued_f1a_decrease {
            self.cum_f1a -= self.queued_f1a_decrement;
            self.queued_f1a_decrease = false;
            self.queued_f1a_decrement = 0.0;
        }

        if self.queued_exch_1035 {
            let gross = self.queued_exch_1035_amt;
            debug_assert!(
                self.duration == 0 && self.cum_f1a == 0.0,
                "update_gpt: 1035 exchange precondition violated"
            );
            self.cum_f1a += gross;
            self.queued_exch_1035 = false;
            self.queued_exch_1035_amt = 0.0;
        }

        if self.queued_adj_event {
            self.adjust_guidelines(&parms)?;
            self.queued_adj_event = false;
        } else {
            self.s_parms = parms;
        }

        if new_policy_year {
            self.duration = parms.duration;
            self.cum_glp += self.glp;
        }
        self.fractional_duration = fractional_duration;

        let forceout = self.force_out(f2a_value)?;

        debug_assert!(
            self.cum_f1a <= self.guideline_limit() + 1e-6,
            "update_gpt: cum_f1a exceeds guideline_limit after processing"
        );

        Ok(forceout)
    }

    /// `accept_payment`: returns the accepted portion.
    /// `allowed = max(0, guideline_limit - cum_f1A)`,
    /// `accepted = min(allowed, payment)`, `rejected = payment - accepted`.
    pub fn accept_payment(&mut self, payment: f64) -> Result<f64> {
        if payment < 0.0 {
            return Err(Lmi7702Error::domain(
                "accept_payment: payment must be nonnegative",
            ));
        }
        if self.is_cvat() {
            self.cum_f1a += payment;
            self.rejected_pmt = 0.0;
            return Ok(payment);
        }
        let allowed = (self.guideline_limit() - self.cum_f1a).max(0.0);
        let accepted = allowed.min(payment);
        let rejected = payment - accepted;
        self.cum_f1a = self.round_currency.round(self.cum_f1a + accepted);
        self.rejected_pmt = rejected;
        debug_assert!(
            (accepted + rejected - payment).abs() < 1e-9,
            "accept_payment: accepted + rejected must equal payment"
        );
        Ok(accepted)
    }

    /// `force_out`: returns the amount forced out.
    /// If `cum_f1A <= guideline_limit`, returns 0; otherwise forces out
    /// `min(f2A_value, cum_f1A - guideline_limit)`.
    pub fn force_out(&mut self, f2a_value: f64) -> Result<f64> {
        if self.is_cvat() {
            self.forceout_amount = 0.0;
            return Ok(0.0);
        }
        let limit = self.guideline_limit();
        if self.cum_f1a <= limit {
            self.forceout_amount = 0.0;
            return Ok(0.0);
        }
        let before = self.cum_f1a;
        let forceout = f2a_value.min(self.cum_f1a - limit);
        self.cum_f1a -= forceout;
        self.forceout_amount = forceout;
        debug_assert!(
            (before - self.cum_f1a - forceout).abs() < 1e-9,
            "force_out: conservation invariant violated"
        );
        debug_assert!(self.cum_f1a <= limit + 1e-6);
        Ok(forceout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DbOpt;

    fn charges(len: usize) -> super::super::charges::GptVectorParms {
        super::super::charges::GptVectorParms::builder()
            .prem_load_target(vec![0.06; len])
            .prem_load_excess(vec![0.02; len])
            .policy_fee_monthly(vec![5.0; len])
            .policy_fee_annual(vec![0.0; len])
            .specamt_load_monthly(vec![0.0002; len])
            .qab_gio_rate(vec![0.0; len])
            .qab_adb_rate(vec![0.0; len])
            .qab_term_rate(vec![0.0; len])
            .qab_spouse_rate(vec![0.0; len])
            .qab_child_rate(vec![0.0; len])
            .qab_waiver_rate(vec![0.0; len])
            .build()
    }

    fn triad(n: usize) -> GptCfTriad {
        let qc = vec![0.0005; n];
        let ic = vec![0.005; n];
        let ig = vec![0.0033; n];
        GptCfTriad::new(&qc, &ic, &ig, &ic, &ig, &charges(n)).unwrap()
    }

    fn parms(duration: u32, specamt: f64) -> GptScalarParms {
        GptScalarParms::builder()
            .duration(duration)
            .f3_bft(specamt)
            .endt_bft(specamt)
            .target_prem(10_000.0)
            .chg_sa_base(specamt)
            .dbopt_7702(DbOpt::Option1)
            .qab_gio_amt(0.0)
            .qab_adb_amt(0.0)
            .qab_term_amt(0.0)
            .qab_spouse_amt(0.0)
            .qab_child_amt(0.0)
            .qab_waiver_amt(0.0)
            .build()
    }

    #[test]
    fn exch_1035_inbound_at_issue_increases_cum_f1a_with_no_forceout() {
        let cf = triad(40);
        let mut engine = GptEngine::initialize_gpt(
            cf,
            DefnLifeIns::Gpt,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            parms(0, 1_000_000.0),
        )
        .unwrap();

        engine.enqueue_exch_1035(50_000.0).unwrap();
        let forceout = engine.update_gpt(parms(0, 1_000_000.0), 0.0, 0.0).unwrap();
        assert_eq!(engine.cum_f1a(), 50_000.0);
        assert_eq!(forceout, 0.0);
    }

    #[test]
    fn accept_payment_conserves_accepted_plus_rejected() {
        let cf = triad(40);
        let mut engine =
            GptEngine::initialize_gpt(cf, DefnLifeIns::Gpt, 0.0, 0.0, 0.0, 0.0, 0.0, parms(0, 1_000_000.0))
                .unwrap();
        // force a small guideline limit scenario by using small benefit
        let accepted = engine.accept_payment(1_000.0).unwrap();
        let rejected = engine.rejected_pmt();
        assert_abs_diff_eq(accepted + rejected, 1_000.0);
    }

    #[test]
    fn cvat_mode_accepts_full_payment_unconditionally() {
        let cf = triad(40);
        let mut engine = GptEngine::initialize_gpt(
            cf,
            DefnLifeIns::Cvat,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            parms(0, 1_000_000.0),
        )
        .unwrap();
        let accepted = engine.accept_payment(999_999.0).unwrap();
        assert_eq!(accepted, 999_999.0);
        assert_eq!(engine.rejected_pmt(), 0.0);
    }

    #[test]
    fn force_out_conservation_and_limit_respected() {
        let cf = triad(40);
        let mut engine = GptEngine::initialize_gpt(
            cf,
            DefnLifeIns::Gpt,
            0.0,
            0.0,
            0.0,
            0.0,
            0.0,
            parms(0, 1_000_000.0),
        )
        .unwrap();
        engine.accept_payment(engine.guideline_limit()).unwrap();
        let before = engine.cum_f1a();
        let forceout = engine.force_out(f64::MAX).unwrap();
        assert_eq!(before - engine.cum_f1a(), forceout);
        assert!(engine.cum_f1a() <= engine.guideline_limit() + 1e-6);
    }

    fn assert_abs_diff_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }
}
