//! GPT commutation triad: three specialized UL commutation-function
//! objects (GLP@opt1, GLP@opt2, GSP@opt1) with charges folded in.
//!
//! Grounded on
//! `original_source/gpt_commutation_functions.{hpp,cpp}`.
//! Only the specialized vectors `calculate_premium` needs are kept; the
//! canonical {C, D, N} this type is built from are discarded once
//! construction completes, matching the C++ original's design note that
//! "once they're set, the canonical commutation functions ... can be
//! discarded."

use crate::commutation::UlCommFns;
use crate::error::{Lmi7702Error, Result};
use crate::math::back_sum;
use crate::params::{DbOpt, GlpOrGsp, Mode};

use super::charges::{GptScalarParms, GptVectorParms};

/// Specialized commutation functions on one basis (one interest pair, one
/// death-benefit option). Not exposed outside this module: only
/// [`GptCfTriad`] constructs and uses it.
#[derive(Debug, Clone)]
struct GptCommFns {
    m: Vec<f64>,
    d_endt: f64,
    d_net_tgt: Vec<f64>,
    d_net_exc: Vec<f64>,
    n_net_tgt: Vec<f64>,
    n_net_exc: Vec<f64>,
    n_chg_pol: Vec<f64>,
    n_chg_sa: Vec<f64>,
    n_qab_gio: Vec<f64>,
    n_qab_adb: Vec<f64>,
    n_qab_term: Vec<f64>,
    n_qab_spouse: Vec<f64>,
    n_qab_child: Vec<f64>,
    n_qab_waiver: Vec<f64>,
}

fn elementwise_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}

fn elementwise_scaled_complement(a: &[f64], load: &[f64]) -> Vec<f64> {
    a.iter().zip(load).map(|(x, l)| x * (1.0 - l)).collect()
}

fn elementwise_add(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

impl GptCommFns {
    fn new(
        qc: &[f64],
        ic: &[f64],
        ig: &[f64],
        dbo: DbOpt,
        charges: &GptVectorParms,
    ) -> Result<Self> {
        let cf = UlCommFns::builder()
            .qc(qc.to_vec())
            .ic(ic.to_vec())
            .ig(ig.to_vec())
            .dbopt(dbo)
            .mode(Mode::Monthly)
            .build()?;

        if cf.len() != charges.len() {
            return Err(Lmi7702Error::structural(format!(
                "GptCommFns: commutation length {} does not match charges length {}",
                cf.len(),
                charges.len()
            )));
        }

        let m = cf.k_m.clone();
        let d_endt = cf.a_d_omega;

        let d_net_tgt = elementwise_scaled_complement(&cf.a_d, &charges.prem_load_target);
        let d_net_exc = elementwise_scaled_complement(&cf.a_d, &charges.prem_load_excess);
        let n_net_tgt = back_sum(&d_net_tgt);
        let n_net_exc = back_sum(&d_net_exc);

        let pol_fee_expense = elementwise_add(
            &elementwise_mul(&cf.a_d, &charges.policy_fee_annual),
            &elementwise_mul(&cf.k_d, &charges.policy_fee_monthly),
        );
        let n_chg_pol = back_sum(&pol_fee_expense);

        let sa_expense = elementwise_mul(&cf.k_d, &charges.specamt_load_monthly);
        let n_chg_sa = back_sum(&sa_expense);

        let n_qab_gio = back_sum(&elementwise_mul(&cf.k_d, &charges.qab_gio_rate));
        let n_qab_adb = back_sum(&elementwise_mul(&cf.k_d, &charges.qab_adb_rate));
        let n_qab_term = back_sum(&elementwise_mul(&cf.k_d, &charges.qab_term_rate));
        let n_qab_spouse = back_sum(&elementwise_mul(&cf.k_d, &charges.qab_spouse_rate));
        let n_qab_child = back_sum(&elementwise_mul(&cf.k_d, &charges.qab_child_rate));
        let n_qab_waiver = back_sum(&elementwise_mul(&cf.k_d, &charges.qab_waiver_rate));

        if d_endt <= 0.0 {
            return Err(Lmi7702Error::domain("GptCommFns: D_endt must be positive"));
        }
        if d_net_tgt.iter().any(|&v| v <= 0.0) {
            return Err(Lmi7702Error::domain(
                "GptCommFns: every D_net_tgt value must be positive",
            ));
        }
        if d_net_exc.iter().any(|&v| v <= 0.0) {
            return Err(Lmi7702Error::domain(
                "GptCommFns: every D_net_exc value must be positive",
            ));
        }

        Ok(Self {
            m,
            d_endt,
            d_net_tgt,
            d_net_exc,
            n_net_tgt,
            n_net_exc,
            n_chg_pol,
            n_chg_sa,
            n_qab_gio,
            n_qab_adb,
            n_qab_term,
            n_qab_spouse,
            n_qab_child,
            n_qab_waiver,
        })
    }

    fn calculate_premium(&self, glp_or_gsp: GlpOrGsp, args: &GptScalarParms) -> f64 {
        let j = args.duration as usize;
        let numerator = self.d_endt * args.endt_bft
            + self.m[j] * args.f3_bft
            + self.n_chg_pol[j]
            + self.n_chg_sa[j] * args.chg_sa_base
            + self.n_qab_gio[j] * args.qab_gio_amt
            + self.n_qab_adb[j] * args.qab_adb_amt
            + self.n_qab_term[j] * args.qab_term_amt
            + self.n_qab_spouse[j] * args.qab_spouse_amt
            + self.n_qab_child[j] * args.qab_child_amt
            + self.n_qab_waiver[j] * args.qab_waiver_amt;

        let (denom_tgt, denom_exc) = match glp_or_gsp {
            GlpOrGsp::Gsp => (self.d_net_tgt[j], self.d_net_exc[j]),
            GlpOrGsp::Glp => (self.n_net_tgt[j], self.n_net_exc[j]),
        };

        let z = numerator / denom_tgt;
        let premium = if z <= args.target_prem {
            z
        } else {
            (numerator + args.target_prem * (denom_exc - denom_tgt)) / denom_exc
        };
        premium.max(0.0)
    }
}

/// Specialized GPT commutation functions on the three required bases:
/// GLP under each death-benefit option, and GSP (always under option 1 in
/// the statutory definition).
#[derive(Debug, Clone)]
pub struct GptCfTriad {
    cf_glp_dbo_1: GptCommFns,
    cf_glp_dbo_2: GptCommFns,
    cf_gsp: GptCommFns,
}

impl GptCfTriad {
    pub fn new(
        qc: &[f64],
        glp_ic: &[f64],
        glp_ig: &[f64],
        gsp_ic: &[f64],
        gsp_ig: &[f64],
        charges: &GptVectorParms,
    ) -> Result<Self> {
        charges
            .validate_all()
            .map_err(Lmi7702Error::Validation)?;
        Ok(Self {
            cf_glp_dbo_1: GptCommFns::new(qc, glp_ic, glp_ig, DbOpt::Option1, charges)?,
            cf_glp_dbo_2: GptCommFns::new(qc, glp_ic, glp_ig, DbOpt::Option2, charges)?,
            cf_gsp: GptCommFns::new(qc, gsp_ic, gsp_ig, DbOpt::Option1, charges)?,
        })
    }

    /// Calculate a premium on an explicitly specified death-benefit
    /// option, useful for unit testing and for the A+B-C adjustment
    /// formula's "old parameters" leg, which may differ from the
    /// contract's current dbopt.
    pub fn calculate_premium_with_dbo(
        &self,
        glp_or_gsp: GlpOrGsp,
        args: &GptScalarParms,
        dbo: DbOpt,
    ) -> Result<f64> {
        args.validate_all().map_err(Lmi7702Error::Validation)?;
        let premium = match glp_or_gsp {
            GlpOrGsp::Gsp => self.cf_gsp.calculate_premium(glp_or_gsp, args),
            GlpOrGsp::Glp => match dbo {
                DbOpt::Option1 => self.cf_glp_dbo_1.calculate_premium(glp_or_gsp, args),
                DbOpt::Option2 => self.cf_glp_dbo_2.calculate_premium(glp_or_gsp, args),
            },
        };
        Ok(premium)
    }

    /// Calculate a premium using the death-benefit option stored in
    /// `args.dbopt_7702`.
    pub fn calculate_premium(&self, glp_or_gsp: GlpOrGsp, args: &GptScalarParms) -> Result<f64> {
        self.calculate_premium_with_dbo(glp_or_gsp, args, args.dbopt_7702)
    }
}
