//! IRC section 7702 interest-rate derivation.
//!
//! Grounded on `original_source/i7702.{hpp,cpp}`. The original pulls its
//! inputs from `product_database`/`stratified_charges` query objects; per
//! SPEC_FULL.md §4.8 this rewrite instead takes a plain struct of
//! already-resolved vectors/scalars, since querying a product database is
//! explicitly out of scope (§1).

use crate::error::Result;
use crate::math::i_upper_12_over_12_from_i;

const GLP_FLOOR: f64 = 0.04;
const GSP_FLOOR: f64 = 0.06;

/// Inputs the original pulls from `product_database`/`stratified_charges`:
/// one entry per duration unless noted otherwise.
#[derive(Debug, Clone)]
pub struct Irc7702RateParams {
    /// Contractual guaranteed annual interest rate.
    pub guar_int: Vec<f64>,
    /// Whether the product allows a variable (index-linked) loan rate.
    pub variable_loan_enabled: bool,
    /// Fixed loan rate, if `variable_loan_enabled` is false.
    pub fixed_loan_rate: Option<Vec<f64>>,
    /// Guaranteed regular-loan spread over the guaranteed rate.
    pub guar_reg_loan_spread: Vec<f64>,
    /// Current account-value load (subtracted from the gross rate).
    pub current_acct_val_load: Vec<f64>,
}

/// Derived monthly effective interest-rate vectors {ic, ig} on the
/// `usual`, `glp`, and `gsp` statutory bases.
#[derive(Debug, Clone)]
pub struct Irc7702InterestRates {
    ic_usual: Vec<f64>,
    ig_usual: Vec<f64>,
    ic_glp: Vec<f64>,
    ig_glp: Vec<f64>,
    ic_gsp: Vec<f64>,
    ig_gsp: Vec<f64>,
}

fn loan_spread_implied_rate(params: &Irc7702RateParams, t: usize) -> f64 {
    if params.variable_loan_enabled {
        params.guar_int[t] + params.guar_reg_loan_spread[t]
    } else {
        match &params.fixed_loan_rate {
            Some(rate) => rate[t] - params.guar_reg_loan_spread[t],
            None => params.guar_int[t],
        }
    }
}

fn annual_floor_rate(params: &Irc7702RateParams, floor: f64, t: usize) -> f64 {
    let contractual = params.guar_int[t];
    let loan_implied = loan_spread_implied_rate(params, t);
    floor.max(contractual).max(loan_implied)
}

fn to_monthly_net(annual_rate: f64, av_load: f64) -> Result<f64> {
    let monthly = i_upper_12_over_12_from_i(annual_rate)?;
    Ok(monthly - av_load)
}

impl Irc7702InterestRates {
    pub fn new(params: Irc7702RateParams) -> Result<Self> {
        let n = params.guar_int.len();
        let mut ic_usual = Vec::with_capacity(n);
        let mut ig_usual = Vec::with_capacity(n);
        let mut ic_glp = Vec::with_capacity(n);
        let mut ig_glp = Vec::with_capacity(n);
        let mut ic_gsp = Vec::with_capacity(n);
        let mut ig_gsp = Vec::with_capacity(n);

        for t in 0..n {
            let av_load = params.current_acct_val_load[t];

            let usual = annual_floor_rate(&params, GLP_FLOOR, t);
            ic_usual.push(to_monthly_net(usual, av_load)?);
            ig_usual.push(to_monthly_net(usual, av_load)?);

            let glp_rate = annual_floor_rate(&params, GLP_FLOOR, t);
            ic_glp.push(to_monthly_net(glp_rate, av_load)?);
            ig_glp.push(to_monthly_net(glp_rate, av_load)?);

            let gsp_rate = annual_floor_rate(&params, GSP_FLOOR, t);
            ic_gsp.push(to_monthly_net(gsp_rate, av_load)?);
            ig_gsp.push(to_monthly_net(gsp_rate, av_load)?);
        }

        Ok(Self {
            ic_usual,
            ig_usual,
            ic_glp,
            ig_glp,
            ic_gsp,
            ig_gsp,
        })
    }

    pub fn ic_usual(&self) -> &[f64] {
        &self.ic_usual
    }
    pub fn ig_usual(&self) -> &[f64] {
        &self.ig_usual
    }
    pub fn ic_glp(&self) -> &[f64] {
        &self.ic_glp
    }
    pub fn ig_glp(&self) -> &[f64] {
        &self.ig_glp
    }
    pub fn ic_gsp(&self) -> &[f64] {
        &self.ic_gsp
    }
    pub fn ig_gsp(&self) -> &[f64] {
        &self.ig_gsp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n: usize) -> Irc7702RateParams {
        Irc7702RateParams {
            guar_int: vec![0.03; n],
            variable_loan_enabled: false,
            fixed_loan_rate: None,
            guar_reg_loan_spread: vec![0.01; n],
            current_acct_val_load: vec![0.0005; n],
        }
    }

    #[test]
    fn gsp_floor_exceeds_glp_floor() {
        let rates = Irc7702InterestRates::new(params(5)).unwrap();
        for t in 0..5 {
            assert!(rates.ic_gsp()[t] > rates.ic_glp()[t]);
        }
    }

    #[test]
    fn glp_rate_at_least_statutory_floor_net_of_load() {
        let rates = Irc7702InterestRates::new(params(3)).unwrap();
        let floor_monthly = i_upper_12_over_12_from_i(GLP_FLOOR).unwrap() - 0.0005;
        for r in rates.ic_glp() {
            assert!(*r >= floor_monthly - 1e-12);
        }
    }
}
