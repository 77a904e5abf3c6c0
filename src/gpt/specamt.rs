//! Specified-amount inversion: given a premium and duration, find the
//! specified amount that produces it.
//!
//! Grounded on `original_source/gpt_specamt.{hpp,cpp}`'s
//! `CalculateSpecAmt`/`FindSpecAmt`. The C++ original depends on a
//! `BasicValues`/`Irc7702` god-object to supply the objective function;
//! per SPEC_FULL.md §4.7 this rewrite instead takes the objective as an
//! explicit closure built by the caller from a [`GptCfTriad`] and
//! [`GptScalarParms`] pair, holding specamt as the free variable.

use crate::params::{RootBias, RootStatus, RoundTo};
use crate::root_finder::decimal_root;

const SPEC_AMT_SEARCH_MAX: f64 = 999_999_999.99;

/// Invert `objective(spec_amt) == 0` (typically
/// `gpt_premium_using_spec_amt_for_all_dependent_parameters(spec_amt) -
/// target_premium`) for the specified amount, over
/// `[product_minimum, 999_999_999.99]`.
///
/// Returns `(spec_amt, status)`. On `RootStatus::NotBracketed`, `spec_amt`
/// is `product_minimum` (the caller-visible fallback named in SPEC_FULL.md
/// §4.1/§4.7).
pub fn calculate_spec_amt<F>(
    objective: F,
    product_minimum: f64,
    bias: RootBias,
    round_to: RoundTo,
) -> (f64, RootStatus)
where
    F: FnMut(f64) -> f64,
{
    let result = decimal_root(
        objective,
        product_minimum,
        SPEC_AMT_SEARCH_MAX,
        bias,
        round_to.decimals,
        64,
    );
    match result.validity {
        RootStatus::Valid => (round_to.round(result.root), RootStatus::Valid),
        RootStatus::NotBracketed => (product_minimum, RootStatus::NotBracketed),
        RootStatus::ImproperBounds => (product_minimum, RootStatus::ImproperBounds),
    }
}

/// `CalculateGLPSpecAmt`: invert the GLP formula for specamt at a given
/// duration, using `cf` and the template scalar parameters (`f3_bft`,
/// `endt_bft`, and `chg_sa_base` are all driven by the trial specamt).
pub fn calculate_glp_spec_amt(
    cf: &super::commfns::GptCfTriad,
    mut parms: super::charges::GptScalarParms,
    target_premium: f64,
    product_minimum: f64,
) -> crate::error::Result<(f64, RootStatus)> {
    let round_to = RoundTo::new(2, crate::params::RoundingStyle::Upward);
    let objective = move |spec_amt: f64| -> f64 {
        parms.f3_bft = spec_amt;
        parms.endt_bft = spec_amt;
        parms.chg_sa_base = spec_amt;
        cf.calculate_premium(crate::params::GlpOrGsp::Glp, &parms)
            .unwrap_or(f64::NAN)
            - target_premium
    };
    Ok(calculate_spec_amt(
        objective,
        product_minimum,
        RootBias::Higher,
        round_to,
    ))
}

/// `CalculateGSPSpecAmt`: the GSP analogue of [`calculate_glp_spec_amt`].
pub fn calculate_gsp_spec_amt(
    cf: &super::commfns::GptCfTriad,
    mut parms: super::charges::GptScalarParms,
    target_premium: f64,
    product_minimum: f64,
) -> crate::error::Result<(f64, RootStatus)> {
    let round_to = RoundTo::new(2, crate::params::RoundingStyle::Upward);
    let objective = move |spec_amt: f64| -> f64 {
        parms.f3_bft = spec_amt;
        parms.endt_bft = spec_amt;
        parms.chg_sa_base = spec_amt;
        cf.calculate_premium(crate::params::GlpOrGsp::Gsp, &parms)
            .unwrap_or(f64::NAN)
            - target_premium
    };
    Ok(calculate_spec_amt(
        objective,
        product_minimum,
        RootBias::Higher,
        round_to,
    ))
}
