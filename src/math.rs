//! Math primitives: accurate `i`-conversion functions, partial-sum
//! combinators, and the binary64-bit-pattern midpoint used by the
//! root finder's bisection fallback.
//!
//! Grounded on `original_source/math_functions.hpp`. Where the C++ reaches
//! for FDLIBM's `expm1`/`log1p` for cross-platform bit-identical results,
//! this crate uses `f64::exp_m1`/`f64::ln_1p` -- Rust's libm-backed standard
//! library implementations are the direct analogue of "system libm where
//! available and known-good" (see SPEC_FULL.md §9).

use crate::error::{Lmi7702Error, Result};

/// `i↑n/n` from `i`: the nominal rate compounded `n` times per year that is
/// equivalent to the effective annual rate `i`.
///
/// `expm1(log1p(i) / n)`, not `(1 + i).powf(1.0 / n) - 1.0` -- the latter
/// loses precision for small `i` exactly where accuracy matters most.
pub fn i_upper_n_over_n_from_i(i: f64, n: u32) -> Result<f64> {
    if i <= -1.0 {
        return Err(Lmi7702Error::domain(format!(
            "i_upper_n_over_n_from_i: i = {i} is not greater than -1"
        )));
    }
    Ok((i.ln_1p() / n as f64).exp_m1())
}

/// `i↑12/12` from `i`, the monthly nominal-effective rate.
pub fn i_upper_12_over_12_from_i(i: f64) -> Result<f64> {
    i_upper_n_over_n_from_i(i, 12)
}

/// The effective annual rate `i` equivalent to a nominal rate `i↑n/n`
/// compounded `n` times per year.
pub fn i_from_i_upper_n_over_n(i_upper_n_over_n: f64, n: u32) -> f64 {
    (i_upper_n_over_n.ln_1p() * n as f64).exp_m1()
}

pub fn i_from_i_upper_12_over_12(i_upper_12_over_12: f64) -> f64 {
    i_from_i_upper_n_over_n(i_upper_12_over_12, 12)
}

/// `d↑n` from `i`: the nominal discount rate compounded `n` times per year
/// equivalent to effective annual rate `i`.
pub fn d_upper_n_from_i(i: f64, n: u32) -> Result<f64> {
    if i <= -1.0 {
        return Err(Lmi7702Error::domain(format!(
            "d_upper_n_from_i: i = {i} is not greater than -1"
        )));
    }
    let n = n as f64;
    Ok(-n * (i.ln_1p() / -n).exp_m1())
}

pub fn d_upper_12_from_i(i: f64) -> Result<f64> {
    d_upper_n_from_i(i, 12)
}

/// Net rate after subtracting a spread and a flat fee from a gross nominal
/// rate, each expressed as `n`-times-per-year nominal rates.
pub fn net_i_from_gross(gross_i: f64, spread: f64, fee: f64, n: u32) -> Result<f64> {
    let n = n as f64;
    let gross_upper_n = i_upper_n_over_n_from_i(gross_i, n as u32)?;
    let net_upper_n = gross_upper_n - spread - fee;
    Ok(i_from_i_upper_n_over_n(net_upper_n, n as u32))
}

/// Monthly cost-of-insurance rate from an annual mortality rate `q`,
/// capped at `max_coi`.
pub fn coi_rate_from_q(q: f64, max_coi: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&max_coi) {
        return Err(Lmi7702Error::domain(format!(
            "coi_rate_from_q: max_coi = {max_coi} outside [0, 1]"
        )));
    }
    if q < 0.0 {
        return Err(Lmi7702Error::domain(format!(
            "coi_rate_from_q: q = {q} is negative"
        )));
    }
    if q == 0.0 {
        return Ok(0.0);
    }
    if q >= 1.0 {
        return Ok(max_coi);
    }
    let monthly_q = -(-q).ln_1p() / 12.0;
    let monthly_q = monthly_q.exp_m1();
    let monthly_q = -monthly_q;
    let coi = monthly_q / (1.0 - monthly_q);
    Ok(coi.min(max_coi))
}

/// Forward (running) partial sum: `out[t] = sum(v[0..=t])`.
pub fn fwd_sum(v: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    v.iter()
        .map(|x| {
            acc += x;
            acc
        })
        .collect()
}

/// Backward partial sum: `out[t] = sum(v[t..])`.
pub fn back_sum(v: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; v.len()];
    let mut acc = 0.0;
    for t in (0..v.len()).rev() {
        acc += v[t];
        out[t] = acc;
    }
    out
}

/// Elementwise arithmetic mean of two equal-length vectors.
pub fn assign_midpoint(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    if a.len() != b.len() {
        return Err(Lmi7702Error::structural(format!(
            "assign_midpoint: length mismatch {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b).map(|(x, y)| 0.5 * (x + y)).collect())
}

/// Sign of `x`: -1.0, 0.0, or 1.0, using the IEEE-754 sign bit so that
/// `signum(-0.0) == -1.0`.
pub fn signum(x: f64) -> f64 {
    if x == 0.0 {
        if x.is_sign_negative() { -1.0 } else { 1.0 }
    } else {
        x.signum()
    }
}

/// Bisect the IEEE-754 binary64 bit patterns of `d0` and `d1`, treating
/// them as unsigned integers. Used by the root finder's
/// `sprauchling_limit` fallback: guaranteed to converge in at most 64
/// further evaluations no matter how disparate the endpoints' magnitudes
/// are, unlike arithmetic bisection.
///
/// Grounded on `zero.hpp`'s `binary64_midpoint`.
pub fn binary64_midpoint(d0: f64, d1: f64) -> f64 {
    if d0 == 0.0 && d1 == 0.0 {
        return 0.0;
    }
    if signum(d0) != signum(d1) {
        return 0.0;
    }
    // One endpoint is a signed zero and the other is not: align the zero's
    // sign with the nonzero endpoint before bit-bisecting, so the two
    // patterns compare as same-signed integers.
    let (d0, d1) = match (d0 == 0.0, d1 == 0.0) {
        (true, false) => (d0.copysign(d1), d1),
        (false, true) => (d0, d1.copysign(d0)),
        _ => (d0, d1),
    };
    let u0 = d0.to_bits();
    let u1 = d1.to_bits();
    let mid = u0 / 2 + u1 / 2 + (u0 % 2 + u1 % 2) / 2;
    f64::from_bits(mid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn upper_n_over_n_round_trips_with_from_upper() {
        let i = 0.07;
        let nominal = i_upper_n_over_n_from_i(i, 12).unwrap();
        let back = i_from_i_upper_n_over_n(nominal, 12);
        assert_abs_diff_eq!(back, i, epsilon = 1e-13);
    }

    #[test]
    fn upper_12_over_12_matches_generic_n() {
        let i = 0.04;
        assert_abs_diff_eq!(
            i_upper_12_over_12_from_i(i).unwrap(),
            i_upper_n_over_n_from_i(i, 12).unwrap(),
        );
    }

    #[test]
    fn back_sum_matches_reverse_cumsum() {
        let v = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(back_sum(&v), vec![10.0, 9.0, 7.0, 4.0]);
    }

    #[test]
    fn fwd_sum_matches_cumsum() {
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(fwd_sum(&v), vec![1.0, 3.0, 6.0]);
    }

    #[test]
    fn coi_rate_from_q_zero_is_zero() {
        assert_eq!(coi_rate_from_q(0.0, 1.0 / 11.0).unwrap(), 0.0);
    }

    #[test]
    fn coi_rate_from_q_caps_at_max() {
        assert_eq!(coi_rate_from_q(1.0, 1.0 / 11.0).unwrap(), 1.0 / 11.0);
    }

    #[test]
    fn binary64_midpoint_opposite_signs_is_zero() {
        assert_eq!(binary64_midpoint(-1.0, 1.0), 0.0);
    }

    #[test]
    fn binary64_midpoint_same_value_is_that_value() {
        assert_eq!(binary64_midpoint(2.0, 2.0), 2.0);
    }

    #[test]
    fn binary64_midpoint_is_between_endpoints() {
        let m = binary64_midpoint(1.0, 2.0);
        assert!(1.0 < m && m < 2.0);
    }

    #[test]
    fn assign_midpoint_rejects_length_mismatch() {
        assert!(assign_midpoint(&[1.0, 2.0], &[1.0]).is_err());
    }
}
