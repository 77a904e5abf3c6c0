//! Brent-Dekker root finder with currency-rounding wrapper.
//!
//! Grounded on `original_source/zero.hpp`'s `lmi_root`/`decimal_root`
//! templates. The trace-logging `os_trace` parameter of the C++ original is
//! replaced by `log::trace!` calls, so callers attach a subscriber (or
//! nothing, at zero cost when the level is filtered) instead of an injected
//! stream.

use crate::math::binary64_midpoint;
use crate::params::{MemoCache, RootStatus, bits_key};
use std::collections::hash_map::Entry;

/// Bias applied when `|m| <= tol` at convergence and more than one point
/// satisfies that test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootBias {
    /// Return `b`, Brent's default best approximation.
    None,
    /// Return `b` if `f(b) <= 0`, else return `c` when `c` itself
    /// satisfies the convergence tolerance.
    Lower,
    /// Symmetric to `Lower`: return `b` if `f(b) >= 0`, else `c`.
    Higher,
}

/// Outcome of a root-finding call: the result value plus a validity tag,
/// mirroring `root_type` in `zero.hpp`.
#[derive(Debug, Clone, Copy)]
pub struct RootResult {
    pub root: f64,
    pub validity: RootStatus,
    pub n_iter: u32,
    pub n_eval: u32,
}

const DBL_EPSILON: f64 = f64::EPSILON;

/// Find a zero of `f` in `[bound0, bound1]` via modified Brent-Dekker,
/// falling back to binary64-bit-pattern bisection after `sprauchling_limit`
/// evaluations.
///
/// Returns `z` with `|z - z_true| <= 6*eps*|z| + 2*tolerance` when a root is
/// bracketed. See SPEC_FULL.md §4.1.
pub fn find_root<F>(
    mut f: F,
    bound0: f64,
    bound1: f64,
    tolerance: f64,
    bias: RootBias,
    sprauchling_limit: u32,
) -> RootResult
where
    F: FnMut(f64) -> f64,
{
    if bound0 == bound1 {
        return RootResult {
            root: bound0,
            validity: RootStatus::ImproperBounds,
            n_iter: 0,
            n_eval: 0,
        };
    }

    let mut n_eval: u32 = 0;
    let mut eval = |x: f64, f: &mut F| {
        n_eval += 1;
        f(x)
    };

    let mut a = bound0;
    let mut b = bound1;
    let mut fa = eval(a, &mut f);
    if fa == 0.0 {
        return RootResult {
            root: a,
            validity: RootStatus::Valid,
            n_iter: 0,
            n_eval,
        };
    }
    let mut fb = eval(b, &mut f);
    if fb == 0.0 {
        return RootResult {
            root: b,
            validity: RootStatus::Valid,
            n_iter: 0,
            n_eval,
        };
    }

    if crate::math::signum(fa) == crate::math::signum(fb) {
        return RootResult {
            root: bound1,
            validity: RootStatus::NotBracketed,
            n_iter: 0,
            n_eval,
        };
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;
    let mut n_iter: u32 = 0;

    loop {
        n_iter += 1;

        if crate::math::signum(fb) == crate::math::signum(fc) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * DBL_EPSILON * b.abs() + tolerance;
        let m = 0.5 * (c - b);

        if m.abs() <= tol || fb == 0.0 {
            let result_b = RootResult {
                root: b,
                validity: RootStatus::Valid,
                n_iter,
                n_eval,
            };
            return match bias {
                RootBias::None => result_b,
                RootBias::Lower => {
                    if fb <= 0.0 {
                        result_b
                    } else {
                        let tol_c = 2.0 * DBL_EPSILON * c.abs() + tolerance;
                        if (c - b).abs() <= tol_c {
                            RootResult {
                                root: c,
                                ..result_b
                            }
                        } else {
                            result_b
                        }
                    }
                }
                RootBias::Higher => {
                    if fb >= 0.0 {
                        result_b
                    } else {
                        let tol_c = 2.0 * DBL_EPSILON * c.abs() + tolerance;
                        if (c - b).abs() <= tol_c {
                            RootResult {
                                root: c,
                                ..result_b
                            }
                        } else {
                            result_b
                        }
                    }
                }
            };
        }

        if n_eval > sprauchling_limit {
            let mid = binary64_midpoint(b, c);
            let fmid = eval(mid, &mut f);
            log::trace!(
                "find_root: sprauchling_limit exceeded ({n_eval} evals), binary64 bisection: mid={mid}, fmid={fmid}"
            );
            if crate::math::signum(fb) != crate::math::signum(fmid) {
                c = mid;
                fc = fmid;
            } else {
                a = b;
                fa = fb;
                b = mid;
                fb = fmid;
            }
            continue;
        }

        if tol < e.abs() && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q);
            if a == c {
                // Linear secant interpolation.
                p = 2.0 * m * s;
                q = 1.0 - s;
            } else {
                // Inverse quadratic interpolation.
                let q0 = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * m * q0 * (q0 - r) - (b - a) * (r - 1.0));
                q = (q0 - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            let s_old = e;
            e = d;
            // Three-quarters rule: accept the interpolated step only if it
            // makes meaningful progress and does not exceed 3/4 of the
            // prior bracket width.
            let k0 = 2.0 * p < 3.0 * m * q - (tol * q).abs();
            let k1 = p < (0.5 * s_old * q).abs();
            if k0 && k1 {
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;
        if tol < d.abs() {
            b += d;
        } else {
            b += if m > 0.0 { tol } else { -tol };
        }
        fb = eval(b, &mut f);
    }
}

/// `decimal_root`: wraps `f` in a rounding + memoizing evaluator so that
/// two unrounded Brent iterates that round to the same argument invoke `f`
/// only once, then rounds the final root to `decimals` places.
pub fn decimal_root<F>(
    mut f: F,
    bound0: f64,
    bound1: f64,
    bias: RootBias,
    decimals: i32,
    sprauchling_limit: u32,
) -> RootResult
where
    F: FnMut(f64) -> f64,
{
    let rounder = crate::params::RoundTo::new(decimals, crate::params::RoundingStyle::ToNearest);
    let mut cache: MemoCache = MemoCache::new();
    let tolerance = 0.5 * 10f64.powi(-decimals);

    let rounded_f = |x: f64| -> f64 {
        let rx = rounder.round(x);
        match cache.entry(bits_key(rx)) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let fx = f(rx);
                e.insert(fx);
                fx
            }
        }
    };

    let mut result = find_root(rounded_f, bound0, bound1, tolerance, bias, sprauchling_limit);
    result.root = rounder.round(result.root);
    result
}
