//! Universal-life (UL) commutation functions, per Eckley's TSA XXIX
//! formulas.
//!
//! Grounded on `original_source/commutation_functions.{hpp,cpp}`'s
//! `ULCommFns` class (see SPEC_FULL.md §4.4).

use crate::error::{Lmi7702Error, Result};
use crate::math::back_sum;
use crate::params::{DbOpt, Mode};
use bon::bon;

/// Immutable UL commutation-function state {aD, kD, kC, aN, kM, EaD, aDω}.
#[derive(Debug, Clone)]
pub struct UlCommFns {
    /// Annual D: aD[0] = 1; aD[t+1] = aD[t] * vp^periods_per_year.
    pub a_d: Vec<f64>,
    /// Modal D: kD[t] = ka * aD[t].
    pub k_d: Vec<f64>,
    /// Modal C: kC[t] = ka * aD[t] * v * q.
    pub k_c: Vec<f64>,
    /// Annual N: backward partial sum of aD.
    pub a_n: Vec<f64>,
    /// Modal M: backward partial sum of kC.
    pub k_m: Vec<f64>,
    /// "End" annual D: EaD[t] = aD[t+1].
    pub ea_d: Vec<f64>,
    /// aD at the end of the last duration -- the endowment-duration D.
    pub a_d_omega: f64,
}

#[bon]
impl UlCommFns {
    #[builder]
    pub fn new(
        qc: Vec<f64>,
        ic: Vec<f64>,
        ig: Vec<f64>,
        dbopt: DbOpt,
        mode: Mode,
    ) -> Result<Self> {
        let n = qc.len();
        if ic.len() != n || ig.len() != n {
            return Err(Lmi7702Error::structural(format!(
                "UlCommFns: qc (len {n}), ic (len {}), ig (len {}) must have equal length",
                ic.len(),
                ig.len()
            )));
        }
        for (t, &q) in qc.iter().enumerate() {
            if !(0.0..=1.0).contains(&q) {
                return Err(Lmi7702Error::domain(format!(
                    "UlCommFns: qc[{t}] = {q} outside [0, 1]"
                )));
            }
        }
        for (t, &rate) in ic.iter().enumerate() {
            if !(0.0..1.0).contains(&rate) {
                return Err(Lmi7702Error::domain(format!(
                    "UlCommFns: ic[{t}] = {rate} outside [0, 1)"
                )));
            }
        }
        for (t, &rate) in ig.iter().enumerate() {
            if !(-1.0..1.0).contains(&rate) {
                return Err(Lmi7702Error::domain(format!(
                    "UlCommFns: ig[{t}] = {rate} outside (-1, 1)"
                )));
            }
        }

        let periods_per_year = mode.periods_per_year() as f64;
        let months_per_period = mode.months_per_period() as f64;

        let mut a_d = vec![0.0; n + 1];
        let mut k_d = vec![0.0; n];
        let mut k_c = vec![0.0; n];
        a_d[0] = 1.0;

        for t in 0..n {
            let f = qc[t] * (1.0 + ic[t]) / (1.0 + ig[t]);
            let g = 1.0 / (1.0 + f);
            let mut i = (ic[t] + ig[t] * f) * g;
            let q = f * g;
            if dbopt == DbOpt::Option2 {
                i -= q;
            }
            let v = 1.0 / (1.0 + i);
            let p = 1.0 - q;
            let vp = v * p;
            let vp12 = vp.powi(12);
            let vpn = vp.powf(periods_per_year);

            let ka = if vp == 1.0 {
                1.0
            } else {
                (1.0 - vp12) / (1.0 - vp.powf(months_per_period))
            };

            k_d[t] = ka * a_d[t];
            k_c[t] = ka * a_d[t] * v * q;
            a_d[t + 1] = a_d[t] * vpn;
        }

        let ea_d = a_d[1..].to_vec();
        a_d.truncate(n);
        let a_d_omega = *ea_d.last().unwrap_or(&1.0);

        let a_n = back_sum(&a_d);
        let k_m = back_sum(&k_c);

        Ok(Self {
            a_d,
            k_d,
            k_c,
            a_n,
            k_m,
            ea_d,
            a_d_omega,
        })
    }

    pub fn len(&self) -> usize {
        self.a_d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a_d.is_empty()
    }
}
