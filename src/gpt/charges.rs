//! GPT charge vectors and per-transaction scalar parameters.
//!
//! Grounded on `original_source/gpt_commutation_functions.hpp`'s
//! `gpt_vector_parms`/`gpt_scalar_parms` structs. Cross-field validation
//! follows this crate's `validate_all()` pattern in `params.rs`: garde
//! attribute checks first, then a hand-written pass collecting
//! `(path, message)` pairs into a `garde::Report`.

use crate::params::DbOpt;
use bon::Builder;
use garde::Validate;

/// Loads, fees, and monthly QAB rates used in GPT calculations, one entry
/// per duration from issue through the statutory maturity age.
///
/// It is simpler to pass these around as one parameter object than as
/// eleven separate vectors.
#[derive(Debug, Clone, Validate, Builder)]
#[garde(allow_unvalidated)]
pub struct GptVectorParms {
    pub prem_load_target: Vec<f64>,
    pub prem_load_excess: Vec<f64>,
    pub policy_fee_monthly: Vec<f64>,
    pub policy_fee_annual: Vec<f64>,
    pub specamt_load_monthly: Vec<f64>,
    pub qab_gio_rate: Vec<f64>,
    pub qab_adb_rate: Vec<f64>,
    pub qab_term_rate: Vec<f64>,
    pub qab_spouse_rate: Vec<f64>,
    pub qab_child_rate: Vec<f64>,
    pub qab_waiver_rate: Vec<f64>,
}

impl GptVectorParms {
    /// Validate with cross-field validation: every vector must share the
    /// same length.
    pub fn validate_all(&self) -> Result<(), garde::Report> {
        self.validate()?;
        self.validate_lengths()
    }

    fn validate_lengths(&self) -> Result<(), garde::Report> {
        let lengths = [
            ("prem_load_target", self.prem_load_target.len()),
            ("prem_load_excess", self.prem_load_excess.len()),
            ("policy_fee_monthly", self.policy_fee_monthly.len()),
            ("policy_fee_annual", self.policy_fee_annual.len()),
            ("specamt_load_monthly", self.specamt_load_monthly.len()),
            ("qab_gio_rate", self.qab_gio_rate.len()),
            ("qab_adb_rate", self.qab_adb_rate.len()),
            ("qab_term_rate", self.qab_term_rate.len()),
            ("qab_spouse_rate", self.qab_spouse_rate.len()),
            ("qab_child_rate", self.qab_child_rate.len()),
            ("qab_waiver_rate", self.qab_waiver_rate.len()),
        ];
        let expected = lengths[0].1;
        let mut report = garde::Report::new();
        for (name, len) in lengths {
            if len != expected {
                report.append(
                    garde::Path::new(name),
                    garde::Error::new(format!(
                        "length {len} does not match prem_load_target's length {expected}"
                    )),
                );
            }
        }
        if report.is_empty() { Ok(()) } else { Err(report) }
    }

    pub fn len(&self) -> usize {
        self.prem_load_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prem_load_target.is_empty()
    }
}

/// Scalar parameters for a single GPT premium calculation at a given
/// duration.
///
/// `chg_sa_base` is the base for any specified-amount load; it may differ
/// from specamt (e.g. limited to a scalar maximum, or fixed at issue).
#[derive(Debug, Clone, Copy, Validate, Builder)]
#[garde(allow_unvalidated)]
pub struct GptScalarParms {
    pub duration: u32,
    pub f3_bft: f64,
    pub endt_bft: f64,
    pub target_prem: f64,
    pub chg_sa_base: f64,
    pub dbopt_7702: DbOpt,
    pub qab_gio_amt: f64,
    pub qab_adb_amt: f64,
    pub qab_term_amt: f64,
    pub qab_spouse_amt: f64,
    pub qab_child_amt: f64,
    pub qab_waiver_amt: f64,
}

impl GptScalarParms {
    pub fn validate_all(&self) -> Result<(), garde::Report> {
        self.validate()?;
        if self.endt_bft > self.f3_bft {
            let mut report = garde::Report::new();
            report.append(
                garde::Path::new("endt_bft"),
                garde::Error::new(format!(
                    "endt_bft {} exceeds f3_bft {}",
                    self.endt_bft, self.f3_bft
                )),
            );
            return Err(report);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parms(len: usize) -> GptVectorParms {
        GptVectorParms::builder()
            .prem_load_target(vec![0.05; len])
            .prem_load_excess(vec![0.02; len])
            .policy_fee_monthly(vec![5.0; len])
            .policy_fee_annual(vec![0.0; len])
            .specamt_load_monthly(vec![0.0001; len])
            .qab_gio_rate(vec![0.0; len])
            .qab_adb_rate(vec![0.0; len])
            .qab_term_rate(vec![0.0; len])
            .qab_spouse_rate(vec![0.0; len])
            .qab_child_rate(vec![0.0; len])
            .qab_waiver_rate(vec![0.0; len])
            .build()
    }

    #[test]
    fn accepts_equal_length_vectors() {
        assert!(parms(10).validate_all().is_ok());
    }

    #[test]
    fn rejects_mismatched_vector_length() {
        let mut p = parms(10);
        p.qab_waiver_rate = vec![0.0; 9];
        assert!(p.validate_all().is_err());
    }

    #[test]
    fn scalar_parms_rejects_endt_exceeding_f3() {
        let p = GptScalarParms::builder()
            .duration(0)
            .f3_bft(100_000.0)
            .endt_bft(150_000.0)
            .target_prem(1_000.0)
            .chg_sa_base(100_000.0)
            .dbopt_7702(DbOpt::Option1)
            .qab_gio_amt(0.0)
            .qab_adb_amt(0.0)
            .qab_term_amt(0.0)
            .qab_spouse_amt(0.0)
            .qab_child_amt(0.0)
            .qab_waiver_amt(0.0)
            .build();
        assert!(p.validate_all().is_err());
    }
}
