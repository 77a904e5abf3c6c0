//! CSO table selection, section 7702 CVAT corridor factor, and the
//! seven-pay premium.
//!
//! Named but not otherwise described in spec.md's component design (layer
//! table, §2 L4); supplemented from `original_source/irc7702_tables.cpp`,
//! `cso_table.hpp`, and `ihs_irc7702.hpp`. See SPEC_FULL.md §4.5b for the
//! scope decisions -- chiefly, the actual published CSO rate tables are
//! copyrighted SOA content absent from the retrieval pack, so table
//! selection here is a lookup against a caller-supplied
//! [`ActuarialTable`], not a baked-in numeric table.

use crate::actuarial_table::ActuarialTable;
use crate::commutation::OlCommFns;
use crate::error::Result;
use crate::params::{AlbOrAnb, CsoEra, Gender, SmokingBasis};

/// Identifies which CSO basis a q-vector lookup is for. Table selection
/// itself is the caller's responsibility (via an injected
/// [`ActuarialTable`]); this type exists so call sites document their
/// basis rather than passing four unlabeled enum values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsoBasis {
    pub era: CsoEra,
    pub gender: Gender,
    pub smoking: SmokingBasis,
    pub age_basis: AlbOrAnb,
}

/// Return the qx vector for `issue_age` through the table's maturity,
/// from an already-selected CSO `table` (selection per `basis` is the
/// caller's job: open the right `.ndx`/`.dat` pair for the (era, gender,
/// smoking, age_basis) combination before calling this).
pub fn cso_table(table: &ActuarialTable, issue_age: u32) -> Result<Vec<f64>> {
    let length = 1 + table.max_age() - issue_age;
    table.values(issue_age, length)
}

/// The computed section 7702(d) CVAT corridor factor at each duration:
/// `1 / (1 - A_x)`, where `A_x` is the net single premium from OL
/// commutation functions built at the statutory corridor interest rate.
///
/// This is the *computed* corridor only. IRC section 7702(d) specifies a
/// statutory minimum corridor-percentage table that the caller must take
/// the max against (`max(computed, statutory_floor_table[age])`); that
/// floor table is product-database content and out of scope here.
pub fn cvat_corridor(cf: &OlCommFns) -> Vec<f64> {
    let n = cf.len();
    (0..n)
        .map(|t| {
            let a_x = cf.m[t] / cf.d[t];
            1.0 / (1.0 - a_x)
        })
        .collect()
}

/// Seven-pay premium (7PP): the level annual premium payable for seven
/// years that funds `endt_bft` to maturity under a net-level-premium
/// valuation, from an OL commutation-function object built on the
/// relevant CSO/era/smoking basis.
///
/// `7pp = endt_bft * (D[issue_age] - D[issue_age+7]) / (N[issue_age] - N[issue_age+7])`
pub fn seven_pay_premium(cf: &OlCommFns, issue_age: usize, endt_bft: f64) -> Result<f64> {
    let seven = issue_age + 7;
    if seven >= cf.len() {
        return Err(crate::error::Lmi7702Error::domain(
            "seven_pay_premium: issue_age + 7 exceeds commutation-function length",
        ));
    }
    let numerator = cf.d[issue_age] - cf.d[seven];
    let denominator = cf.n[issue_age] - cf.n[seven];
    if denominator <= 0.0 {
        return Err(crate::error::Lmi7702Error::domain(
            "seven_pay_premium: non-positive annuity denominator",
        ));
    }
    Ok(endt_bft * numerator / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ol(n: usize) -> OlCommFns {
        OlCommFns::builder()
            .q(vec![0.002; n])
            .i(vec![0.04; n])
            .build()
            .unwrap()
    }

    #[test]
    fn corridor_factor_exceeds_one() {
        let cf = ol(30);
        let corridor = cvat_corridor(&cf);
        for c in corridor {
            assert!(c > 1.0);
        }
    }

    #[test]
    fn seven_pay_premium_is_positive_for_positive_benefit() {
        let cf = ol(30);
        let premium = seven_pay_premium(&cf, 0, 100_000.0).unwrap();
        assert!(premium > 0.0);
    }

    #[test]
    fn seven_pay_premium_rejects_out_of_range_issue_age() {
        let cf = ol(5);
        assert!(seven_pay_premium(&cf, 0, 100_000.0).is_err());
    }
}
