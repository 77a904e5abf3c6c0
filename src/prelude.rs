//! # lmi7702 Prelude
//!
//! Conveniently re-exports the most common types and functions. Import
//! this module to access the primary GPT/commutation-function/actuarial-
//! table surface with a single `use` statement.
//!
//! ## Example
//!
//! ```rust
//! # use lmi7702::prelude::*;
//! let cf = OlCommFns::builder()
//!     .q(vec![0.001; 40])
//!     .i(vec![0.04; 40])
//!     .build()?;
//! let corridor = cvat_corridor(&cf);
//! println!("corridor at issue: {:.4}", corridor[0]);
//! # Ok::<(), Lmi7702Error>(())
//! ```

// Crate-wide error type.
pub use crate::error::{Lmi7702Error, Result};

// Configuration enums and the currency-rounding value type.
pub use crate::params::{
    AlbOrAnb, CsoEra, DbOpt, DefnLifeIns, Gender, GlpOrGsp, MecStatus, Mode, RootStatus,
    RoundTo, RoundingStyle, SmokingBasis,
};

// Math primitives.
pub use crate::math::{
    back_sum, coi_rate_from_q, d_upper_12_from_i, d_upper_n_from_i, fwd_sum,
    i_from_i_upper_12_over_12, i_from_i_upper_n_over_n, i_upper_12_over_12_from_i,
    i_upper_n_over_n_from_i, net_i_from_gross,
};

// Root finder.
pub use crate::root_finder::{RootBias, RootResult, decimal_root, find_root};

// SOA binary actuarial-table reader.
pub use crate::actuarial_table::ActuarialTable;

// Ordinary-life and universal-life commutation functions.
pub use crate::commutation::{OlCommFns, UlCommFns};

// GPT engine, commutation triad, charges, CSO/corridor/7-pay, specamt
// inversion, and 7702A MEC testing.
pub use crate::gpt::{
    CsoBasis, GptCfTriad, GptEngine, GptScalarParms, GptVectorParms, Irc7702A,
    calculate_glp_spec_amt, calculate_gsp_spec_amt, calculate_spec_amt, cso_table, cvat_corridor,
    seven_pay_premium,
};

// IRC section 7702 interest-rate derivation.
pub use crate::irc7702_interest::{Irc7702InterestRates, Irc7702RateParams};
