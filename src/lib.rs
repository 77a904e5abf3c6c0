//! # lmi7702
//!
//! Commutation functions, IRC section 7702 guideline premium testing, IRC
//! section 7702A modified-endowment-contract testing, and an SOA binary
//! actuarial-table reader for universal life insurance.
//!
//! ## Features
//! - **Ordinary-life and universal-life commutation functions**: `{D, C, N,
//!   M}` from vectors of mortality and interest rates, including Eckley's
//!   TSA XXIX modal-factor treatment for UL.
//! - **Guideline Premium Test (GPT) engine**: a per-contract state machine
//!   tracking cumulative `7702(f)(1)(A)` premiums against the guideline
//!   limit across 1035 exchanges, benefit adjustments, and forceouts.
//! - **Specified-amount inversion**: recover the specified amount that
//!   produces a target premium, via a currency-rounding Brent-Dekker root
//!   finder.
//! - **7-pay premium and CVAT corridor**: section 7702A/7702(d) support
//!   built on ordinary-life commutation functions.
//! - **SOA binary table reader**: index/data file pairs, including
//!   select-and-ultimate reentry semantics.
//! - **Builder Pattern**: multi-field constructors use `bon` builders with
//!   `garde`-driven validation.
//!
//! ## Quick Start
//!
//! ```rust
//! use lmi7702::prelude::*;
//!
//! let qc = vec![0.001; 40];
//! let ic = vec![0.005; 40];
//! let ig = vec![0.0033; 40];
//! let charges = GptVectorParms::builder()
//!     .prem_load_target(vec![0.06; 40])
//!     .prem_load_excess(vec![0.02; 40])
//!     .policy_fee_monthly(vec![5.0; 40])
//!     .policy_fee_annual(vec![0.0; 40])
//!     .specamt_load_monthly(vec![0.0002; 40])
//!     .qab_gio_rate(vec![0.0; 40])
//!     .qab_adb_rate(vec![0.0; 40])
//!     .qab_term_rate(vec![0.0; 40])
//!     .qab_spouse_rate(vec![0.0; 40])
//!     .qab_child_rate(vec![0.0; 40])
//!     .qab_waiver_rate(vec![0.0; 40])
//!     .build();
//!
//! let cf = GptCfTriad::new(&qc, &ic, &ig, &ic, &ig, &charges)?;
//!
//! let parms = GptScalarParms::builder()
//!     .duration(0)
//!     .f3_bft(1_000_000.0)
//!     .endt_bft(1_000_000.0)
//!     .target_prem(10_000.0)
//!     .chg_sa_base(1_000_000.0)
//!     .dbopt_7702(DbOpt::Option1)
//!     .qab_gio_amt(0.0)
//!     .qab_adb_amt(0.0)
//!     .qab_term_amt(0.0)
//!     .qab_spouse_amt(0.0)
//!     .qab_child_amt(0.0)
//!     .qab_waiver_amt(0.0)
//!     .build();
//!
//! let mut engine = GptEngine::initialize_gpt(
//!     cf, DefnLifeIns::Gpt, 0.0, 0.0, 0.0, 0.0, 0.0, parms,
//! )?;
//! let accepted = engine.accept_payment(10_000.0)?;
//! println!("accepted premium: {accepted:.2}");
//! # Ok::<(), lmi7702::error::Lmi7702Error>(())
//! ```
//!
//! ## Supported Modules
//!
//! - **Math primitives**: `math` -- interest-rate conversions, partial
//!   sums, the binary64-bit-pattern midpoint.
//! - **Root finder**: `root_finder` -- `find_root`, `decimal_root`.
//! - **Actuarial tables**: `actuarial_table` -- `ActuarialTable`,
//!   select-and-ultimate reentry.
//! - **Commutation functions**: `commutation::{ol, ul}` -- `OlCommFns`,
//!   `UlCommFns`.
//! - **GPT**: `gpt::{charges, commfns, cso, engine, specamt, mec}`.
//! - **IRC section 7702 interest rates**: `irc7702_interest`.
//!
//! ## Notes
//! - All multi-field constructors follow standard actuarial commutation
//!   notation for their struct fields (`d`, `c`, `n`, `m`, ...).
//! - Monetary amounts are plain `f64`, rounded to cents via [`params::RoundTo`]
//!   at the points the statute or product design calls for rounding, not
//!   represented as fixed-point integers.
//! - All calculations include explicit parameter validation; none panic on
//!   malformed input outside of debug-only internal-invariant assertions.

pub mod actuarial_table;
pub mod commutation;
pub mod error;
pub mod gpt;
pub mod irc7702_interest;
pub mod math;
pub mod params;
pub mod prelude;
pub mod root_finder;
