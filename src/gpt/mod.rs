pub mod charges;
pub mod commfns;
pub mod cso;
pub mod engine;
pub mod mec;
pub mod specamt;

pub use charges::{GptScalarParms, GptVectorParms};
pub use commfns::GptCfTriad;
pub use cso::{CsoBasis, cso_table, cvat_corridor, seven_pay_premium};
pub use engine::GptEngine;
pub use mec::Irc7702A;
pub use specamt::{calculate_glp_spec_amt, calculate_gsp_spec_amt, calculate_spec_amt};
