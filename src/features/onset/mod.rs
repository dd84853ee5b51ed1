//! Onset detection modules
//!
//! Onset strength envelopes feeding tempo estimation:
//! - Energy flux

pub mod energy_flux;
