//! Audio preprocessing modules
//!
//! Utilities for preparing audio for analysis:
//! - Channel mixing (multichannel to mono)

pub mod channel_mixer;
