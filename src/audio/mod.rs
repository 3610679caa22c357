//! Audio decoding, resampling, and standardization.

mod decode;
mod resample;
mod standardize;

pub use decode::{DecodedRecording, decode_recording};
pub use resample::resample;
pub use standardize::standardize;
