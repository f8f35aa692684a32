pub mod cache;
pub mod chart;
pub mod crop_week;
pub mod fingerprint;
pub mod validation;
