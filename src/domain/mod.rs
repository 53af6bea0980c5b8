pub mod certificate;
pub mod check;
pub mod constants;
pub mod report;
pub mod status;
