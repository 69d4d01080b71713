pub mod logging;
pub mod status;
