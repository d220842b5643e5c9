mod lifecycle;
mod status;

pub use lifecycle::run_lifecycle;
pub use status::run_status;
