pub mod import;
pub mod ops;
pub mod session;
