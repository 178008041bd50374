pub mod api;
pub mod hr;
pub mod ip;
pub mod token;
