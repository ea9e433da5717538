// File and storage I/O for court location data

pub mod csv;
pub mod error;
pub mod export;
pub mod gov;
pub mod store;
pub mod xlsx;

pub use error::IoError;
