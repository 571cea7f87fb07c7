pub mod password;
pub mod ports;
pub mod repository;
pub mod signature;
pub mod types;
