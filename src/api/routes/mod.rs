pub mod export;
pub mod result;
pub mod session;
pub mod upload;
