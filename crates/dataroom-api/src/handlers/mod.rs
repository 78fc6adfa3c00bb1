pub mod object;
pub mod upload;
