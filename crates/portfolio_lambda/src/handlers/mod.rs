pub mod analyze;
pub mod language;
pub mod recipes;
pub mod result;
pub mod upload;
