pub mod brand;
pub mod campaign;
pub mod package;
pub mod performance;
pub mod promoter;
pub mod support;
