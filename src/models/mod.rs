pub mod mood;
pub mod reference;
pub mod user;
