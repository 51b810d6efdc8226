pub mod extract;
pub mod generate;
