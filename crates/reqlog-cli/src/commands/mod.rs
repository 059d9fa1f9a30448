pub mod emit;
pub mod fatal;
pub mod simulate;
