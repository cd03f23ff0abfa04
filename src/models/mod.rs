pub mod bar;
pub mod reversal;
