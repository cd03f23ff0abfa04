pub mod cache;
pub mod monitor;
pub mod notifier;
pub mod scan;
pub mod universe;
pub mod yahoo;
