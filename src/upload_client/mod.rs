pub mod core;
pub mod intake;
pub mod main;
pub mod present;
pub mod run_effect;
pub mod schedule;

#[cfg(test)]
mod tests;
