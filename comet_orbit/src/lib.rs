pub mod animation;
pub mod config;
pub mod input;
pub mod messages;
pub mod orbit;
pub mod output;
pub mod pipeline;
pub mod plotting;
pub mod trajectory;

#[cfg(test)]
mod proptest_orbit;
