pub mod analysis;
pub mod bytecode;
pub mod config;
pub mod report;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod test_util;
