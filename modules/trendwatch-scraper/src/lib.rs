pub mod browser;
pub mod extract;
pub mod pacing;
pub mod storage;
pub mod sweep;
#[cfg(test)]
pub(crate) mod testing;
