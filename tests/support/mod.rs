// tests/support/mod.rs
// Shared in-memory repositories and builders used by multiple integration
// test binaries. Individual test crates use different subsets, so dead_code
// warnings are silenced at the module level.
#[allow(dead_code, unused_imports)]
pub mod builders;

#[allow(dead_code, unused_imports)]
pub mod mocks;

#[allow(unused_imports)]
pub use builders::*;
#[allow(unused_imports)]
pub use mocks::*;
