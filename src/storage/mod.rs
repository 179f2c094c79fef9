//! Account storage behind an async trait

pub mod memory;
pub mod traits;

pub use memory::MemoryAccountStore;
pub use traits::AccountStore;
