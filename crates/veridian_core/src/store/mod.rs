//! Domain store: commands, the pure reducer and the persisting facade.
//!
//! Commands and the reducer stay crate-private; consumers mutate the
//! aggregate only through `FinanceStore` operations.

pub(crate) mod command;
pub mod finance_store;
pub(crate) mod reducer;
pub mod view;

pub use finance_store::FinanceStore;
pub use view::{CoachingSnapshot, ProfileSummary};
