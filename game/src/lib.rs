//! Caster session layer: save records, persistence and battle setup.

mod records;
mod session;
mod store;


pub use records::*;
pub use session::*;
pub use store::*;
