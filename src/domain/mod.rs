mod balance;
mod entry;
mod points;
mod spend;

pub use balance::*;
pub use entry::*;
pub use points::*;
pub use spend::*;
