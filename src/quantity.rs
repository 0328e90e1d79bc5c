#[macro_use]
pub mod macros;

pub mod current;
pub mod resistance;
pub mod voltage;

pub use self::zero::Zero;

mod zero;
