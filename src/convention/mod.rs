mod calling;
mod slot;

pub use calling::CallingConvention;
pub use slot::ConventionSlot;
