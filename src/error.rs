#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("string {0:?} contains an interior nul byte")]
	InteriorNul(String),

	#[error("unknown calling convention slot {0:?}")]
	UnknownSlot(String),

	#[error("core refused to create platform {0:?}")]
	PlatformCreation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
