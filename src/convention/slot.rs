use std::{fmt, str::FromStr};

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::Error;

/// The named calling-convention positions a platform carries.
#[repr(u8)]
#[derive(TryFromPrimitive, IntoPrimitive, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ConventionSlot {
	Default = 0,
	Cdecl,
	Stdcall,
	Fastcall,
	Syscall,
}

impl ConventionSlot {
	pub const ALL: [ConventionSlot; 5] = [
		ConventionSlot::Default,
		ConventionSlot::Cdecl,
		ConventionSlot::Stdcall,
		ConventionSlot::Fastcall,
		ConventionSlot::Syscall,
	];

	pub const fn name(self) -> &'static str {
		match self {
			ConventionSlot::Default => "default",
			ConventionSlot::Cdecl => "cdecl",
			ConventionSlot::Stdcall => "stdcall",
			ConventionSlot::Fastcall => "fastcall",
			ConventionSlot::Syscall => "syscall",
		}
	}
}

impl fmt::Display for ConventionSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for ConventionSlot {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|slot| slot.name().eq_ignore_ascii_case(s))
			.ok_or_else(|| Error::UnknownSlot(s.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::ConventionSlot;
	use crate::error::Error;

	#[test]
	fn names_parse_back_to_their_slot() {
		for slot in ConventionSlot::ALL {
			assert_eq!(slot.name().parse::<ConventionSlot>().unwrap(), slot);
			assert_eq!(slot.to_string(), slot.name());
		}
	}

	#[test]
	fn parsing_ignores_case() {
		assert_eq!(
			"StdCall".parse::<ConventionSlot>().unwrap(),
			ConventionSlot::Stdcall
		);
	}

	#[test]
	fn unknown_names_are_rejected() {
		match "thiscall".parse::<ConventionSlot>() {
			Err(Error::UnknownSlot(name)) => assert_eq!(name, "thiscall"),
			other => panic!("unexpected result {other:?}"),
		}
	}

	#[test]
	fn primitive_ids_follow_declaration_order() {
		for (i, slot) in ConventionSlot::ALL.into_iter().enumerate() {
			assert_eq!(u8::from(slot) as usize, i);
			assert_eq!(ConventionSlot::try_from(i as u8).unwrap(), slot);
		}

		assert!(ConventionSlot::try_from(5).is_err());
	}
}
