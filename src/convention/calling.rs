use std::{
	fmt,
	hash::{Hash, Hasher},
};

use binaryninja::{
	architecture::CoreArchitecture,
	binaryninjacore_sys::{
		BNAreArgumentRegistersSharedIndex, BNCallingConvention, BNFreeCallingConvention,
		BNGetArchitectureName, BNGetCallerSavedRegisters, BNGetCalleeSavedRegisters,
		BNGetCallingConventionArchitecture, BNGetCallingConventionName, BNGetFloatArgumentRegisters,
		BNGetFloatReturnValueRegister, BNGetGlobalPointerRegister,
		BNGetHighIntegerReturnValueRegister, BNGetIntegerArgumentRegisters,
		BNGetIntegerReturnValueRegister, BNIsStackAdjustedOnReturn,
		BNIsStackReservedForArgumentRegisters, BNNewCallingConventionReference, BN_INVALID_REGISTER,
	},
};

use crate::{
	architecture,
	list::{CallingConventionList, CoreList, ListedHandle, RegisterList},
	rc::{Ref, RefCountable},
	string::take_core_string,
};

/// A calling convention owned by the core.
pub struct CallingConvention {
	pub(crate) handle: *mut BNCallingConvention,
}

unsafe impl Send for CallingConvention {}
unsafe impl Sync for CallingConvention {}

fn register_or_none(id: u32) -> Option<u32> {
	if id == BN_INVALID_REGISTER {
		None
	} else {
		Some(id)
	}
}

impl CallingConvention {
	/// # Safety
	///
	/// `handle` must be non-null and carry a reference owned by the caller.
	pub(crate) unsafe fn ref_from_raw(handle: *mut BNCallingConvention) -> Ref<Self> {
		debug_assert!(!handle.is_null());

		Ref::new(Self { handle })
	}

	/// Wraps a possibly-null owned handle, null meaning "not set".
	pub(crate) unsafe fn ref_from_nullable(handle: *mut BNCallingConvention) -> Option<Ref<Self>> {
		if handle.is_null() {
			None
		} else {
			Some(Self::ref_from_raw(handle))
		}
	}

	pub(crate) unsafe fn list_from_raw(
		raw: *mut *mut BNCallingConvention,
		count: usize,
	) -> Vec<Ref<Self>> {
		CoreList::<CallingConventionList>::new(raw, count).to_refs()
	}

	pub fn handle(&self) -> *mut BNCallingConvention {
		self.handle
	}

	pub fn name(&self) -> String {
		unsafe { take_core_string(BNGetCallingConventionName(self.handle)) }
	}

	pub fn arch(&self) -> Option<CoreArchitecture> {
		unsafe { architecture::from_raw_handle(BNGetCallingConventionArchitecture(self.handle)) }
	}

	pub fn arch_name(&self) -> String {
		unsafe {
			take_core_string(BNGetArchitectureName(BNGetCallingConventionArchitecture(
				self.handle,
			)))
		}
	}

	fn registers(
		&self,
		fetch: unsafe extern "C" fn(*mut BNCallingConvention, *mut usize) -> *mut u32,
	) -> Vec<u32> {
		let mut count = 0;

		unsafe {
			let raw = fetch(self.handle, &mut count);

			CoreList::<RegisterList>::new(raw, count).as_slice().to_vec()
		}
	}

	pub fn caller_saved_registers(&self) -> Vec<u32> {
		self.registers(BNGetCallerSavedRegisters)
	}

	pub fn callee_saved_registers(&self) -> Vec<u32> {
		self.registers(BNGetCalleeSavedRegisters)
	}

	pub fn int_arg_registers(&self) -> Vec<u32> {
		self.registers(BNGetIntegerArgumentRegisters)
	}

	pub fn float_arg_registers(&self) -> Vec<u32> {
		self.registers(BNGetFloatArgumentRegisters)
	}

	pub fn return_int_reg(&self) -> Option<u32> {
		register_or_none(unsafe { BNGetIntegerReturnValueRegister(self.handle) })
	}

	pub fn return_hi_int_reg(&self) -> Option<u32> {
		register_or_none(unsafe { BNGetHighIntegerReturnValueRegister(self.handle) })
	}

	pub fn return_float_reg(&self) -> Option<u32> {
		register_or_none(unsafe { BNGetFloatReturnValueRegister(self.handle) })
	}

	pub fn global_pointer_reg(&self) -> Option<u32> {
		register_or_none(unsafe { BNGetGlobalPointerRegister(self.handle) })
	}

	pub fn arg_registers_shared_index(&self) -> bool {
		unsafe { BNAreArgumentRegistersSharedIndex(self.handle) }
	}

	pub fn reserved_stack_space_for_arg_registers(&self) -> bool {
		unsafe { BNIsStackReservedForArgumentRegisters(self.handle) }
	}

	pub fn stack_adjusted_on_return(&self) -> bool {
		unsafe { BNIsStackAdjustedOnReturn(self.handle) }
	}
}

unsafe impl RefCountable for CallingConvention {
	unsafe fn inc_ref(handle: &Self) -> Ref<Self> {
		Self::ref_from_raw(BNNewCallingConventionReference(handle.handle))
	}

	unsafe fn dec_ref(handle: &Self) {
		BNFreeCallingConvention(handle.handle);
	}
}

impl ListedHandle for CallingConvention {
	type List = CallingConventionList;

	unsafe fn reference_listed(raw: &*mut BNCallingConvention) -> Ref<Self> {
		Self::ref_from_raw(BNNewCallingConventionReference(*raw))
	}
}

impl PartialEq for CallingConvention {
	fn eq(&self, other: &Self) -> bool {
		self.handle == other.handle
	}
}

impl Eq for CallingConvention {}

impl Hash for CallingConvention {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.handle.hash(state);
	}
}

impl fmt::Display for CallingConvention {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name())
	}
}

impl fmt::Debug for CallingConvention {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CallingConvention")
			.field("name", &self.name())
			.field("arch", &self.arch_name())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use binaryninja::binaryninjacore_sys::BN_INVALID_REGISTER;

	use super::register_or_none;

	#[test]
	fn invalid_register_means_none() {
		assert_eq!(register_or_none(BN_INVALID_REGISTER), None);
		assert_eq!(register_or_none(0), Some(0));
		assert_eq!(register_or_none(17), Some(17));
	}
}
