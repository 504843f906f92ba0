use std::{
	fmt,
	hash::{Hash, Hasher},
	ptr,
};

use binaryninja::{
	architecture::{ArchitectureExt, CoreArchitecture},
	binaryninjacore_sys::{
		BNAddRelatedPlatform, BNFreePlatform, BNGetArchitectureName,
		BNGetAssociatedPlatformByAddress, BNGetPlatformArchitecture, BNGetPlatformCallingConventions,
		BNGetPlatformCdeclCallingConvention, BNGetPlatformDefaultCallingConvention,
		BNGetPlatformFastcallCallingConvention, BNGetPlatformName,
		BNGetPlatformStdcallCallingConvention, BNGetPlatformSystemCallConvention,
		BNGetRelatedPlatform, BNNewPlatformReference, BNPlatform,
		BNRegisterPlatformCallingConvention, BNRegisterPlatformCdeclCallingConvention,
		BNRegisterPlatformDefaultCallingConvention, BNRegisterPlatformFastcallCallingConvention,
		BNRegisterPlatformStdcallCallingConvention, BNSetPlatformSystemCallConvention,
	},
};
use log::{debug, warn};

use crate::{
	architecture,
	convention::{CallingConvention, ConventionSlot},
	list::{CoreList, ListedHandle, PlatformList},
	rc::{Ref, RefCountable},
	string::take_core_string,
};

/// An operating-system environment paired with an architecture.
pub struct Platform {
	pub(crate) handle: *mut BNPlatform,
}

unsafe impl Send for Platform {}
unsafe impl Sync for Platform {}

impl Platform {
	/// # Safety
	///
	/// `handle` must be non-null and carry a reference owned by the caller.
	pub(crate) unsafe fn ref_from_raw(handle: *mut BNPlatform) -> Ref<Self> {
		debug_assert!(!handle.is_null());

		Ref::new(Self { handle })
	}

	pub(crate) unsafe fn ref_from_nullable(handle: *mut BNPlatform) -> Option<Ref<Self>> {
		if handle.is_null() {
			None
		} else {
			Some(Self::ref_from_raw(handle))
		}
	}

	pub(crate) unsafe fn list_from_raw(raw: *mut *mut BNPlatform, count: usize) -> Vec<Ref<Self>> {
		CoreList::<PlatformList>::new(raw, count).to_refs()
	}

	pub fn handle(&self) -> *mut BNPlatform {
		self.handle
	}

	pub fn name(&self) -> String {
		unsafe { take_core_string(BNGetPlatformName(self.handle)) }
	}

	pub fn arch(&self) -> Option<CoreArchitecture> {
		unsafe { architecture::from_raw_handle(BNGetPlatformArchitecture(self.handle)) }
	}

	pub fn arch_name(&self) -> String {
		unsafe { take_core_string(BNGetArchitectureName(BNGetPlatformArchitecture(self.handle))) }
	}

	pub fn default_calling_convention(&self) -> Option<Ref<CallingConvention>> {
		unsafe {
			CallingConvention::ref_from_nullable(BNGetPlatformDefaultCallingConvention(self.handle))
		}
	}

	pub fn cdecl_calling_convention(&self) -> Option<Ref<CallingConvention>> {
		unsafe {
			CallingConvention::ref_from_nullable(BNGetPlatformCdeclCallingConvention(self.handle))
		}
	}

	pub fn stdcall_calling_convention(&self) -> Option<Ref<CallingConvention>> {
		unsafe {
			CallingConvention::ref_from_nullable(BNGetPlatformStdcallCallingConvention(self.handle))
		}
	}

	pub fn fastcall_calling_convention(&self) -> Option<Ref<CallingConvention>> {
		unsafe {
			CallingConvention::ref_from_nullable(BNGetPlatformFastcallCallingConvention(
				self.handle,
			))
		}
	}

	pub fn system_call_convention(&self) -> Option<Ref<CallingConvention>> {
		unsafe {
			CallingConvention::ref_from_nullable(BNGetPlatformSystemCallConvention(self.handle))
		}
	}

	pub fn calling_convention(&self, slot: ConventionSlot) -> Option<Ref<CallingConvention>> {
		match slot {
			ConventionSlot::Default => self.default_calling_convention(),
			ConventionSlot::Cdecl => self.cdecl_calling_convention(),
			ConventionSlot::Stdcall => self.stdcall_calling_convention(),
			ConventionSlot::Fastcall => self.fastcall_calling_convention(),
			ConventionSlot::Syscall => self.system_call_convention(),
		}
	}

	pub fn calling_conventions(&self) -> Vec<Ref<CallingConvention>> {
		let mut count = 0;

		unsafe {
			let raw = BNGetPlatformCallingConventions(self.handle, &mut count);

			CallingConvention::list_from_raw(raw, count)
		}
	}

	pub fn register_calling_convention(&self, cc: &CallingConvention) {
		debug!("platform {}: adding calling convention {}", self.name(), cc.name());

		unsafe { BNRegisterPlatformCallingConvention(self.handle, cc.handle) }
	}

	pub fn register_default_calling_convention(&self, cc: &CallingConvention) {
		self.log_slot(ConventionSlot::Default, Some(cc));

		unsafe { BNRegisterPlatformDefaultCallingConvention(self.handle, cc.handle) }
	}

	pub fn register_cdecl_calling_convention(&self, cc: &CallingConvention) {
		self.log_slot(ConventionSlot::Cdecl, Some(cc));

		unsafe { BNRegisterPlatformCdeclCallingConvention(self.handle, cc.handle) }
	}

	pub fn register_stdcall_calling_convention(&self, cc: &CallingConvention) {
		self.log_slot(ConventionSlot::Stdcall, Some(cc));

		unsafe { BNRegisterPlatformStdcallCallingConvention(self.handle, cc.handle) }
	}

	pub fn register_fastcall_calling_convention(&self, cc: &CallingConvention) {
		self.log_slot(ConventionSlot::Fastcall, Some(cc));

		unsafe { BNRegisterPlatformFastcallCallingConvention(self.handle, cc.handle) }
	}

	/// `None` clears the system call convention.
	pub fn set_system_call_convention(&self, cc: Option<&CallingConvention>) {
		self.log_slot(ConventionSlot::Syscall, cc);

		let raw = cc.map_or(ptr::null_mut(), |cc| cc.handle);

		unsafe { BNSetPlatformSystemCallConvention(self.handle, raw) }
	}

	pub fn register_calling_convention_as(&self, slot: ConventionSlot, cc: &CallingConvention) {
		match slot {
			ConventionSlot::Default => self.register_default_calling_convention(cc),
			ConventionSlot::Cdecl => self.register_cdecl_calling_convention(cc),
			ConventionSlot::Stdcall => self.register_stdcall_calling_convention(cc),
			ConventionSlot::Fastcall => self.register_fastcall_calling_convention(cc),
			ConventionSlot::Syscall => self.set_system_call_convention(Some(cc)),
		}
	}

	fn log_slot(&self, slot: ConventionSlot, cc: Option<&CallingConvention>) {
		match cc {
			Some(cc) => debug!("platform {}: {slot} convention is now {}", self.name(), cc.name()),
			None => debug!("platform {}: clearing {slot} convention", self.name()),
		}
	}

	pub fn related_platform(&self, arch: &CoreArchitecture) -> Option<Ref<Platform>> {
		let arch = architecture::raw_handle(arch);

		if arch.is_null() {
			return None;
		}

		unsafe { Self::ref_from_nullable(BNGetRelatedPlatform(self.handle, arch)) }
	}

	pub fn add_related_platform(&self, arch: &CoreArchitecture, platform: &Platform) {
		let raw_arch = architecture::raw_handle(arch);

		if raw_arch.is_null() {
			warn!(
				"platform {}: architecture {} is not registered, ignoring related platform",
				self.name(),
				arch.name().to_string_lossy()
			);

			return;
		}

		debug!(
			"platform {}: related platform for {} is {}",
			self.name(),
			arch.name().to_string_lossy(),
			platform.name()
		);

		unsafe { BNAddRelatedPlatform(self.handle, raw_arch, platform.handle) }
	}

	/// The core may rewrite `addr` (e.g. dropping an interworking bit), so the
	/// caller sees the adjusted value on return.
	pub fn associated_platform_by_address(&self, addr: &mut u64) -> Option<Ref<Platform>> {
		unsafe { Self::ref_from_nullable(BNGetAssociatedPlatformByAddress(self.handle, addr)) }
	}
}

unsafe impl RefCountable for Platform {
	unsafe fn inc_ref(handle: &Self) -> Ref<Self> {
		Self::ref_from_raw(BNNewPlatformReference(handle.handle))
	}

	unsafe fn dec_ref(handle: &Self) {
		BNFreePlatform(handle.handle);
	}
}

impl ListedHandle for Platform {
	type List = PlatformList;

	unsafe fn reference_listed(raw: &*mut BNPlatform) -> Ref<Self> {
		Self::ref_from_raw(BNNewPlatformReference(*raw))
	}
}

impl PartialEq for Platform {
	fn eq(&self, other: &Self) -> bool {
		self.handle == other.handle
	}
}

impl Eq for Platform {}

impl Hash for Platform {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.handle.hash(state);
	}
}

impl fmt::Display for Platform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name())
	}
}

impl fmt::Debug for Platform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Platform")
			.field("name", &self.name())
			.field("arch", &self.arch_name())
			.finish()
	}
}
