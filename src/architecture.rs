use binaryninja::{
	architecture::{ArchitectureExt, CoreArchitecture},
	binaryninjacore_sys::{
		BNArchitecture, BNCallingConvention, BNGetArchitectureByName,
		BNGetArchitectureCallingConventionByName, BNGetArchitectureCallingConventions, BNGetArchitectureCdeclCallingConvention,
		BNGetArchitectureDefaultCallingConvention, BNGetArchitectureFastcallCallingConvention,
		BNGetArchitectureName, BNGetArchitectureStandalonePlatform,
		BNGetArchitectureStdcallCallingConvention,
	},
};

use crate::{
	convention::{CallingConvention, ConventionSlot},
	platform::Platform,
	rc::Ref,
	string::{take_core_string, to_lookup_key},
};

type ConventionGetter = unsafe extern "C" fn(*mut BNArchitecture) -> *mut BNCallingConvention;

// binaryninja keeps the raw architecture handle crate-private. Architecture
// names are unique in the core registry, so they bridge the two sides.
pub(crate) fn raw_handle(arch: &CoreArchitecture) -> *mut BNArchitecture {
	let name = arch.name();

	unsafe { BNGetArchitectureByName(name.as_ptr()) }
}

/// # Safety
///
/// `raw` must be null or an architecture handle from the core.
pub(crate) unsafe fn from_raw_handle(raw: *mut BNArchitecture) -> Option<CoreArchitecture> {
	if raw.is_null() {
		return None;
	}

	CoreArchitecture::by_name(&take_core_string(BNGetArchitectureName(raw)))
}

/// Platform and calling convention queries on a core architecture, handing
/// back this crate's reference-counted wrappers.
pub trait ArchitecturePlatformExt {
	fn platform_list(&self) -> Vec<Ref<Platform>>;

	fn standalone(&self) -> Option<Ref<Platform>>;

	fn conventions(&self) -> Vec<Ref<CallingConvention>>;

	fn convention_by_name(&self, name: &str) -> Option<Ref<CallingConvention>>;

	/// Architectures have no syscall slot of their own; that lives on the platform.
	fn convention(&self, slot: ConventionSlot) -> Option<Ref<CallingConvention>>;
}

impl ArchitecturePlatformExt for CoreArchitecture {
	fn platform_list(&self) -> Vec<Ref<Platform>> {
		Platform::list_by_arch(self)
	}

	fn standalone(&self) -> Option<Ref<Platform>> {
		let raw = raw_handle(self);

		if raw.is_null() {
			return None;
		}

		unsafe { Platform::ref_from_nullable(BNGetArchitectureStandalonePlatform(raw)) }
	}

	fn conventions(&self) -> Vec<Ref<CallingConvention>> {
		let raw = raw_handle(self);

		if raw.is_null() {
			return Vec::new();
		}

		let mut count = 0;

		unsafe {
			let list = BNGetArchitectureCallingConventions(raw, &mut count);

			CallingConvention::list_from_raw(list, count)
		}
	}

	fn convention_by_name(&self, name: &str) -> Option<Ref<CallingConvention>> {
		let name = to_lookup_key(name)?;
		let raw = raw_handle(self);

		if raw.is_null() {
			return None;
		}

		unsafe {
			CallingConvention::ref_from_nullable(BNGetArchitectureCallingConventionByName(
				raw,
				name.as_ptr(),
			))
		}
	}

	fn convention(&self, slot: ConventionSlot) -> Option<Ref<CallingConvention>> {
		let fetch: ConventionGetter = match slot {
			ConventionSlot::Default => BNGetArchitectureDefaultCallingConvention,
			ConventionSlot::Cdecl => BNGetArchitectureCdeclCallingConvention,
			ConventionSlot::Stdcall => BNGetArchitectureStdcallCallingConvention,
			ConventionSlot::Fastcall => BNGetArchitectureFastcallCallingConvention,
			ConventionSlot::Syscall => return None,
		};

		let raw = raw_handle(self);

		if raw.is_null() {
			return None;
		}

		unsafe { CallingConvention::ref_from_nullable(fetch(raw)) }
	}
}
