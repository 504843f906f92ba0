use binaryninja::{
	architecture::{ArchitectureExt, CoreArchitecture},
	binaryninjacore_sys::{
		BNCreatePlatform, BNGetPlatformByName, BNGetPlatformList, BNGetPlatformListByArchitecture,
		BNGetPlatformListByOS, BNGetPlatformListByOSAndArchitecture, BNGetPlatformOSList,
		BNRegisterPlatform,
	},
};
use log::{debug, warn};

use crate::{
	architecture,
	error::{Error, Result},
	list::{CoreList, OsNameList},
	rc::Ref,
	string::{copy_os_names, to_core_string, to_lookup_key},
};

use super::Platform;

impl Platform {
	/// Creates a new, not yet registered, platform for `arch`.
	pub fn new(arch: &CoreArchitecture, name: &str) -> Result<Ref<Self>> {
		let raw_name = to_core_string(name)?;
		let raw_arch = architecture::raw_handle(arch);

		if raw_arch.is_null() {
			warn!(
				"architecture {} is not registered, cannot create platform {name}",
				arch.name().to_string_lossy()
			);

			return Err(Error::PlatformCreation(name.to_string()));
		}

		let handle = unsafe { BNCreatePlatform(raw_arch, raw_name.as_ptr()) };

		match unsafe { Self::ref_from_nullable(handle) } {
			Some(platform) => {
				debug!("created platform {name} for {}", arch.name().to_string_lossy());

				Ok(platform)
			}
			None => {
				warn!("core refused to create platform {name}");

				Err(Error::PlatformCreation(name.to_string()))
			}
		}
	}

	/// Makes `platform` visible to lookups under the operating system `os`.
	pub fn register(os: &str, platform: &Platform) -> Result<()> {
		let raw_os = to_core_string(os)?;

		debug!("registering platform {} for os {os}", platform.name());

		unsafe { BNRegisterPlatform(raw_os.as_ptr(), platform.handle) };

		Ok(())
	}

	pub fn by_name(name: &str) -> Option<Ref<Self>> {
		let name = to_lookup_key(name)?;

		unsafe { Self::ref_from_nullable(BNGetPlatformByName(name.as_ptr())) }
	}

	pub fn list_all() -> Vec<Ref<Self>> {
		let mut count = 0;

		unsafe {
			let raw = BNGetPlatformList(&mut count);

			Self::list_from_raw(raw, count)
		}
	}

	pub fn list_by_arch(arch: &CoreArchitecture) -> Vec<Ref<Self>> {
		let arch = architecture::raw_handle(arch);

		if arch.is_null() {
			return Vec::new();
		}

		let mut count = 0;

		unsafe {
			let raw = BNGetPlatformListByArchitecture(arch, &mut count);

			Self::list_from_raw(raw, count)
		}
	}

	pub fn list_by_os(os: &str) -> Vec<Ref<Self>> {
		let os = match to_lookup_key(os) {
			Some(os) => os,
			None => return Vec::new(),
		};

		let mut count = 0;

		unsafe {
			let raw = BNGetPlatformListByOS(os.as_ptr(), &mut count);

			Self::list_from_raw(raw, count)
		}
	}

	pub fn list_by_os_and_arch(os: &str, arch: &CoreArchitecture) -> Vec<Ref<Self>> {
		let os = match to_lookup_key(os) {
			Some(os) => os,
			None => return Vec::new(),
		};

		let arch = architecture::raw_handle(arch);

		if arch.is_null() {
			return Vec::new();
		}

		let mut count = 0;

		unsafe {
			let raw = BNGetPlatformListByOSAndArchitecture(os.as_ptr(), arch, &mut count);

			Self::list_from_raw(raw, count)
		}
	}

	/// Every operating system name some platform is registered under.
	pub fn os_list() -> Vec<String> {
		let mut count = 0;

		unsafe {
			let raw = BNGetPlatformOSList(&mut count);

			copy_os_names(&CoreList::<OsNameList>::new(raw, count))
		}
	}
}

#[cfg(test)]
mod tests {
	use binaryninja::architecture::CoreArchitecture;

	use super::Platform;
	use crate::{error::Result, rc::Ref};

	#[test]
	fn registry_speaks_binaryninja_architectures() {
		let _: fn(&CoreArchitecture, &str) -> Result<Ref<Platform>> = Platform::new;
		let _: fn(&CoreArchitecture) -> Vec<Ref<Platform>> = Platform::list_by_arch;
		let _: fn(&str, &CoreArchitecture) -> Vec<Ref<Platform>> = Platform::list_by_os_and_arch;
		let _: fn(&Platform) -> Option<CoreArchitecture> = Platform::arch;
		let _: fn(&Platform, &CoreArchitecture) -> Option<Ref<Platform>> = Platform::related_platform;
	}
}
