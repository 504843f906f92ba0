use std::{
	ffi::{CStr, CString},
	os::raw::c_char,
};

use binaryninja::binaryninjacore_sys::BNFreeString;

use crate::{
	error::{Error, Result},
	list::{CoreList, OsNameList},
};

pub fn to_core_string(value: &str) -> Result<CString> {
	CString::new(value).map_err(|_| Error::InteriorNul(value.to_string()))
}

/// Lookup keys that cannot cross the boundary can never name a core object.
pub fn to_lookup_key(value: &str) -> Option<CString> {
	match to_core_string(value) {
		Ok(key) => Some(key),
		Err(err) => {
			log::debug!("skipping lookup: {err}");

			None
		}
	}
}

pub fn copy_core_str(raw: *const c_char) -> String {
	if raw.is_null() {
		return String::new();
	}

	unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned()
}

/// Copies a string the core allocated for us and hands it back.
///
/// # Safety
///
/// `raw` must be null or a string owned by the caller and allocated by the core.
pub unsafe fn take_core_string(raw: *mut c_char) -> String {
	let result = copy_core_str(raw);

	if !raw.is_null() {
		BNFreeString(raw);
	}

	result
}

pub fn copy_os_names(list: &CoreList<OsNameList>) -> Vec<String> {
	list.as_slice()
		.iter()
		.map(|&raw| copy_core_str(raw))
		.collect()
}

#[cfg(test)]
mod tests {
	use std::ffi::CString;

	use super::{copy_core_str, to_core_string, to_lookup_key};
	use crate::error::Error;

	#[test]
	fn plain_names_cross_the_boundary() {
		let name = to_core_string("windows-x86_64").unwrap();

		assert_eq!(name.as_bytes(), b"windows-x86_64");
	}

	#[test]
	fn interior_nul_is_rejected() {
		match to_core_string("linux\0x86") {
			Err(Error::InteriorNul(value)) => assert_eq!(value, "linux\0x86"),
			other => panic!("unexpected result {other:?}"),
		}

		assert!(to_lookup_key("mac\0").is_none());
		assert!(to_lookup_key("mac").is_some());
	}

	#[test]
	fn null_copies_as_empty() {
		assert_eq!(copy_core_str(std::ptr::null()), "");
	}

	#[test]
	fn copies_are_independent_of_the_source() {
		let source = CString::new("efi-armv7").unwrap();
		let copy = copy_core_str(source.as_ptr());

		drop(source);

		assert_eq!(copy, "efi-armv7");
	}

	#[test]
	fn invalid_utf8_is_replaced() {
		let source = CString::new(vec![b'o', b's', 0xff]).unwrap();

		assert_eq!(copy_core_str(source.as_ptr()), "os\u{fffd}");
	}
}
