use std::{marker::PhantomData, os::raw::c_char, slice};

use binaryninja::binaryninjacore_sys::{
	BNCallingConvention, BNFreeCallingConventionList, BNFreePlatformList, BNFreePlatformOSList,
	BNFreeRegisterList, BNPlatform,
};

use crate::rc::{Ref, RefCountable};

/// Describes an array type the core allocates and how to give it back.
///
/// # Safety
///
/// `free` must be the core function that releases arrays of `Raw`.
pub unsafe trait CoreListProvider {
	type Raw;

	unsafe fn free(raw: *mut Self::Raw, count: usize);
}

/// A `(pointer, count)` array allocated by the core, released on drop.
pub struct CoreList<P: CoreListProvider> {
	raw: *mut P::Raw,
	count: usize,
	_provider: PhantomData<P>,
}

impl<P: CoreListProvider> CoreList<P> {
	/// # Safety
	///
	/// `raw` must be null or point to `count` elements allocated by the core
	/// for this provider.
	pub unsafe fn new(raw: *mut P::Raw, count: usize) -> Self {
		Self {
			raw,
			count,
			_provider: PhantomData,
		}
	}

	pub fn as_slice(&self) -> &[P::Raw] {
		if self.raw.is_null() {
			&[]
		} else {
			unsafe { slice::from_raw_parts(self.raw, self.count) }
		}
	}

	pub fn len(&self) -> usize {
		self.as_slice().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl<P: CoreListProvider> Drop for CoreList<P> {
	fn drop(&mut self) {
		if !self.raw.is_null() {
			unsafe { P::free(self.raw, self.count) }
		}
	}
}

/// Handles whose arrays hold borrowed entries that must be re-referenced
/// before the array is released.
pub trait ListedHandle: RefCountable {
	type List: CoreListProvider;

	/// # Safety
	///
	/// `raw` must be a live handle borrowed from a list of this type.
	unsafe fn reference_listed(raw: &<Self::List as CoreListProvider>::Raw) -> Ref<Self>;
}

impl<P> CoreList<P>
where
	P: CoreListProvider,
{
	pub fn to_refs<T>(&self) -> Vec<Ref<T>>
	where
		T: ListedHandle<List = P>,
	{
		self.as_slice()
			.iter()
			.map(|raw| unsafe { T::reference_listed(raw) })
			.collect()
	}
}

pub struct PlatformList;

unsafe impl CoreListProvider for PlatformList {
	type Raw = *mut BNPlatform;

	unsafe fn free(raw: *mut Self::Raw, count: usize) {
		BNFreePlatformList(raw, count);
	}
}

pub struct CallingConventionList;

unsafe impl CoreListProvider for CallingConventionList {
	type Raw = *mut BNCallingConvention;

	unsafe fn free(raw: *mut Self::Raw, count: usize) {
		BNFreeCallingConventionList(raw, count);
	}
}

pub struct OsNameList;

unsafe impl CoreListProvider for OsNameList {
	type Raw = *mut c_char;

	unsafe fn free(raw: *mut Self::Raw, count: usize) {
		BNFreePlatformOSList(raw, count);
	}
}

pub struct RegisterList;

unsafe impl CoreListProvider for RegisterList {
	type Raw = u32;

	unsafe fn free(raw: *mut Self::Raw, _count: usize) {
		BNFreeRegisterList(raw);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::{CoreList, CoreListProvider, ListedHandle};
	use crate::rc::{Ref, RefCountable};

	thread_local! {
		static FREED: Cell<Option<(usize, usize)>> = Cell::new(None);
		static FREE_CALLS: Cell<usize> = Cell::new(0);
		static LIVE: Cell<usize> = Cell::new(0);
		static LISTED_TAKES: Cell<usize> = Cell::new(0);
		static LIVE_AT_FREE: Cell<Option<usize>> = Cell::new(None);
	}

	fn bump(counter: &'static std::thread::LocalKey<Cell<usize>>) {
		counter.with(|v| v.set(v.get() + 1));
	}

	struct Entry {
		id: u32,
	}

	unsafe impl RefCountable for Entry {
		unsafe fn inc_ref(handle: &Self) -> Ref<Self> {
			bump(&LIVE);

			Ref::new(Entry { id: handle.id })
		}

		unsafe fn dec_ref(_handle: &Self) {
			LIVE.with(|v| v.set(v.get() - 1));
		}
	}

	impl ListedHandle for Entry {
		type List = BoxedList;

		unsafe fn reference_listed(raw: &u32) -> Ref<Self> {
			bump(&LIVE);
			bump(&LISTED_TAKES);

			Ref::new(Entry { id: *raw })
		}
	}

	struct BoxedList;

	unsafe impl CoreListProvider for BoxedList {
		type Raw = u32;

		unsafe fn free(raw: *mut u32, count: usize) {
			let data = Vec::from_raw_parts(raw, count, count);

			FREED.with(|v| v.set(Some((count, data.iter().sum::<u32>() as usize))));
			LIVE_AT_FREE.with(|v| v.set(Some(LIVE.with(Cell::get))));
			bump(&FREE_CALLS);
		}
	}

	fn allocate(values: Vec<u32>) -> CoreList<BoxedList> {
		let mut boxed = values.into_boxed_slice();
		let count = boxed.len();
		let raw = boxed.as_mut_ptr();

		std::mem::forget(boxed);

		unsafe { CoreList::new(raw, count) }
	}

	fn reset() {
		FREED.with(|v| v.set(None));
		FREE_CALLS.with(|v| v.set(0));
		LIVE.with(|v| v.set(0));
		LISTED_TAKES.with(|v| v.set(0));
		LIVE_AT_FREE.with(|v| v.set(None));
	}

	#[test]
	fn slice_exposes_every_element() {
		reset();

		let list = allocate(vec![3, 1, 4, 1, 5]);

		assert_eq!(list.as_slice(), &[3, 1, 4, 1, 5]);
		assert_eq!(list.len(), 5);
		assert!(!list.is_empty());
	}

	#[test]
	fn drop_releases_with_the_original_count() {
		reset();

		drop(allocate(vec![10, 20, 30]));

		assert_eq!(FREED.with(Cell::get), Some((3, 60)));
		assert_eq!(FREE_CALLS.with(Cell::get), 1);
	}

	#[test]
	fn null_list_is_empty_and_never_freed() {
		reset();

		let list: CoreList<BoxedList> = unsafe { CoreList::new(std::ptr::null_mut(), 4) };

		assert!(list.is_empty());
		assert_eq!(list.as_slice(), &[] as &[u32]);

		drop(list);

		assert_eq!(FREE_CALLS.with(Cell::get), 0);
	}

	#[test]
	fn listed_handles_are_referenced_before_release() {
		reset();

		let list = allocate(vec![4, 8, 15]);
		let refs = list.to_refs::<Entry>();

		assert_eq!(LISTED_TAKES.with(Cell::get), 3);
		assert_eq!(LIVE.with(Cell::get), 3);
		assert_eq!(FREE_CALLS.with(Cell::get), 0);
		assert_eq!(refs.iter().map(|e| e.id).collect::<Vec<_>>(), [4, 8, 15]);

		drop(list);

		assert_eq!(FREE_CALLS.with(Cell::get), 1);
		assert_eq!(LIVE_AT_FREE.with(Cell::get), Some(3));
		assert_eq!(refs.len(), 3);

		drop(refs);

		assert_eq!(LIVE.with(Cell::get), 0);
	}

	#[test]
	fn empty_listing_takes_no_references() {
		reset();

		let list: CoreList<BoxedList> = unsafe { CoreList::new(std::ptr::null_mut(), 0) };

		assert!(list.to_refs::<Entry>().is_empty());
		assert_eq!(LISTED_TAKES.with(Cell::get), 0);
	}
}
