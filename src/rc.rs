use std::{
	fmt,
	hash::{Hash, Hasher},
	ops::Deref,
};

/// A wrapper over a core object whose lifetime is reference counted by the core.
///
/// # Safety
///
/// `inc_ref` must hand back a value owning a fresh core reference to the same
/// object, and `dec_ref` must release exactly one.
pub unsafe trait RefCountable: Sized {
	unsafe fn inc_ref(handle: &Self) -> Ref<Self>;

	unsafe fn dec_ref(handle: &Self);
}

/// Owns exactly one core reference to `T`.
pub struct Ref<T: RefCountable> {
	contents: T,
}

impl<T: RefCountable> Ref<T> {
	/// Adopts a reference the core already handed out.
	///
	/// # Safety
	///
	/// `contents` must own one core reference that nothing else will release.
	pub unsafe fn new(contents: T) -> Self {
		Self { contents }
	}
}

impl<T: RefCountable> Deref for Ref<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.contents
	}
}

impl<T: RefCountable> AsRef<T> for Ref<T> {
	fn as_ref(&self) -> &T {
		&self.contents
	}
}

impl<T: RefCountable> Clone for Ref<T> {
	fn clone(&self) -> Self {
		unsafe { T::inc_ref(&self.contents) }
	}
}

impl<T: RefCountable> Drop for Ref<T> {
	fn drop(&mut self) {
		unsafe { T::dec_ref(&self.contents) }
	}
}

impl<T: RefCountable + PartialEq> PartialEq for Ref<T> {
	fn eq(&self, other: &Self) -> bool {
		self.contents == other.contents
	}
}

impl<T: RefCountable + Eq> Eq for Ref<T> {}

impl<T: RefCountable + Hash> Hash for Ref<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.contents.hash(state);
	}
}

impl<T: RefCountable + fmt::Debug> fmt::Debug for Ref<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.contents.fmt(f)
	}
}

impl<T: RefCountable + fmt::Display> fmt::Display for Ref<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.contents.fmt(f)
	}
}
