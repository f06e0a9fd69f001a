//! Safe wrappers for LLVM `Module` entry points missing from the stable C
//! API, plus function-level verification and version queries.
//!
//! LLVM's C++ `Module::getOrInsertFunction` and `Module::getOrInsertGlobal`
//! have no C binding, so `llvm-sys` (and [inkwell] above it) cannot reach
//! them: `add_function` on a taken name silently creates a renamed symbol
//! instead of handing back the existing declaration. This crate ships a
//! small C++ translation unit exposing those entry points over the stable
//! ABI, raw declarations for them in [`ffi`], and safe [inkwell]-typed
//! wrappers on top:
//!
//! * [`ModuleExt`] — get-or-insert for function declarations and globals.
//! * [`verify_function`] / [`verify_module`] — consistency checks with a
//!   selectable [`FailureAction`] and captured diagnostic text.
//! * [`version`] — the version constants compiled into the linked LLVM.
//!
//! All handles stay owned by their [`Context`](inkwell::context::Context)
//! and module on the inkwell side; nothing here creates or destroys LLVM
//! objects beyond what the wrapped calls themselves do. A `Context` is not
//! thread safe, so callers serialize access to a shared module themselves.

pub mod analysis;
pub mod ffi;
pub mod module;

pub use analysis::{FailureAction, VerifierError, verify_function, verify_module};
pub use module::ModuleExt;

pub use inkwell;
pub use inkwell::llvm_sys;

/// The LLVM version selected by crate features, e.g. `"llvm14"`.
#[allow(unreachable_code)]
#[must_use]
pub fn llvm_version() -> &'static str {
    #[cfg(feature = "llvm14-0")]
    return "llvm14";
    panic!("No recognised llvm feature.")
}

/// The `(major, minor)` version of the LLVM libraries linked into this
/// binary.
#[must_use]
pub fn version() -> (u32, u32) {
    unsafe { (ffi::LLVMExtVersionMajor(), ffi::LLVMExtVersionMinor()) }
}
