//! Raw declarations for the shim entry points compiled from `wrappers.cc`.
//!
//! These extend the stable C API re-exported through [`inkwell::llvm_sys`]
//! with a few `Module` operations that only exist on the C++ side. The
//! symbols carry an `LLVMExt` prefix so they cannot collide with entry
//! points added to later LLVM-C releases (`LLVMVerifyFunction` already
//! exists there, with a narrower contract).

use std::ffi::c_char;

use inkwell::llvm_sys::analysis::LLVMVerifierFailureAction;
use inkwell::llvm_sys::prelude::{LLVMBool, LLVMModuleRef, LLVMTypeRef, LLVMValueRef};

#[link(name = "llvm_ext_wrappers", kind = "static")]
unsafe extern "C" {
    /// `Module::getOrInsertFunction`. Returns the declaration named `Name`,
    /// creating it with type `FunctionTy` if absent. When a declaration
    /// with that name exists with a different type, the returned value is a
    /// cast of it rather than the declaration itself.
    pub fn LLVMExtGetOrInsertFunction(
        M: LLVMModuleRef,
        Name: *const c_char,
        FunctionTy: LLVMTypeRef,
    ) -> LLVMValueRef;

    /// `Module::getOrInsertGlobal`, with the same cast-on-mismatch contract
    /// as [`LLVMExtGetOrInsertFunction`].
    pub fn LLVMExtGetOrInsertGlobal(
        M: LLVMModuleRef,
        Name: *const c_char,
        Ty: LLVMTypeRef,
    ) -> LLVMValueRef;

    /// Function-level twin of `LLVMVerifyModule`. Returns a non-zero value
    /// iff the function is broken. When `OutMessage` is non-null it
    /// receives the diagnostic text (release with `LLVMDisposeMessage`),
    /// duplicated to stderr for every action except
    /// `LLVMReturnStatusAction`. Under `LLVMAbortProcessAction` a broken
    /// function aborts the process and the call does not return.
    pub fn LLVMExtVerifyFunction(
        Fn: LLVMValueRef,
        Action: LLVMVerifierFailureAction,
        OutMessage: *mut *mut c_char,
    ) -> LLVMBool;

    /// Major version of the LLVM libraries the shims were compiled against.
    pub fn LLVMExtVersionMajor() -> u32;

    /// Minor version of the LLVM libraries the shims were compiled against.
    pub fn LLVMExtVersionMinor() -> u32;
}
