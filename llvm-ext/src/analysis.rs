//! Function and module verification with a selectable failure action.
//!
//! [inkwell] only exposes verification as a print-to-stderr boolean
//! ([`inkwell::values::FunctionValue::verify`]); the wrappers here capture
//! the verifier's diagnostic text instead and let the caller pick what
//! happens on failure.

use std::ffi::{CStr, c_char};
use std::ptr;

use inkwell::llvm_sys::analysis::{LLVMVerifierFailureAction, LLVMVerifyModule};
use inkwell::llvm_sys::core::LLVMDisposeMessage;
use inkwell::module::Module;
use inkwell::values::{AsValueRef, FunctionValue};
use thiserror::Error;

use crate::ffi;

/// What the verifier does when it finds a broken function or module.
///
/// Every action reports the failure to the caller; they differ in what
/// else happens to the diagnostic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureAction {
    /// Print the diagnostic to stderr and abort the process.
    Abort,
    /// Print the diagnostic to stderr and return the failure.
    Print,
    /// Just return the failure.
    ReturnStatus,
}

impl From<FailureAction> for LLVMVerifierFailureAction {
    fn from(action: FailureAction) -> Self {
        match action {
            FailureAction::Abort => LLVMVerifierFailureAction::LLVMAbortProcessAction,
            FailureAction::Print => LLVMVerifierFailureAction::LLVMPrintMessageAction,
            FailureAction::ReturnStatus => LLVMVerifierFailureAction::LLVMReturnStatusAction,
        }
    }
}

/// A failed consistency check, carrying the verifier's diagnostic text.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum VerifierError {
    /// A function failed the consistency check over its instructions.
    #[error("Broken function '{symbol}': {message}")]
    BrokenFunction {
        /// Name of the offending function.
        symbol: String,
        /// Diagnostic text produced by the verifier.
        message: String,
    },
    /// A module failed the consistency check.
    #[error("Broken module '{symbol}': {message}")]
    BrokenModule {
        /// Name of the offending module.
        symbol: String,
        /// Diagnostic text produced by the verifier.
        message: String,
    },
}

impl VerifierError {
    /// The verifier's diagnostic text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BrokenFunction { message, .. } | Self::BrokenModule { message, .. } => message,
        }
    }
}

/// Checks the internal consistency of `func`'s instructions.
///
/// Under [`FailureAction::Abort`] a broken function terminates the process
/// inside LLVM and this call does not return.
pub fn verify_function(
    func: FunctionValue<'_>,
    action: FailureAction,
) -> Result<(), VerifierError> {
    let mut raw_message: *mut c_char = ptr::null_mut();
    let broken = unsafe {
        ffi::LLVMExtVerifyFunction(func.as_value_ref(), action.into(), &mut raw_message)
    } != 0;
    let message = unsafe { take_message(raw_message) };
    if broken {
        return Err(VerifierError::BrokenFunction {
            symbol: func.get_name().to_string_lossy().into_owned(),
            message,
        });
    }
    Ok(())
}

/// Checks the internal consistency of every function and global in
/// `module`.
///
/// The stable C API already covers this one; it is forwarded to
/// `LLVMVerifyModule` directly.
pub fn verify_module(module: &Module<'_>, action: FailureAction) -> Result<(), VerifierError> {
    let mut raw_message: *mut c_char = ptr::null_mut();
    let broken =
        unsafe { LLVMVerifyModule(module.as_mut_ptr(), action.into(), &mut raw_message) } != 0;
    let message = unsafe { take_message(raw_message) };
    if broken {
        return Err(VerifierError::BrokenModule {
            symbol: module.get_name().to_string_lossy().into_owned(),
            message,
        });
    }
    Ok(())
}

/// Copies a diagnostic buffer allocated by LLVM into a `String` and
/// releases it.
unsafe fn take_message(raw: *mut c_char) -> String {
    if raw.is_null() {
        return String::new();
    }
    let message = unsafe { CStr::from_ptr(raw) }
        .to_string_lossy()
        .trim_end()
        .to_string();
    unsafe { LLVMDisposeMessage(raw) };
    message
}
