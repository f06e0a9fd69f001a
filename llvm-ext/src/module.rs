//! Get-or-insert extensions for [`Module`].

use std::ffi::CString;

use anyhow::{Result, anyhow};
use inkwell::module::Module;
use inkwell::types::{AnyType, AnyTypeEnum, AsTypeRef, BasicType, FunctionType};
use inkwell::values::{AsValueRef, FunctionValue, GlobalValue};

use crate::ffi;

/// `Module` operations that are only reachable through the C++ API.
///
/// [`Module::add_function`] and [`Module::add_global`] unconditionally
/// create a fresh symbol, renaming it when the name is already taken. The
/// methods here forward to `Module::getOrInsertFunction` and
/// `Module::getOrInsertGlobal` instead, so repeated calls with the same
/// name and type hand back the same declaration every time.
pub trait ModuleExt<'ctx> {
    /// Gets the function declaration named `name`, creating it with type
    /// `ty` if it does not exist.
    ///
    /// If a function with this name exists with a different type an error
    /// is returned and the module is left unchanged.
    fn get_or_insert_function(
        &self,
        name: &str,
        ty: FunctionType<'ctx>,
    ) -> Result<FunctionValue<'ctx>>;

    /// Gets the global named `name`, creating it with element type `ty` if
    /// it does not exist.
    ///
    /// If a global with this name exists with a different type an error is
    /// returned and the module is left unchanged.
    fn get_or_insert_global(
        &self,
        name: &str,
        ty: impl BasicType<'ctx>,
    ) -> Result<GlobalValue<'ctx>>;
}

impl<'ctx> ModuleExt<'ctx> for Module<'ctx> {
    fn get_or_insert_function(
        &self,
        name: &str,
        ty: FunctionType<'ctx>,
    ) -> Result<FunctionValue<'ctx>> {
        let c_name = CString::new(name)?;
        let raw = unsafe {
            ffi::LLVMExtGetOrInsertFunction(self.as_mut_ptr(), c_name.as_ptr(), ty.as_type_ref())
        };
        let func = self
            .get_function(name)
            .ok_or_else(|| anyhow!("No function named '{name}' after insertion"))?;
        // On a type mismatch LLVM hands back a cast of the declaration
        // rather than the declaration itself.
        if raw != func.as_value_ref() {
            return Err(anyhow!(
                "Function '{name}' has wrong type: expected: {} actual: {}",
                ty.print_to_string(),
                func.get_type().print_to_string()
            ));
        }
        Ok(func)
    }

    fn get_or_insert_global(
        &self,
        name: &str,
        ty: impl BasicType<'ctx>,
    ) -> Result<GlobalValue<'ctx>> {
        let c_name = CString::new(name)?;
        let ty = ty.as_basic_type_enum();
        let raw = unsafe {
            ffi::LLVMExtGetOrInsertGlobal(self.as_mut_ptr(), c_name.as_ptr(), ty.as_type_ref())
        };
        let global = self
            .get_global(name)
            .ok_or_else(|| anyhow!("No global named '{name}' after insertion"))?;
        if raw != global.as_value_ref() {
            let actual = {
                // TODO This is exposed as `get_value_type` on the master branch
                // of inkwell, will be in the next release. When it's released
                // use `get_value_type`.
                use inkwell::llvm_sys::core::LLVMGlobalGetValueType;
                unsafe { AnyTypeEnum::new(LLVMGlobalGetValueType(global.as_value_ref())) }
            };
            return Err(anyhow!(
                "Global '{name}' has wrong type: expected: {ty} actual: {actual}"
            ));
        }
        Ok(global)
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::ModuleExt;
    use crate::test::{TestContext, llvm_ctx};

    #[rstest]
    fn get_or_insert_function_is_idempotent(llvm_ctx: TestContext) {
        let module = llvm_ctx.module();
        let ty = llvm_ctx.i64_unary_fn();

        let first = module.get_or_insert_function("callback", ty).unwrap();
        let second = module.get_or_insert_function("callback", ty).unwrap();

        assert_eq!(first, second);
        assert_eq!(module.get_function("callback"), Some(first));
    }

    #[rstest]
    fn get_or_insert_function_returns_existing(llvm_ctx: TestContext) {
        let module = llvm_ctx.module();
        let ty = llvm_ctx.i64_unary_fn();

        let declared = module.add_function("callback", ty, None);
        let found = module.get_or_insert_function("callback", ty).unwrap();

        assert_eq!(declared, found);
    }

    #[rstest]
    fn get_or_insert_function_rejects_wrong_type(llvm_ctx: TestContext) {
        let module = llvm_ctx.module();
        module.add_function("callback", llvm_ctx.i64_unary_fn(), None);

        let f64_ty = llvm_ctx.iw_context().f64_type().fn_type(&[], false);
        let err = module
            .get_or_insert_function("callback", f64_ty)
            .unwrap_err();

        assert!(err.to_string().contains("wrong type"));
    }

    #[rstest]
    fn get_or_insert_global_is_idempotent(llvm_ctx: TestContext) {
        let module = llvm_ctx.module();
        let i64_ty = llvm_ctx.iw_context().i64_type();

        let first = module.get_or_insert_global("counter", i64_ty).unwrap();
        let second = module.get_or_insert_global("counter", i64_ty).unwrap();

        assert_eq!(first, second);
        assert_eq!(module.get_global("counter"), Some(first));
    }

    #[rstest]
    fn get_or_insert_global_returns_existing(llvm_ctx: TestContext) {
        let module = llvm_ctx.module();
        let i64_ty = llvm_ctx.iw_context().i64_type();

        let declared = module.add_global(i64_ty, None, "counter");
        let found = module.get_or_insert_global("counter", i64_ty).unwrap();

        assert_eq!(declared, found);
    }

    #[rstest]
    fn get_or_insert_global_rejects_wrong_type(llvm_ctx: TestContext) {
        let module = llvm_ctx.module();
        module.add_global(llvm_ctx.iw_context().i64_type(), None, "counter");

        let err = module
            .get_or_insert_global("counter", llvm_ctx.iw_context().f64_type())
            .unwrap_err();

        assert!(err.to_string().contains("wrong type"));
    }

    #[rstest]
    fn rejects_interior_nul_names(llvm_ctx: TestContext) {
        let module = llvm_ctx.module();

        assert!(
            module
                .get_or_insert_function("bad\0name", llvm_ctx.i64_unary_fn())
                .is_err()
        );
        assert!(
            module
                .get_or_insert_global("bad\0name", llvm_ctx.iw_context().i64_type())
                .is_err()
        );
    }
}
