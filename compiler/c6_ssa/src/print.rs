//! Textual form of functions and modules.
//!
//! ```text
//! func add(%0: i64, %1: i64) -> i64 {
//! bb0:
//!   alloc_stack
//!   %2 = iadd i64 %0, %1
//!   ret i64 %2
//! }
//! ```

use std::fmt;

use c6_types::{TypeId, TypeRegistry};

use crate::{FuncId, Function, Instruction, Module, RawValue};

/// [`Display`](fmt::Display) adapter for one function.
pub struct FunctionDisplay<'a> {
    module: &'a Module,
    types: &'a TypeRegistry,
    func: &'a Function,
}

/// [`Display`](fmt::Display) adapter for a whole module.
pub struct ModuleDisplay<'a> {
    module: &'a Module,
    types: &'a TypeRegistry,
}

impl Module {
    pub fn display<'a>(&'a self, types: &'a TypeRegistry) -> ModuleDisplay<'a> {
        ModuleDisplay {
            module: self,
            types,
        }
    }

    pub fn display_function<'a>(
        &'a self,
        func: FuncId,
        types: &'a TypeRegistry,
    ) -> FunctionDisplay<'a> {
        FunctionDisplay {
            module: self,
            types,
            func: self.get(func),
        }
    }
}

impl fmt::Display for ModuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (id, _)) in self.module.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.module.display_function(id, self.types))?;
        }
        Ok(())
    }
}

impl FunctionDisplay<'_> {
    fn ty(&self, ty: TypeId) -> String {
        self.types.name(ty)
    }

    fn value_ty(&self, value: crate::ValueId) -> String {
        self.ty(self.func.value_type(value))
    }

    fn constant(&self, ty: TypeId, value: RawValue) -> String {
        let info = self.types.info(ty);
        if info.is_float() {
            if info.size == 4 {
                format!("{:?}", value.as_f32())
            } else {
                format!("{:?}", value.as_f64())
            }
        } else if info.is_pointer() {
            format!("{:#x}", value.as_u64())
        } else if info.flags.contains(c6_types::TypeFlags::UNSIGNED) {
            value.as_u64().to_string()
        } else {
            value.as_i64().to_string()
        }
    }

    fn instruction(&self, f: &mut fmt::Formatter<'_>, inst: &Instruction) -> fmt::Result {
        let func = self.func;
        match *inst {
            Instruction::AllocStack => {
                f.write_str("alloc_stack")?;
                for (i, local) in func.locals().iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{sep}{}: {}", local.value, self.ty(local.ty))?;
                }
                Ok(())
            }
            Instruction::Constant { result, value } => {
                let ty = func.value_type(result);
                write!(f, "{result} = const {} {}", self.ty(ty), self.constant(ty, value))
            }
            Instruction::Binary {
                op,
                result,
                lhs,
                rhs,
            } => write!(
                f,
                "{result} = {} {} {lhs}, {rhs}",
                op.mnemonic(),
                self.value_ty(lhs)
            ),
            Instruction::ICmp {
                pred,
                result,
                lhs,
                rhs,
            } => write!(
                f,
                "{result} = icmp {} {} {lhs}, {rhs}",
                pred.mnemonic(),
                self.value_ty(lhs)
            ),
            Instruction::FCmp {
                pred,
                result,
                lhs,
                rhs,
            } => write!(
                f,
                "{result} = fcmp {} {} {lhs}, {rhs}",
                pred.mnemonic(),
                self.value_ty(lhs)
            ),
            Instruction::Load { result, address } => {
                write!(f, "{result} = load {}, {address}", self.value_ty(result))
            }
            Instruction::Store { address, value } => {
                write!(f, "store {} {value}, {address}", self.value_ty(value))
            }
            Instruction::PushArg { value } => write!(f, "push_arg {value}"),
            Instruction::Call {
                callee, result, ..
            } => {
                let name = self.module.get(callee).name();
                match result {
                    Some(result) => {
                        write!(f, "{result} = call {} @{name}", self.value_ty(result))
                    }
                    None => write!(f, "call @{name}"),
                }
            }
            Instruction::Jump { target } => write!(f, "jump {target}"),
            Instruction::Branch {
                condition,
                then_block,
                else_block,
            } => write!(f, "branch {condition}, {then_block}, {else_block}"),
            Instruction::Ret { value } => write!(f, "ret {} {value}", self.value_ty(value)),
            Instruction::RetVoid => f.write_str("ret_void"),
        }
    }
}

impl fmt::Display for FunctionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let func = self.func;
        write!(f, "func {}(", func.name())?;
        for i in 0..func.arg_count() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let arg = func.arg(i);
            write!(f, "{arg}: {}", self.value_ty(arg))?;
        }
        if func.is_variadic() {
            f.write_str(if func.arg_count() == 0 { "..." } else { ", ..." })?;
        }
        f.write_str(")")?;
        if let Some(ret) = func.ret_type() {
            write!(f, " -> {}", self.ty(ret))?;
        }

        if func.is_external() {
            f.write_str(" #foreign")?;
            if let Some(library) = func.library() {
                write!(f, " \"{library}\"")?;
            }
            return writeln!(f);
        }

        writeln!(f, " {{")?;
        for (i, block) in func.blocks().iter().enumerate() {
            writeln!(f, "bb{i}:")?;
            for inst in &func.instructions()[block.range()] {
                f.write_str("  ")?;
                self.instruction(f, inst)?;
                writeln!(f)?;
            }
        }
        writeln!(f, "}}")
    }
}
