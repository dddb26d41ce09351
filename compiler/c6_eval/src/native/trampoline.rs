//! x86-64 System V call shim encoder.
//!
//! The shim is a tiny leaf function called as `extern "C" fn() -> u64`:
//!
//! ```text
//! push rax                ; realign rsp to 16 before the inner call
//! mov  rdi, imm64         ; integer arguments: rdi rsi rdx rcx r8 r9
//! mov  rax, imm64         ; floating arguments go through rax
//! movq xmm0, rax          ;   into xmm0..xmm7
//! mov  eax, imm32         ; variadic callees: number of xmm arguments
//! mov  r11, imm64         ; target
//! call r11
//! pop  rcx
//! movq rax, xmm0          ; floating results only
//! ret
//! ```

use super::{NativeArg, NativeSignature};

/// Integer arguments that fit in registers.
pub const MAX_INT_ARGS: usize = 6;

/// Floating-point arguments that fit in registers.
pub const MAX_FLOAT_ARGS: usize = 8;

/// `mov <reg>, imm64` prefixes for rdi, rsi, rdx, rcx, r8, r9.
const INT_MOVS: [[u8; 2]; MAX_INT_ARGS] = [
    [0x48, 0xbf],
    [0x48, 0xbe],
    [0x48, 0xba],
    [0x48, 0xb9],
    [0x49, 0xb8],
    [0x49, 0xb9],
];

const PUSH_RAX: u8 = 0x50;
const POP_RCX: u8 = 0x59;
const RET: u8 = 0xc3;
const MOV_RAX_IMM64: [u8; 2] = [0x48, 0xb8];
const MOV_EAX_IMM32: u8 = 0xb8;
const MOV_R11_IMM64: [u8; 2] = [0x49, 0xbb];
const CALL_R11: [u8; 3] = [0x41, 0xff, 0xd3];
/// `movq xmmN, rax` without its ModRM byte.
const MOVQ_XMM_RAX: [u8; 4] = [0x66, 0x48, 0x0f, 0x6e];
const MOVQ_RAX_XMM0: [u8; 5] = [0x66, 0x48, 0x0f, 0x7e, 0xc0];

/// Machine code that calls `address` with `args` and returns the result in
/// `rax`.
///
/// # Panics
/// If more than [`MAX_INT_ARGS`] integer or [`MAX_FLOAT_ARGS`] floating-point
/// arguments are given; stack-passed arguments are not supported.
pub fn encode_sysv_call(address: usize, args: &[NativeArg], signature: NativeSignature) -> Vec<u8> {
    let mut code = Vec::with_capacity(64 + args.len() * 16);
    code.push(PUSH_RAX);

    let (mut ints, mut floats) = (0usize, 0usize);
    for arg in args {
        if arg.is_float {
            assert!(
                floats < MAX_FLOAT_ARGS,
                "native calls take at most {MAX_FLOAT_ARGS} floating-point arguments"
            );
            code.extend_from_slice(&MOV_RAX_IMM64);
            code.extend_from_slice(&arg.bits.to_le_bytes());
            code.extend_from_slice(&MOVQ_XMM_RAX);
            code.push(0xc0 | ((floats as u8) << 3));
            floats += 1;
        } else {
            assert!(
                ints < MAX_INT_ARGS,
                "native calls take at most {MAX_INT_ARGS} integer arguments"
            );
            code.extend_from_slice(&INT_MOVS[ints]);
            code.extend_from_slice(&arg.bits.to_le_bytes());
            ints += 1;
        }
    }

    if signature.variadic {
        code.push(MOV_EAX_IMM32);
        code.extend_from_slice(&(floats as u32).to_le_bytes());
    }

    code.extend_from_slice(&MOV_R11_IMM64);
    code.extend_from_slice(&(address as u64).to_le_bytes());
    code.extend_from_slice(&CALL_R11);
    code.push(POP_RCX);
    if signature.returns_float {
        code.extend_from_slice(&MOVQ_RAX_XMM0);
    }
    code.push(RET);
    code
}
