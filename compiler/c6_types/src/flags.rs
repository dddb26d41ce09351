use bitflags::bitflags;

bitflags! {
    /// Classification bits, cached per type so the interpreter and builder
    /// never have to match on the kind.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u8 {
        const PRIMITIVE = 1 << 0;
        const INT = 1 << 1;
        const UNSIGNED = 1 << 2;
        const FLOATING_POINT = 1 << 3;
        const POINTER = 1 << 4;
    }
}
