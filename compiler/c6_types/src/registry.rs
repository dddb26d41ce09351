//! The type registry.
//!
//! Append-only: ids stay valid for the registry's lifetime. Reads take a
//! shared lock; only the first request for a given pointer type writes.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{TypeFlags, TypeId};

/// Built-in scalar types, in [`TypeId`] order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Primitive {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
}

impl Primitive {
    pub const ALL: [Primitive; TypeId::PRIMITIVE_COUNT as usize] = [
        Primitive::I8,
        Primitive::U8,
        Primitive::I16,
        Primitive::U16,
        Primitive::I32,
        Primitive::U32,
        Primitive::I64,
        Primitive::U64,
        Primitive::F32,
        Primitive::F64,
        Primitive::Bool,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Primitive::I8 => "i8",
            Primitive::U8 => "u8",
            Primitive::I16 => "i16",
            Primitive::U16 => "u16",
            Primitive::I32 => "i32",
            Primitive::U32 => "u32",
            Primitive::I64 => "i64",
            Primitive::U64 => "u64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::Bool => "bool",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub const fn size(self) -> u32 {
        match self {
            Primitive::I8 | Primitive::U8 | Primitive::Bool => 1,
            Primitive::I16 | Primitive::U16 => 2,
            Primitive::I32 | Primitive::U32 | Primitive::F32 => 4,
            Primitive::I64 | Primitive::U64 | Primitive::F64 => 8,
        }
    }

    const fn flags(self) -> TypeFlags {
        let class = match self {
            Primitive::I8 | Primitive::I16 | Primitive::I32 | Primitive::I64 => TypeFlags::INT,
            Primitive::U8 | Primitive::U16 | Primitive::U32 | Primitive::U64 | Primitive::Bool => {
                TypeFlags::INT.union(TypeFlags::UNSIGNED)
            }
            Primitive::F32 | Primitive::F64 => TypeFlags::FLOATING_POINT,
        };
        TypeFlags::PRIMITIVE.union(class)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    Primitive(Primitive),
    Pointer { pointee: TypeId },
}

/// Layout and classification of one type.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TypeInfo {
    pub kind: TypeKind,
    pub size: u32,
    pub align: u32,
    pub flags: TypeFlags,
}

impl TypeInfo {
    fn primitive(p: Primitive) -> Self {
        TypeInfo {
            kind: TypeKind::Primitive(p),
            size: p.size(),
            align: p.size(),
            flags: p.flags(),
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "pointer width is 4 or 8 bytes"
    )]
    fn pointer(pointee: TypeId) -> Self {
        let width = std::mem::size_of::<usize>() as u32;
        TypeInfo {
            kind: TypeKind::Pointer { pointee },
            size: width,
            align: width,
            flags: TypeFlags::POINTER,
        }
    }

    #[inline]
    pub fn is_int(&self) -> bool {
        self.flags.contains(TypeFlags::INT)
    }

    #[inline]
    pub fn is_float(&self) -> bool {
        self.flags.contains(TypeFlags::FLOATING_POINT)
    }

    #[inline]
    pub fn is_pointer(&self) -> bool {
        self.flags.contains(TypeFlags::POINTER)
    }

    /// Pointee of a pointer type.
    #[inline]
    pub fn pointee(&self) -> Option<TypeId> {
        match self.kind {
            TypeKind::Pointer { pointee } => Some(pointee),
            TypeKind::Primitive(_) => None,
        }
    }
}

struct Inner {
    infos: Vec<TypeInfo>,
    pointers: FxHashMap<TypeId, TypeId>,
}

/// Registry of every type known to a compilation.
pub struct TypeRegistry {
    inner: RwLock<Inner>,
}

impl TypeRegistry {
    /// A registry holding only the primitives.
    pub fn new() -> Self {
        let infos = Primitive::ALL.into_iter().map(TypeInfo::primitive).collect();
        TypeRegistry {
            inner: RwLock::new(Inner {
                infos,
                pointers: FxHashMap::default(),
            }),
        }
    }

    /// Layout of `id`.
    ///
    /// # Panics
    /// If `id` was not issued by this registry.
    #[track_caller]
    pub fn info(&self, id: TypeId) -> TypeInfo {
        let inner = self.inner.read();
        match inner.infos.get(id.index()) {
            Some(info) => *info,
            None => panic!("{id:?} is not registered ({} types)", inner.infos.len()),
        }
    }

    /// The interned pointer type `*pointee`.
    pub fn pointer_to(&self, pointee: TypeId) -> TypeId {
        if let Some(&id) = self.inner.read().pointers.get(&pointee) {
            return id;
        }
        let mut inner = self.inner.write();
        // Another thread may have won the race between the two locks.
        if let Some(&id) = inner.pointers.get(&pointee) {
            return id;
        }
        assert!(
            pointee.index() < inner.infos.len(),
            "{pointee:?} is not registered"
        );
        let raw = u32::try_from(inner.infos.len()).unwrap_or_else(|_| {
            panic!("type registry exceeded u32::MAX types");
        });
        let id = TypeId::from_raw(raw);
        inner.infos.push(TypeInfo::pointer(pointee));
        inner.pointers.insert(pointee, id);
        id
    }

    /// Resolve a type spelled as in source: a primitive name with any number
    /// of leading `*`.
    pub fn by_name(&self, name: &str) -> Option<TypeId> {
        let base = name.trim_start_matches('*');
        let depth = name.len() - base.len();
        let primitive = Primitive::from_name(base)?;
        let mut id = TypeId::from_raw(primitive as u32);
        for _ in 0..depth {
            id = self.pointer_to(id);
        }
        Some(id)
    }

    /// Source spelling of `id`, e.g. `**u8`.
    pub fn name(&self, id: TypeId) -> String {
        let mut stars = 0;
        let mut current = id;
        loop {
            match self.info(current).kind {
                TypeKind::Pointer { pointee } => {
                    stars += 1;
                    current = pointee;
                }
                TypeKind::Primitive(p) => return format!("{}{}", "*".repeat(stars), p.name()),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Thread-safe shared registry.
#[derive(Clone, Debug, Default)]
pub struct SharedTypes(Arc<TypeRegistry>);

impl SharedTypes {
    pub fn new() -> Self {
        SharedTypes(Arc::new(TypeRegistry::new()))
    }
}

impl Deref for SharedTypes {
    type Target = TypeRegistry;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
