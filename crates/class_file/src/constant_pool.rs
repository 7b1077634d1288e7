use std::{convert::TryFrom, ops::Index};

use crate::{mutf8, Result};

#[macro_export]
macro_rules! matches_cp_info {
    ($cp:expr, $index:expr, $i:ident) => {
        match $cp.get($index) {
            Some($crate::constant_pool::CpInfo::$i(n)) => Ok(n),
            Some(c) => Err($crate::ClassFileError::UnexpectedConstantPoolEntry(
                stringify!($i),
                c.clone(),
            )),
            None => Err($crate::ClassFileError::InvalidConstantPoolIndex($index)),
        }
    };
}

/// The 1-indexed constant pool.
///
/// `count` is the `constant_pool_count` item as declared in the class file,
/// one greater than the number of addressable slots.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConstantPool {
    count: u16,
    cp_infos: Vec<CpInfo>,
}
impl ConstantPool {
    pub fn new(count: u16, cp_infos: Vec<CpInfo>) -> Self {
        Self { count, cp_infos }
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cp_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cp_infos.is_empty()
    }

    pub fn get(&self, index: u16) -> Option<&CpInfo> {
        self.cp_infos.get((index as usize).checked_sub(1)?)
    }

    pub fn entries(&self) -> impl Iterator<Item = CpEntry<'_>> {
        self.cp_infos.iter().zip(1u16..).map(|(info, index)| CpEntry { index, info })
    }

    pub fn utf8_bytes(&self, index: u16) -> Result<&[u8]> {
        matches_cp_info!(self, index, Utf8).map(Vec::as_slice)
    }

    pub fn utf8(&self, index: u16) -> Result<String> {
        Ok(mutf8::decode_lossy(self.utf8_bytes(index)?)?)
    }

    pub fn class_name(&self, index: u16) -> Result<String> {
        let ClassInfo { name_index } = matches_cp_info!(self, index, Class)?;
        self.utf8(*name_index)
    }
}
/// # Panics
///
/// Panics if `index` is 0 or greater than [`ConstantPool::len`]. Use
/// [`ConstantPool::get`] for indices read from untrusted input.
impl Index<u16> for ConstantPool {
    type Output = CpInfo;

    fn index(&self, index: u16) -> &Self::Output {
        &self.cp_infos[index as usize - 1]
    }
}
impl<'a> IntoIterator for &'a ConstantPool {
    type Item = &'a CpInfo;
    type IntoIter = std::slice::Iter<'a, CpInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.cp_infos.iter()
    }
}

/// A pool entry together with the slot it occupies.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CpEntry<'a> {
    pub index: u16,
    pub info: &'a CpInfo,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum CpTag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    FieldRef = 9,
    MethodRef = 10,
    InterfaceMethodRef = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    InvokeDynamic = 18,
}
impl CpTag {
    /// Number of pool slots an entry with this tag occupies.
    pub fn slot_size(self) -> u16 {
        match self {
            CpTag::Long | CpTag::Double => 2,
            _ => 1,
        }
    }
}
impl TryFrom<u8> for CpTag {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(CpTag::Utf8),
            3 => Ok(CpTag::Integer),
            4 => Ok(CpTag::Float),
            5 => Ok(CpTag::Long),
            6 => Ok(CpTag::Double),
            7 => Ok(CpTag::Class),
            8 => Ok(CpTag::String),
            9 => Ok(CpTag::FieldRef),
            10 => Ok(CpTag::MethodRef),
            11 => Ok(CpTag::InterfaceMethodRef),
            12 => Ok(CpTag::NameAndType),
            15 => Ok(CpTag::MethodHandle),
            16 => Ok(CpTag::MethodType),
            18 => Ok(CpTag::InvokeDynamic),
            _ => Err(value),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum CpInfo {
    MethodRef(RefInfo),
    FieldRef(RefInfo),
    Float(FloatInfo),
    InterfaceMethodRef(RefInfo),
    Class(ClassInfo),
    NameAndType(NameAndTypeInfo),
    /// Raw modified UTF-8 bytes, see [`crate::mutf8`].
    Utf8(Vec<u8>),
    String { string_index: u16 },
    InvokeDynamic(InvokeDynamicInfo),
    Integer(IntegerInfo),
    MethodHandle(MethodHandleInfo),
    MethodType(MethodTypeInfo),
    Long(LongInfo),
    Double(DoubleInfo),
    /// Second slot of a `Long` or `Double`; never a valid reference target.
    Unusable(CpTag),
}
impl CpInfo {
    pub fn tag(&self) -> CpTag {
        match self {
            CpInfo::MethodRef(_) => CpTag::MethodRef,
            CpInfo::FieldRef(_) => CpTag::FieldRef,
            CpInfo::Float(_) => CpTag::Float,
            CpInfo::InterfaceMethodRef(_) => CpTag::InterfaceMethodRef,
            CpInfo::Class(_) => CpTag::Class,
            CpInfo::NameAndType(_) => CpTag::NameAndType,
            CpInfo::Utf8(_) => CpTag::Utf8,
            CpInfo::String { .. } => CpTag::String,
            CpInfo::InvokeDynamic(_) => CpTag::InvokeDynamic,
            CpInfo::Integer(_) => CpTag::Integer,
            CpInfo::MethodHandle(_) => CpTag::MethodHandle,
            CpInfo::MethodType(_) => CpTag::MethodType,
            CpInfo::Long(_) => CpTag::Long,
            CpInfo::Double(_) => CpTag::Double,
            CpInfo::Unusable(tag) => *tag,
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct RefInfo {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassInfo {
    // The value of the name_index item must be a valid index into the constant_pool table.
    // The constant_pool entry at that index must be a CONSTANT_Utf8_info structure (§4.4.7)
    // representing a valid binary class or interface name encoded in internal form (§4.2.1).
    pub name_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NameAndTypeInfo {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvokeDynamicInfo {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodHandleInfo {
    pub reference_kind: u8,
    pub reference_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodTypeInfo {
    pub descriptor_index: u16,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct IntegerInfo {
    pub bytes: u32,
}
impl IntegerInfo {
    pub fn value(&self) -> i32 {
        self.bytes as i32
    }
}

// https://docs.oracle.com/javase/specs/jvms/se18/html/jvms-4.html#jvms-4.4.4
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct FloatInfo {
    pub bytes: u32,
}
impl FloatInfo {
    /// IEEE 754 single, including infinities and NaN payloads.
    pub fn value(&self) -> f32 {
        f32::from_bits(self.bytes)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LongInfo {
    pub high_bytes: u32,
    pub low_bytes: u32,
}
impl LongInfo {
    pub fn value(&self) -> i64 {
        ((self.high_bytes as u64) << 32 | self.low_bytes as u64) as i64
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct DoubleInfo {
    pub high_bytes: u32,
    pub low_bytes: u32,
}
impl DoubleInfo {
    pub fn value(&self) -> f64 {
        f64::from_bits((self.high_bytes as u64) << 32 | self.low_bytes as u64)
    }
}

#[cfg(test)]
mod lookup_tests {
    use super::*;
    use crate::ClassFileError;

    fn pool() -> ConstantPool {
        ConstantPool::new(
            5,
            vec![
                CpInfo::Class(ClassInfo { name_index: 2 }),
                CpInfo::Utf8(b"my/MyClass".to_vec()),
                CpInfo::Long(LongInfo {
                    high_bytes: 0xffff_ffff,
                    low_bytes: 0xffff_fffe,
                }),
                CpInfo::Unusable(CpTag::Long),
            ],
        )
    }

    #[test]
    fn it_should_be_indexed_from_one() {
        let pool = pool();
        assert_eq!(pool.get(0), None);
        assert_eq!(pool.get(1).map(CpInfo::tag), Some(CpTag::Class));
        assert_eq!(pool.get(4), Some(&CpInfo::Unusable(CpTag::Long)));
        assert_eq!(pool.get(5), None);
        assert_eq!(pool[2].tag(), CpTag::Utf8);
    }

    #[test]
    #[should_panic]
    fn it_should_panic_when_indexed_with_zero() {
        let _ = &pool()[0];
    }

    #[test]
    fn it_should_pair_entries_with_their_index() {
        let indices = pool().entries().map(|e| e.index).collect::<Vec<_>>();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn it_should_resolve_class_names() {
        assert_eq!(pool().class_name(1).unwrap(), "my/MyClass");
    }

    #[test]
    fn it_should_reject_lookups_of_the_wrong_kind() {
        let pool = pool();
        assert!(matches!(
            pool.utf8(1),
            Err(ClassFileError::UnexpectedConstantPoolEntry("Utf8", _))
        ));
        assert!(matches!(
            pool.utf8(4),
            Err(ClassFileError::UnexpectedConstantPoolEntry(
                "Utf8",
                CpInfo::Unusable(CpTag::Long)
            ))
        ));
        assert!(matches!(
            pool.utf8(9),
            Err(ClassFileError::InvalidConstantPoolIndex(9))
        ));
    }

    #[test]
    fn it_should_expose_typed_values() {
        let CpInfo::Long(long) = pool()[3].clone() else {
            unreachable!()
        };
        assert_eq!(long.value(), -2);
        assert_eq!(IntegerInfo { bytes: 0xffff_ffff }.value(), -1);
        assert_eq!(FloatInfo { bytes: 0x3fc0_0000 }.value(), 1.5);
        assert!(FloatInfo { bytes: 0x7f80_0000 }.value().is_infinite());
        assert_eq!(
            DoubleInfo {
                high_bytes: 0x4004_0000,
                low_bytes: 0
            }
            .value(),
            2.5
        );
    }
}
