use thiserror::Error;

use crate::{constant_pool, cursor::EndOfInput, mutf8};

#[derive(Error, Debug)]
pub enum ClassFileError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("Unexpected end of class file: {0}")]
    UnexpectedEndOfInput(#[from] EndOfInput),
    #[error("Invalid magic identifier: 0x{0:X}")]
    InvalidMagicNumber(u32),
    #[error("Unknown tag {tag} for constant pool entry #{index}")]
    UnknownConstantPoolTag { index: u16, tag: u8 },
    #[error("Illegal byte 0x{byte:02X} in Utf8 constant pool entry #{index}")]
    InvalidConstantPoolEntry { index: u16, byte: u8 },
    #[error(transparent)]
    InvalidTextEncoding(#[from] mutf8::DecodeError),
    #[error("Invalid access_flags: {0}")]
    InvalidAccessFlags(AccessFlagsViolation),
    #[error("Invalid this_class index: {0}")]
    InvalidThisClassIndex(u16),
    #[error("Invalid super_class index: {0}")]
    InvalidSuperClassIndex(u16),
    #[error("Invalid super_class: {0}")]
    InvalidSuperClass(SuperClassViolation),
    #[error("Invalid interface index: {0}")]
    InvalidInterfaceIndex(u16),
    #[error("Field name ({name_index}) and descriptor ({descriptor_index}) must reference Utf8 entries")]
    InvalidFieldIndex { name_index: u16, descriptor_index: u16 },
    #[error("Method name ({name_index}) and descriptor ({descriptor_index}) must reference Utf8 entries")]
    InvalidMethodIndex { name_index: u16, descriptor_index: u16 },
    #[error("Attribute name ({0}) must reference a Utf8 entry")]
    InvalidAttributeNameIndex(u16),
    #[error("Duplicate field with name {name_index} and descriptor {descriptor_index}")]
    DuplicateFieldSignature { name_index: u16, descriptor_index: u16 },
    #[error("{0} unexpected byte(s) at end of class file")]
    TrailingData(usize),
    #[error("Invalid constant pool index: {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("Expected {0}, found {1:?}")]
    UnexpectedConstantPoolEntry(&'static str, constant_pool::CpInfo),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessFlagsViolation {
    #[error("ACC_ABSTRACT must be set if ACC_INTERFACE is set")]
    InterfaceNotAbstract,
    #[error("ACC_FINAL, ACC_SUPER and ACC_ENUM cannot be set if ACC_INTERFACE is set")]
    InterfaceWithClassFlags,
    #[error("ACC_INTERFACE must be set if ACC_ANNOTATION is set")]
    AnnotationNotInterface,
    #[error("cannot have both ACC_FINAL and ACC_ABSTRACT set")]
    FinalAndAbstract,
    #[error("a field can have at most one of ACC_PUBLIC, ACC_PRIVATE and ACC_PROTECTED set")]
    FieldVisibility,
    #[error("a field cannot have both ACC_FINAL and ACC_VOLATILE set")]
    FieldFinalAndVolatile,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuperClassViolation {
    #[error("interfaces can only have 'java/lang/Object' as a superclass")]
    InterfaceNotExtendingObject,
    #[error("interfaces must have 'java/lang/Object' as a superclass")]
    InterfaceWithoutSuperClass,
    #[error("only class 'java/lang/Object' has no superclass")]
    MissingSuperClass,
}
