// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html

mod access_flags;
pub mod attributes;
mod class_file;
#[macro_use]
pub mod constant_pool;
pub mod cursor;
mod error;
pub mod mutf8;
mod parser;
mod validation;

use std::fmt;

pub use self::class_file::{ClassFile, FieldInfo, MethodInfo};
pub use access_flags::AccessFlags;
pub use constant_pool::ConstantPool;
pub use error::{AccessFlagsViolation, ClassFileError, SuperClassViolation};
pub use parser::Parser;

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;

/// Decodes and format-checks a complete class file.
pub fn decode(bytes: &[u8]) -> Result<ClassFile> {
    ClassFile::parse(bytes)
}

#[derive(Clone, PartialEq)]
pub struct Attribute {
    pub name_index: u16,
    pub info: Vec<u8>,
}
impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name_index", &self.name_index)
            .field("info", &format!("({} bytes)", self.info.len()))
            .finish()
    }
}
