mod constant_pool;

use std::collections::HashSet;

use crate::{
    attributes::Attributes,
    class_file::{FieldInfo, MethodInfo},
    cursor::ByteCursor,
    validation,
};

use super::*;

const MAGIC_IDENTIFIER: u32 = 0xCAFEBABE;

/// Single-pass decoder for one class file buffer.
///
/// Format checks run as soon as the items they need have been read, so the
/// error reported is always the first violation in file order.
pub struct Parser<'a> {
    r: ByteCursor<'a>,
}
impl<'a> Parser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            r: ByteCursor::new(buf),
        }
    }

    pub fn parse(&mut self) -> Result<ClassFile> {
        let result = self.parse_class_file();
        if let Err(ref e) = result {
            log::debug!("Rejected class file at byte {}: {}", self.r.position(), e);
        }
        result
    }

    fn parse_class_file(&mut self) -> Result<ClassFile> {
        let magic = self.parse_magic_identifier()?;
        let (major_version, minor_version) = self.parse_version()?;

        let constant_pool = self.parse_constant_pool()?;

        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        validation::check_class_access_flags(access_flags)?;

        let this_class = self.read_u16()?;
        validation::check_this_class(&constant_pool, this_class)?;

        let super_class = self.read_u16()?;
        validation::check_super_class(&constant_pool, access_flags, this_class, super_class)?;

        let interfaces = self.parse_interfaces(&constant_pool)?;
        let fields = self.parse_fields(&constant_pool)?;
        let methods = self.parse_methods(&constant_pool)?;
        let attributes = self.parse_attributes(&constant_pool)?;

        match self.r.remaining() {
            0 => {}
            trailing => return Err(ClassFileError::TrailingData(trailing)),
        }

        log::debug!(
            "Parsed class #{} (version {}.{}): {} constants, {} interfaces, {} fields, {} methods",
            this_class,
            major_version,
            minor_version,
            constant_pool.len(),
            interfaces.len(),
            fields.len(),
            methods.len()
        );

        Ok(ClassFile {
            magic,
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    fn parse_magic_identifier(&mut self) -> Result<u32> {
        match self.read_u32()? {
            MAGIC_IDENTIFIER => Ok(MAGIC_IDENTIFIER),
            magic_identifier => Err(ClassFileError::InvalidMagicNumber(magic_identifier)),
        }
    }

    fn parse_version(&mut self) -> Result<(u16, u16)> {
        let minor = self.read_u16()?;
        let major = self.read_u16()?;
        Ok((major, minor))
    }

    fn parse_interfaces(&mut self, constant_pool: &ConstantPool) -> Result<Vec<u16>> {
        let interfaces_count = self.read_u16()?;
        log::trace!("Parsing {} interfaces", interfaces_count);

        (0..interfaces_count)
            .map(|_| -> Result<u16> {
                let index = self.read_u16()?;
                validation::check_interface(constant_pool, index)?;
                Ok(index)
            })
            .collect()
    }

    fn parse_fields(&mut self, constant_pool: &ConstantPool) -> Result<Vec<FieldInfo>> {
        let fields_count = self.read_u16()?;
        log::trace!("Parsing {} fields", fields_count);

        // No two fields in one class file may have the same name and descriptor (§4.3.2).
        let mut signatures = HashSet::with_capacity(fields_count as usize);
        (0..fields_count)
            .map(|_| self.parse_field_info(constant_pool, &mut signatures))
            .collect()
    }

    fn parse_field_info(
        &mut self,
        constant_pool: &ConstantPool,
        signatures: &mut HashSet<(u16, u16)>,
    ) -> Result<FieldInfo> {
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        validation::check_field_access_flags(access_flags)?;

        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        validation::check_field_indices(constant_pool, name_index, descriptor_index)?;
        if !signatures.insert((name_index, descriptor_index)) {
            return Err(ClassFileError::DuplicateFieldSignature {
                name_index,
                descriptor_index,
            });
        }

        let attributes = self.parse_attributes(constant_pool)?;

        Ok(FieldInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_methods(&mut self, constant_pool: &ConstantPool) -> Result<Vec<MethodInfo>> {
        let methods_count = self.read_u16()?;
        log::trace!("Parsing {} methods", methods_count);

        (0..methods_count)
            .map(|_| self.parse_method_info(constant_pool))
            .collect()
    }

    fn parse_method_info(&mut self, constant_pool: &ConstantPool) -> Result<MethodInfo> {
        let access_flags = AccessFlags::from_bits_truncate(self.read_u16()?);
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        validation::check_method_indices(constant_pool, name_index, descriptor_index)?;

        let attributes = self.parse_attributes(constant_pool)?;

        Ok(MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_attribute(&mut self, constant_pool: &ConstantPool) -> Result<Attribute> {
        let name_index = self.read_u16()?;
        validation::check_attribute_name(constant_pool, name_index)?;

        let attribute_length = self.read_u32()?;
        let info = self.r.take(attribute_length as usize)?.to_vec();

        Ok(Attribute { name_index, info })
    }

    fn parse_attributes(&mut self, constant_pool: &ConstantPool) -> Result<Attributes> {
        let attributes_count = self.read_u16()?;

        (0..attributes_count)
            .map(|_| self.parse_attribute(constant_pool))
            .collect::<Result<Vec<_>>>()
            .map(Attributes)
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(self.r.read_u32()?)
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(self.r.read_u16()?)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.r.read_u8()?)
    }
}
