use std::convert::TryFrom;

use crate::constant_pool::{
    ClassInfo, CpInfo, CpTag, DoubleInfo, FloatInfo, IntegerInfo, InvokeDynamicInfo, LongInfo,
    MethodHandleInfo, MethodTypeInfo, NameAndTypeInfo, RefInfo,
};

use super::{ClassFileError, ConstantPool, Parser, Result};

impl<'a> Parser<'a> {
    /// Reads `constant_pool_count` and the `count - 1` slots that follow it.
    ///
    /// `Long` and `Double` entries take two slots; the second one is filled
    /// with `CpInfo::Unusable` so that pool indices stay aligned.
    pub(super) fn parse_constant_pool(&mut self) -> Result<ConstantPool> {
        let constant_pool_count = self.read_u16()?;
        log::trace!("Parsing constant pool with count {}", constant_pool_count);

        let mut res = Vec::with_capacity(constant_pool_count.saturating_sub(1) as usize);
        let mut index = 1u16;
        while index < constant_pool_count {
            let cp_info = self.parse_cp_info(index)?;
            let tag = cp_info.tag();
            log::trace!("#{} = {:?}", index, tag);

            res.push(cp_info);
            if tag.slot_size() == 2 {
                res.push(CpInfo::Unusable(tag));
            }

            index = index.saturating_add(tag.slot_size());
        }

        Ok(ConstantPool::new(constant_pool_count, res))
    }

    fn parse_cp_info(&mut self, index: u16) -> Result<CpInfo> {
        let tag = self.read_u8()?;
        let tag = CpTag::try_from(tag)
            .map_err(|tag| ClassFileError::UnknownConstantPoolTag { index, tag })?;

        Ok(match tag {
            CpTag::Utf8 => self.parse_utf8(index)?,
            CpTag::Integer => CpInfo::Integer(IntegerInfo {
                bytes: self.read_u32()?,
            }),
            CpTag::Float => CpInfo::Float(FloatInfo {
                bytes: self.read_u32()?,
            }),
            CpTag::Long => {
                let (high_bytes, low_bytes) = self.parse_eight_bytes()?;
                CpInfo::Long(LongInfo {
                    high_bytes,
                    low_bytes,
                })
            }
            CpTag::Double => {
                let (high_bytes, low_bytes) = self.parse_eight_bytes()?;
                CpInfo::Double(DoubleInfo {
                    high_bytes,
                    low_bytes,
                })
            }
            CpTag::Class => CpInfo::Class(ClassInfo {
                name_index: self.read_u16()?,
            }),
            CpTag::String => CpInfo::String {
                string_index: self.read_u16()?,
            },
            CpTag::FieldRef => CpInfo::FieldRef(self.parse_ref_info()?),
            CpTag::MethodRef => CpInfo::MethodRef(self.parse_ref_info()?),
            CpTag::InterfaceMethodRef => CpInfo::InterfaceMethodRef(self.parse_ref_info()?),
            CpTag::NameAndType => self.parse_name_and_type_info()?,
            CpTag::MethodHandle => self.parse_method_handle()?,
            CpTag::MethodType => CpInfo::MethodType(MethodTypeInfo {
                descriptor_index: self.read_u16()?,
            }),
            CpTag::InvokeDynamic => self.parse_invoke_dynamic_info()?,
        })
    }

    fn parse_utf8(&mut self, index: u16) -> Result<CpInfo> {
        let length = self.read_u16()?;
        let bytes = self.r.take(length as usize)?;

        // No byte may have the value (byte)0 or lie in the range (byte)0xf0 - (byte)0xff (§4.4.7).
        if let Some(&byte) = bytes.iter().find(|&&b| b == 0 || b >= 0xf0) {
            return Err(ClassFileError::InvalidConstantPoolEntry { index, byte });
        }

        Ok(CpInfo::Utf8(bytes.to_vec()))
    }

    fn parse_eight_bytes(&mut self) -> Result<(u32, u32)> {
        let high_bytes = self.read_u32()?;
        let low_bytes = self.read_u32()?;

        Ok((high_bytes, low_bytes))
    }

    fn parse_name_and_type_info(&mut self) -> Result<CpInfo> {
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;

        Ok(CpInfo::NameAndType(NameAndTypeInfo {
            name_index,
            descriptor_index,
        }))
    }

    fn parse_method_handle(&mut self) -> Result<CpInfo> {
        let reference_kind = self.read_u8()?;
        let reference_index = self.read_u16()?;

        Ok(CpInfo::MethodHandle(MethodHandleInfo {
            reference_kind,
            reference_index,
        }))
    }

    fn parse_invoke_dynamic_info(&mut self) -> Result<CpInfo> {
        let bootstrap_method_attr_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(CpInfo::InvokeDynamic(InvokeDynamicInfo {
            bootstrap_method_attr_index,
            name_and_type_index,
        }))
    }

    fn parse_ref_info(&mut self) -> Result<RefInfo> {
        let class_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(RefInfo {
            class_index,
            name_and_type_index,
        })
    }
}
