// Format checking, §4.8. Every rule fails fast with the first violation.

use crate::{
    constant_pool::{ClassInfo, CpInfo, CpTag},
    error::{AccessFlagsViolation, SuperClassViolation},
    mutf8, AccessFlags, ClassFileError, ConstantPool, Result,
};

const OBJECT_CLASS_NAME: &str = "java/lang/Object";

/// Resolves a reference taken directly from the class file structure.
///
/// Such references must lie strictly below `constant_pool_count - 1`.
fn referenced(pool: &ConstantPool, index: u16) -> Option<&CpInfo> {
    if index == 0 || index >= pool.count().saturating_sub(1) {
        return None;
    }
    pool.get(index)
}

fn references(pool: &ConstantPool, index: u16, tag: CpTag) -> bool {
    referenced(pool, index).map(CpInfo::tag) == Some(tag)
}

/// Compares the name of the `Class` entry at `class_index` with `expected`.
///
/// `None` means the name does not resolve to a `Utf8` entry.
fn class_name_is(pool: &ConstantPool, class_index: u16, expected: &str) -> Result<Option<bool>> {
    let Some(CpInfo::Class(ClassInfo { name_index })) = pool.get(class_index) else {
        return Ok(None);
    };
    let Some(CpInfo::Utf8(bytes)) = pool.get(*name_index) else {
        return Ok(None);
    };

    Ok(Some(mutf8::matches(bytes, expected)?))
}

pub(crate) fn check_class_access_flags(flags: AccessFlags) -> Result<()> {
    // If the ACC_INTERFACE flag of this class file is set, its ACC_ABSTRACT flag must also be set,
    // and its ACC_FINAL, ACC_SUPER and ACC_ENUM flags must not be set.
    let violation = if flags.contains(AccessFlags::INTERFACE) {
        if !flags.contains(AccessFlags::ABSTRACT) {
            Some(AccessFlagsViolation::InterfaceNotAbstract)
        } else if flags.intersects(AccessFlags::FINAL | AccessFlags::SUPER | AccessFlags::ENUM) {
            Some(AccessFlagsViolation::InterfaceWithClassFlags)
        } else {
            None
        }
    } else if flags.contains(AccessFlags::ANNOTATION) {
        Some(AccessFlagsViolation::AnnotationNotInterface)
    } else if flags.contains(AccessFlags::FINAL | AccessFlags::ABSTRACT) {
        Some(AccessFlagsViolation::FinalAndAbstract)
    } else {
        None
    };

    match violation {
        Some(violation) => Err(ClassFileError::InvalidAccessFlags(violation)),
        None => Ok(()),
    }
}

pub(crate) fn check_this_class(pool: &ConstantPool, this_class: u16) -> Result<()> {
    if references(pool, this_class, CpTag::Class) {
        Ok(())
    } else {
        Err(ClassFileError::InvalidThisClassIndex(this_class))
    }
}

pub(crate) fn check_super_class(
    pool: &ConstantPool,
    flags: AccessFlags,
    this_class: u16,
    super_class: u16,
) -> Result<()> {
    let is_interface = flags.contains(AccessFlags::INTERFACE);

    if super_class != 0 {
        if !references(pool, super_class, CpTag::Class) {
            return Err(ClassFileError::InvalidSuperClassIndex(super_class));
        }

        // For an interface, the super_class entry must represent the class Object.
        if is_interface {
            match class_name_is(pool, super_class, OBJECT_CLASS_NAME)? {
                Some(true) => {}
                Some(false) => {
                    return Err(ClassFileError::InvalidSuperClass(
                        SuperClassViolation::InterfaceNotExtendingObject,
                    ))
                }
                None => return Err(ClassFileError::InvalidSuperClassIndex(super_class)),
            }
        }

        return Ok(());
    }

    // If the value of the super_class item is zero, then this class file must represent the class
    // Object, the only class or interface without a direct superclass.
    if is_interface {
        return Err(ClassFileError::InvalidSuperClass(
            SuperClassViolation::InterfaceWithoutSuperClass,
        ));
    }
    match class_name_is(pool, this_class, OBJECT_CLASS_NAME)? {
        Some(true) => Ok(()),
        Some(false) => Err(ClassFileError::InvalidSuperClass(
            SuperClassViolation::MissingSuperClass,
        )),
        None => Err(ClassFileError::InvalidThisClassIndex(this_class)),
    }
}

pub(crate) fn check_interface(pool: &ConstantPool, index: u16) -> Result<()> {
    if references(pool, index, CpTag::Class) {
        Ok(())
    } else {
        Err(ClassFileError::InvalidInterfaceIndex(index))
    }
}

pub(crate) fn check_field_access_flags(flags: AccessFlags) -> Result<()> {
    // A field may have at most one of its ACC_PRIVATE, ACC_PROTECTED and ACC_PUBLIC flags set,
    // and must not have both its ACC_FINAL and ACC_VOLATILE flags set.
    if (flags & AccessFlags::VISIBILITY).bits().count_ones() > 1 {
        return Err(ClassFileError::InvalidAccessFlags(
            AccessFlagsViolation::FieldVisibility,
        ));
    }
    if flags.contains(AccessFlags::FINAL | AccessFlags::VOLATILE) {
        return Err(ClassFileError::InvalidAccessFlags(
            AccessFlagsViolation::FieldFinalAndVolatile,
        ));
    }

    Ok(())
}

pub(crate) fn check_field_indices(
    pool: &ConstantPool,
    name_index: u16,
    descriptor_index: u16,
) -> Result<()> {
    if references(pool, name_index, CpTag::Utf8) && references(pool, descriptor_index, CpTag::Utf8)
    {
        Ok(())
    } else {
        Err(ClassFileError::InvalidFieldIndex {
            name_index,
            descriptor_index,
        })
    }
}

pub(crate) fn check_method_indices(
    pool: &ConstantPool,
    name_index: u16,
    descriptor_index: u16,
) -> Result<()> {
    if references(pool, name_index, CpTag::Utf8) && references(pool, descriptor_index, CpTag::Utf8)
    {
        Ok(())
    } else {
        Err(ClassFileError::InvalidMethodIndex {
            name_index,
            descriptor_index,
        })
    }
}

pub(crate) fn check_attribute_name(pool: &ConstantPool, name_index: u16) -> Result<()> {
    if references(pool, name_index, CpTag::Utf8) {
        Ok(())
    } else {
        Err(ClassFileError::InvalidAttributeNameIndex(name_index))
    }
}


#[cfg(test)]
mod field_access_flags_tests {
    use super::*;

    #[test]
    fn it_should_allow_at_most_one_visibility() {
        assert!(check_field_access_flags(AccessFlags::empty()).is_ok());
        assert!(check_field_access_flags(AccessFlags::PRIVATE | AccessFlags::FINAL).is_ok());
        assert!(matches!(
            check_field_access_flags(AccessFlags::PUBLIC | AccessFlags::PRIVATE),
            Err(ClassFileError::InvalidAccessFlags(
                AccessFlagsViolation::FieldVisibility
            ))
        ));
        assert!(check_field_access_flags(AccessFlags::VISIBILITY).is_err());
    }

    #[test]
    fn it_should_reject_final_volatile_fields() {
        assert!(matches!(
            check_field_access_flags(AccessFlags::FINAL | AccessFlags::VOLATILE),
            Err(ClassFileError::InvalidAccessFlags(
                AccessFlagsViolation::FieldFinalAndVolatile
            ))
        ));
    }
}
