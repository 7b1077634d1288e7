#![allow(dead_code)]

//! Assembles synthetic class files byte by byte.

use classcheck_class_file::AccessFlags;

pub struct Member {
    access_flags: u16,
    name_index: u16,
    descriptor_index: u16,
    attributes: Vec<(u16, Vec<u8>)>,
}

pub struct ClassBuilder {
    magic: u32,
    pool: Vec<u8>,
    next_index: u16,
    padded: bool,
    access_flags: u16,
    this_class: u16,
    super_class: u16,
    interfaces: Vec<u16>,
    fields: Vec<Member>,
    methods: Vec<Member>,
    attributes: Vec<(u16, Vec<u8>)>,
    trailing: Vec<u8>,
}

impl ClassBuilder {
    pub fn new() -> Self {
        Self {
            magic: 0xCAFEBABE,
            pool: Vec::new(),
            next_index: 1,
            padded: true,
            access_flags: (AccessFlags::PUBLIC | AccessFlags::SUPER).bits(),
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// References into the pool must stay below `constant_pool_count - 1`,
    /// so by default one unreferenced entry is appended to the pool.
    pub fn without_padding(&mut self) -> &mut Self {
        self.padded = false;
        self
    }

    fn push_entry(&mut self, bytes: &[u8], slots: u16) -> u16 {
        let index = self.next_index;
        self.pool.extend_from_slice(bytes);
        self.next_index += slots;
        index
    }

    pub fn raw_utf8(&mut self, bytes: &[u8]) -> u16 {
        let mut entry = vec![1];
        entry.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
        entry.extend_from_slice(bytes);
        self.push_entry(&entry, 1)
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        assert!(s.is_ascii());
        self.raw_utf8(s.as_bytes())
    }

    /// Adds a `Class` entry immediately followed by its name.
    pub fn class(&mut self, name: &str) -> u16 {
        let index = self.class_ref(self.next_index + 1);
        self.utf8(name);
        index
    }

    pub fn class_ref(&mut self, name_index: u16) -> u16 {
        let mut entry = vec![7];
        entry.extend_from_slice(&name_index.to_be_bytes());
        self.push_entry(&entry, 1)
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        let mut entry = vec![3];
        entry.extend_from_slice(&value.to_be_bytes());
        self.push_entry(&entry, 1)
    }

    pub fn long(&mut self, value: i64) -> u16 {
        let mut entry = vec![5];
        entry.extend_from_slice(&value.to_be_bytes());
        self.push_entry(&entry, 2)
    }

    pub fn magic(&mut self, magic: u32) -> &mut Self {
        self.magic = magic;
        self
    }

    pub fn access_flags(&mut self, flags: AccessFlags) -> &mut Self {
        self.access_flags = flags.bits();
        self
    }

    pub fn this_class(&mut self, index: u16) -> &mut Self {
        self.this_class = index;
        self
    }

    pub fn super_class(&mut self, index: u16) -> &mut Self {
        self.super_class = index;
        self
    }

    pub fn interface(&mut self, index: u16) -> &mut Self {
        self.interfaces.push(index);
        self
    }

    pub fn field(&mut self, flags: AccessFlags, name_index: u16, descriptor_index: u16) -> &mut Self {
        self.field_with_attributes(flags, name_index, descriptor_index, vec![])
    }

    pub fn field_with_attributes(
        &mut self,
        flags: AccessFlags,
        name_index: u16,
        descriptor_index: u16,
        attributes: Vec<(u16, Vec<u8>)>,
    ) -> &mut Self {
        self.fields.push(Member {
            access_flags: flags.bits(),
            name_index,
            descriptor_index,
            attributes,
        });
        self
    }

    pub fn method(
        &mut self,
        flags: AccessFlags,
        name_index: u16,
        descriptor_index: u16,
        attributes: Vec<(u16, Vec<u8>)>,
    ) -> &mut Self {
        self.methods.push(Member {
            access_flags: flags.bits(),
            name_index,
            descriptor_index,
            attributes,
        });
        self
    }

    pub fn attribute(&mut self, name_index: u16, info: Vec<u8>) -> &mut Self {
        self.attributes.push((name_index, info));
        self
    }

    pub fn trailing(&mut self, bytes: &[u8]) -> &mut Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = self.pool.clone();
        let mut count = self.next_index;
        if self.padded {
            pool.extend_from_slice(&[1, 0, 7]);
            pool.extend_from_slice(b"Padding");
            count += 1;
        }

        let mut out = Vec::new();
        out.extend_from_slice(&self.magic.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&52u16.to_be_bytes());
        out.extend_from_slice(&count.to_be_bytes());
        out.extend_from_slice(&pool);
        out.extend_from_slice(&self.access_flags.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());

        out.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for index in &self.interfaces {
            out.extend_from_slice(&index.to_be_bytes());
        }

        for members in [&self.fields, &self.methods] {
            out.extend_from_slice(&(members.len() as u16).to_be_bytes());
            for member in members {
                out.extend_from_slice(&member.access_flags.to_be_bytes());
                out.extend_from_slice(&member.name_index.to_be_bytes());
                out.extend_from_slice(&member.descriptor_index.to_be_bytes());
                write_attributes(&mut out, &member.attributes);
            }
        }

        write_attributes(&mut out, &self.attributes);
        out.extend_from_slice(&self.trailing);
        out
    }
}

fn write_attributes(out: &mut Vec<u8>, attributes: &[(u16, Vec<u8>)]) {
    out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for (name_index, info) in attributes {
        out.extend_from_slice(&name_index.to_be_bytes());
        out.extend_from_slice(&(info.len() as u32).to_be_bytes());
        out.extend_from_slice(info);
    }
}

/// A class resembling what javac emits for:
///
/// ```java
/// package my;
/// public class MyClass implements Runnable {
///     private final int myField = 1;
///     public MyClass() {}
///     public float add(int x) { ... }
///     public void run() {}
/// }
/// ```
pub fn my_class() -> Vec<u8> {
    let mut b = ClassBuilder::new();
    let this_class = b.class("my/MyClass");
    let object = b.class("java/lang/Object");
    let runnable = b.class("java/lang/Runnable");
    let my_field = b.utf8("myField");
    let int = b.utf8("I");
    let constant_value = b.utf8("ConstantValue");
    let one = b.integer(1);
    let init = b.utf8("<init>");
    let void = b.utf8("()V");
    let add = b.utf8("add");
    let add_descriptor = b.utf8("(I)F");
    let run = b.utf8("run");
    let code = b.utf8("Code");
    let source_file = b.utf8("SourceFile");
    let source = b.utf8("MyClass.java");

    b.this_class(this_class)
        .super_class(object)
        .interface(runnable)
        .field_with_attributes(
            AccessFlags::PRIVATE | AccessFlags::FINAL,
            my_field,
            int,
            vec![(constant_value, one.to_be_bytes().to_vec())],
        )
        .method(
            AccessFlags::PUBLIC,
            init,
            void,
            vec![(
                code,
                vec![0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0xb1, 0x00, 0x00, 0x00, 0x00],
            )],
        )
        .method(
            AccessFlags::PUBLIC,
            add,
            add_descriptor,
            vec![(
                code,
                vec![
                    0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x03, 0x1b, 0x86, 0xae, 0x00, 0x00,
                    0x00, 0x00,
                ],
            )],
        )
        .method(AccessFlags::PUBLIC, run, void, vec![])
        .attribute(source_file, source.to_be_bytes().to_vec());

    b.build()
}
