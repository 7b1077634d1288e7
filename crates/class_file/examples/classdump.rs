use std::{env, fs::File, process};

use classcheck_class_file::ClassFile;
use memmap::Mmap;

fn main() {
    pretty_env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: classdump <path/to/Class.class>");
        process::exit(2);
    };
    let file = File::open(&path).unwrap();
    let mmap = unsafe { Mmap::map(&file).unwrap() };

    let class_file = match ClassFile::parse(&mmap) {
        Ok(class_file) => class_file,
        Err(e) => {
            log::error!("{}: {}", path, e);
            process::exit(1);
        }
    };

    println!("Class:      {}", class_file.class_name().unwrap());
    println!(
        "Version:    {}.{}",
        class_file.major_version, class_file.minor_version
    );
    println!("Flags:      {:?}", class_file.access_flags);
    if let Some(super_class) = class_file.super_class().unwrap() {
        println!("Super:      {}", super_class);
    }
    for interface in class_file.interface_names().unwrap() {
        println!("Implements: {}", interface);
    }
    println!("Constants:  {}", class_file.constant_pool.len());

    println!();
    for field in &class_file.fields {
        println!(
            "    {} {}",
            class_file.field_descriptor(field).unwrap(),
            class_file.field_name(field).unwrap()
        );
    }
    for method in &class_file.methods {
        println!(
            "    {}{}",
            class_file.method_name(method).unwrap(),
            class_file.method_descriptor(method).unwrap()
        );
    }
}
