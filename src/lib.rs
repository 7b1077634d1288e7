pub use classcheck_class_file::*;
