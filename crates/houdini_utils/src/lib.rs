pub mod concat_string;
pub mod ecmascript;
pub mod path_ext;
pub mod pretty_type_name;
pub mod rayon;
pub mod sanitize_file_name;
pub mod xxhash;
