pub mod load_source;
pub mod normalize_options;
pub mod parse_to_ecma_ast;
pub mod resolve_id;
