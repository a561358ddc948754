pub mod hook_load_args;
pub mod hook_load_output;
pub mod hook_resolve_id_args;
