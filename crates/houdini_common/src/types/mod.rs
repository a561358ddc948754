pub mod entry_point;
pub mod import_kind;
pub mod import_record;
pub mod module_id;
pub mod output_asset;
pub mod raw_idx;
pub mod resolved_id;
pub mod str_or_bytes;
