pub mod upload_mapper;

pub use upload_mapper::UploadRowMapper;
