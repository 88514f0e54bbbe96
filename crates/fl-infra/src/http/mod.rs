pub mod upload_client;

pub use upload_client::HttpUploadEndpoint;
