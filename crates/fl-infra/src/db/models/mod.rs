mod upload_row;

pub use upload_row::{NewUploadRow, UploadRow};
