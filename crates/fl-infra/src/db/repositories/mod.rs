mod upload_queue_repo;

pub use upload_queue_repo::DieselUploadQueueRepository;
