pub mod memory;
pub mod object_store;
pub mod s3;
