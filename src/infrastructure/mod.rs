pub mod media;
pub mod queue;
pub mod storage;
