pub mod repository;
pub mod tokener;
