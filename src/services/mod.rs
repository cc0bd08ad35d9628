pub mod catalog;
pub mod pages;
pub mod staging;
pub mod storage;
