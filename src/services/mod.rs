pub mod entries;
pub mod media;
pub mod ordering;
pub mod repository;
pub mod s3;
pub mod validation;

#[cfg(test)]
pub mod testing;
