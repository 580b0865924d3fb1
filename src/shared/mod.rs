pub mod constants;
pub mod download;
pub mod search;
#[cfg(test)]
pub mod test_helpers;
pub mod types;
pub mod upload;
pub mod validation;
