pub mod directory_service;
pub mod image_catalog;
pub mod server_repo;
