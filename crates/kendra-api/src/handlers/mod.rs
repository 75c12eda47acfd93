pub mod cloud_services;
pub mod local_files;
