// Application layer - Use cases over the loaded dataset
pub mod comparison_service;
pub mod dataset_service;
pub mod error;
pub mod fact_sheet_service;
pub mod measurement_repository;
