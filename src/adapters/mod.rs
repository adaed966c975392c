mod ocrs_service;

pub use ocrs_service::OcrsService;
