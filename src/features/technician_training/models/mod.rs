mod technician_training;

pub use technician_training::TechnicianTraining;
