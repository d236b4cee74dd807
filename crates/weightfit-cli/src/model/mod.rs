pub mod fitted_model;
