//! Maps UI service errors to chuva_core::AppError for consistent user-facing messages.

mod weather;
