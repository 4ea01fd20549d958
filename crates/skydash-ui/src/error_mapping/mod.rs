//! Maps UI service errors to skydash_core::AppError for consistent user-facing messages.

mod weather;
