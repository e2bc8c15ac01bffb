pub mod dyn_fn;
pub mod dyn_result;
