/// View layer: keeps markers and stats in step with the filtered subset.
pub mod cluster;
pub mod sync;
