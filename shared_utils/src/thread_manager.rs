//! Worker allocation for concurrent engine runs
//!
//! Each worker drives one external encoder process, and encoders are
//! multi-threaded themselves, so the pool is capped at the core count
//! unless the user explicitly asks for more.

/// Logical CPU cores, never below 1.
pub fn available_cores() -> usize {
    num_cpus::get().max(1)
}

/// Number of pool workers for `job_count` jobs.
///
/// An explicit `requested` value wins (0 is treated as 1). Otherwise one
/// worker per job, capped at the core count.
pub fn concurrent_worker_count(job_count: usize, requested: Option<usize>) -> usize {
    match requested {
        Some(n) => n.max(1),
        None => job_count.clamp(1, available_cores()),
    }
}
