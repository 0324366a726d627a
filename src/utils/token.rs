use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Temporary credentials for a freshly provisioned technician account.
pub fn generate_temp_password(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
