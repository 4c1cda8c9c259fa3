use rand::{distributions::Alphanumeric, Rng};

pub const BUILD_ID_LENGTH: usize = 16;

/// Random token stamping one release run.
pub fn generate_build_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BUILD_ID_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_id_is_alphanumeric() {
        let id = generate_build_id();
        assert_eq!(id.len(), BUILD_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, generate_build_id());
    }
}
