use std::path::PathBuf;

use tracing::{debug, warn};

/// Loads a local `.env` into the process environment, if there is one.
///
/// Variables that are already set keep their value. Returns the file that was
/// read; a missing file is not an error, and an unreadable one is only logged.
pub fn load_dotenv_if_present() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!("ignoring local `.env`: {e}");
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        // cargo runs tests from the crate root, which carries no `.env`
        assert_eq!(load_dotenv_if_present(), None);
    }
}
