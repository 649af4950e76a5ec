use std::path::PathBuf;

/// Result of looking for a `.env` file in the working directory or its parents
#[derive(Debug)]
pub enum EnvFileStatus {
    Loaded(PathBuf),
    Missing,
    /// The file exists but could not be read or parsed
    Invalid(dotenvy::Error),
}

/// Load `.env` into the process environment, without overriding set variables
pub fn load_env_file() -> EnvFileStatus {
    classify(dotenvy::dotenv())
}

fn classify(result: Result<PathBuf, dotenvy::Error>) -> EnvFileStatus {
    match result {
        Ok(path) => EnvFileStatus::Loaded(path),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            EnvFileStatus::Missing
        }
        Err(e) => EnvFileStatus::Invalid(e),
    }
}
