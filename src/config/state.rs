// Application state module
// Immutable per-process state shared by every request

use std::path::{Path, PathBuf};

use super::types::Config;
use crate::http::mime;

/// Application state
pub struct AppState {
    pub config: Config,

    /// Media file served on `config.stream.route`
    pub media_path: PathBuf,

    /// Content-Type resolved once at startup
    pub content_type: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let media_path = PathBuf::from(&config.stream.file);
        let content_type = config
            .stream
            .content_type
            .clone()
            .unwrap_or_else(|| detect_content_type(&media_path).to_string());

        Self {
            config: config.clone(),
            media_path,
            content_type,
        }
    }
}

fn detect_content_type(path: &Path) -> &'static str {
    mime::get_content_type(path.extension().and_then(|e| e.to_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        let cfg = Config::load_from("tests/no-such-config-file").expect("defaults load");
        let state = AppState::new(&cfg);
        assert_eq!(state.content_type, "video/x-flv");
        assert_eq!(state.media_path, PathBuf::from("./flv/202512241446_aac.flv"));
    }

    #[test]
    fn test_content_type_override() {
        let mut cfg = Config::load_from("tests/no-such-config-file").expect("defaults load");
        cfg.stream.content_type = Some("video/mp2t".to_string());
        assert_eq!(AppState::new(&cfg).content_type, "video/mp2t");
    }
}
