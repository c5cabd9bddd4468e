/// Builds public URLs for finished caption files.
///
/// URLs only depend on the provider name and the output filename.
#[derive(Debug, Clone, Default)]
pub struct OutputUrlBuilder {
    base_url: String,
}

impl OutputUrlBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `{base_url}/{provider}/{filename}`
    pub fn resolve(&self, provider: &str, filename: &str) -> String {
        format!("{}/{}/{}", self.base_url, provider, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_provider_and_filename() {
        let urls = OutputUrlBuilder::new("somepath");
        assert_eq!(urls.resolve("3play", "abc.vtt"), "somepath/3play/abc.vtt");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let urls = OutputUrlBuilder::new("https://cdn.example.com/captions/");
        assert_eq!(
            urls.resolve("3play", "abc.srt"),
            "https://cdn.example.com/captions/3play/abc.srt"
        );
    }
}
