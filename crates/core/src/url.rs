use crate::config::SourceConfig;

/// Build the public raw-content URL for a file in the configured branch.
///
/// `{raw_base}/{owner}/{repo}/{branch}/{path}` with every path segment
/// percent-encoded; no network round trip is needed to resolve it.
pub fn raw_image_url(source: &SourceConfig, rel_path: &str) -> String {
    let encoded: Vec<String> = rel_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!(
        "{}/{}/{}/{}/{}",
        source.raw_base_url.trim_end_matches('/'),
        source.repo.owner,
        source.repo.repo,
        source.repo.branch,
        encoded.join("/")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoRef;

    fn source() -> SourceConfig {
        SourceConfig::new(RepoRef::new("studio", "gallery", "main"))
    }

    #[test]
    fn test_github_raw_url() {
        let url = raw_image_url(&source(), "pics/trip/beach.jpg");
        assert_eq!(
            url,
            "https://raw.githubusercontent.com/studio/gallery/main/pics/trip/beach.jpg"
        );
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let url = raw_image_url(&source(), "pics/summer trip/a#1.png");
        assert_eq!(
            url,
            "https://raw.githubusercontent.com/studio/gallery/main/pics/summer%20trip/a%231.png"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let cfg = source().with_raw_base_url("http://127.0.0.1:9000/raw/");
        assert_eq!(
            raw_image_url(&cfg, "pics/a.jpg"),
            "http://127.0.0.1:9000/raw/studio/gallery/main/pics/a.jpg"
        );
    }
}
