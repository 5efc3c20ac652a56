use crate::client::encode_component;

/// URL of an uploaded image. Without a configured API host the path is
/// returned same-origin (`/images/<file>`).
#[must_use]
pub fn media_url(api_host: Option<&str>, filename: &str) -> String {
    let host = api_host.map_or("", |h| h.trim_end_matches('/'));
    format!("{host}/images/{}", encode_component(filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_url_with_host() {
        assert_eq!(
            media_url(Some("https://media.example.com/"), "abc.jpg"),
            "https://media.example.com/images/abc.jpg"
        );
    }

    #[test]
    fn media_url_without_host_is_relative() {
        assert_eq!(
            media_url(None, "found_report_1.png"),
            "/images/found_report_1.png"
        );
    }
}
