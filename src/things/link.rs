use super::json::ThingsItem;
use std::io;
use std::process::Command;
use tracing::{debug, info};
use url::form_urlencoded;

/// Prefix of the Things JSON import command
pub const JSON_URL_PREFIX: &str = "things:///json?data=";

/// Build the `things:///json?data=...` URL importing `items`
///
/// The JSON is written compactly and percent-encoded, with spaces as `%20`.
pub fn build_url(items: &[ThingsItem]) -> serde_json::Result<String> {
    let json = serde_json::to_string(items)?;
    debug!(bytes = json.len(), "Serialized Things JSON");
    Ok(format!("{}{}", JSON_URL_PREFIX, percent_encode(&json)))
}

/// Percent-encode for a URL query value
///
/// `form_urlencoded` writes spaces as `+` and escapes a literal `+` as `%2B`,
/// so swapping every remaining `+` for `%20` is lossless.
fn percent_encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Hand `url` to the platform's URL opener
pub fn open_url(url: &str) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };

    info!("Opening Things import URL");
    let status = command.arg(url).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("URL opener exited with {}", status)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::things::json::TitleAttributes;

    #[test]
    fn test_percent_encode_spaces_and_plus() {
        assert_eq!(percent_encode("a b+c"), "a%20b%2Bc");
        assert_eq!(percent_encode("{\"x\":1}"), "%7B%22x%22%3A1%7D");
    }

    #[test]
    fn test_build_url() {
        let items = vec![ThingsItem::Heading(TitleAttributes {
            title: "Before leaving".to_string(),
        })];
        let url = build_url(&items).unwrap();
        assert_eq!(
            url,
            "things:///json?data=%5B%7B%22type%22%3A%22heading%22%2C%22attributes%22%3A%7B%22title%22%3A%22Before%20leaving%22%7D%7D%5D"
        );
    }

    #[test]
    fn test_empty_import() {
        assert_eq!(build_url(&[]).unwrap(), "things:///json?data=%5B%5D");
    }
}
