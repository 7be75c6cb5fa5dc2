//! Click-to-chat link builder for wa.me

use crate::domain::documents::{BrDocsError, BrDocsResult};
use crate::domain::regions::Country;
use url::{form_urlencoded, Url};

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Escapes that `encodeURIComponent` leaves as literal characters
const URI_COMPONENT_MARKS: &[(&str, &str)] =
    &[("%21", "!"), ("%28", "("), ("%29", ")"), ("%7E", "~")];

/// Percent-encode a query value the way browsers' `encodeURIComponent` does
///
/// Space becomes `%20`, not `+`. An apostrophe stays `%27`, since `Url` escapes
/// it in `https` queries anyway. Every `%` in the form-encoded output starts an
/// escape, so restoring the marks cannot split one.
pub fn encode_component(text: &str) -> String {
    let mut encoded = form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    for (escape, mark) in URI_COMPONENT_MARKS {
        encoded = encoded.replace(escape, mark);
    }
    encoded
}

/// Normalize a phone number to digits with the country's dial code in front
///
/// Numbers that already start with the dial code are left alone.
pub fn normalize_phone(country: &Country, phone: &str) -> BrDocsResult<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(BrDocsError::invalid_format(format!(
            "phone number '{phone}' contains no digits"
        )));
    }

    if digits.starts_with(country.dial_code) {
        Ok(digits)
    } else {
        Ok(format!("{}{}", country.dial_code, digits))
    }
}

/// Build a wa.me link, with the trimmed message as the percent-encoded `text` query value
pub fn build_link(country: &Country, phone: &str, message: Option<&str>) -> BrDocsResult<Url> {
    let number = normalize_phone(country, phone)?;

    let mut link = Url::parse(WHATSAPP_BASE)
        .and_then(|base| base.join(&number))
        .map_err(|e| BrDocsError::invalid_format(format!("cannot build link: {e}")))?;

    if let Some(text) = message.map(str::trim).filter(|t| !t.is_empty()) {
        link.set_query(Some(&format!("text={}", encode_component(text))));
    }

    tracing::debug!("Built WhatsApp link for country '{}'", country.code);
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn brazil() -> &'static Country {
        Country::lookup("br").unwrap()
    }

    #[test]
    fn test_link_with_message() {
        let link = build_link(brazil(), "(11) 98765-4321", Some("Olá mundo")).unwrap();
        assert_eq!(link.as_str(), "https://wa.me/5511987654321?text=Ol%C3%A1%20mundo");
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn test_link_without_message(#[case] message: Option<&str>) {
        let link = build_link(brazil(), "11 98765 4321", message).unwrap();
        assert_eq!(link.as_str(), "https://wa.me/5511987654321");
    }

    #[test]
    fn test_dial_code_not_duplicated() {
        let link = build_link(brazil(), "+55 11 98765-4321", None).unwrap();
        assert_eq!(link.as_str(), "https://wa.me/5511987654321");
    }

    #[test]
    fn test_other_country() {
        let uruguay = Country::lookup("uy").unwrap();
        assert_eq!(normalize_phone(uruguay, "94 123 456").unwrap(), "59894123456");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("(--)")]
    fn test_empty_number_is_invalid_format(#[case] phone: &str) {
        let err = build_link(brazil(), phone, Some("hi")).unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_message_special_characters_are_encoded() {
        let link = build_link(brazil(), "11987654321", Some("a&b=c?")).unwrap();
        assert_eq!(link.query(), Some("text=a%26b%3Dc%3F"));
    }

    #[rstest]
    #[case("Olá mundo", "Ol%C3%A1%20mundo")]
    #[case("hi!(*)~", "hi!(*)~")]
    #[case("1+1 = 2", "1%2B1%20%3D%202")]
    #[case("50%21", "50%2521")]
    #[case("it's", "it%27s")]
    fn test_encode_component_matches_browser(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(encode_component(text), expected);
    }

    #[test]
    fn test_link_keeps_unreserved_marks() {
        let link = build_link(brazil(), "11987654321", Some("Oi! (teste) *agora*")).unwrap();
        assert_eq!(link.query(), Some("text=Oi!%20(teste)%20*agora*"));
    }
}
