//! Language selection for the edge redirect.
//!
//! Priority is: a language already named in the path, then the `prefLang`
//! cookie, then `Accept-Language`, then English.

pub const SUPPORTED_LANGUAGES: [&str; 6] = ["en", "es", "zh", "ar", "hi", "fr"];
pub const DEFAULT_LANGUAGE: &str = "en";
pub const LANGUAGE_COOKIE: &str = "prefLang";
pub const COOKIE_MAX_AGE_SECS: u64 = 31_536_000;
pub const REDIRECT_CACHE_CONTROL: &str = "public,max-age=0";

const ROOT_PATHS: [&str; 3] = ["", "/", "/index.html"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRedirect {
    pub location: String,
    pub set_cookie: Option<String>,
    pub permanent: bool,
}

impl LanguageRedirect {
    pub fn status(&self) -> &'static str {
        if self.permanent {
            "301"
        } else {
            "302"
        }
    }

    pub fn status_description(&self) -> &'static str {
        if self.permanent {
            "Moved Permanently"
        } else {
            "Found"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageDecision {
    PassThrough,
    Redirect(LanguageRedirect),
}

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

pub fn preference_cookie(code: &str) -> String {
    format!("{LANGUAGE_COOKIE}={code}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; SameSite=Lax")
}

/// Reads the `prefLang` cookie out of a raw `Cookie` header value.
pub fn parse_language_cookie(cookie_header: Option<&str>) -> Option<String> {
    let header = cookie_header?;
    for pair in header.split(';') {
        let (name, value) = pair.trim().split_once('=').unwrap_or((pair.trim(), ""));
        if name == LANGUAGE_COOKIE {
            let code: String = value.chars().take(2).collect::<String>().to_lowercase();
            return is_supported(&code).then_some(code);
        }
    }
    None
}

/// Picks the highest-weighted supported language from `Accept-Language`.
pub fn pick_from_accept_language(accept_language: Option<&str>) -> String {
    let Some(header) = accept_language.filter(|value| !value.is_empty()) else {
        return DEFAULT_LANGUAGE.to_string();
    };

    let mut weighted: Vec<(String, f64)> = header
        .split(',')
        .filter_map(parse_language_range)
        .collect();
    // Stable sort keeps header order for equal weights.
    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    weighted
        .into_iter()
        .map(|(code, _)| code)
        .find(|code| is_supported(code))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

fn parse_language_range(part: &str) -> Option<(String, f64)> {
    let part = part.trim_start();
    let tag_len = part
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '-'))
        .unwrap_or(part.len());
    if tag_len < 2 {
        return None;
    }

    let (tag, params) = part.split_at(tag_len);
    let code: String = tag.chars().take(2).collect::<String>().to_lowercase();

    let quality = match params.strip_prefix(';') {
        Some(rest) => match rest.trim_start().strip_prefix("q=") {
            Some(raw) => {
                let digits_len = raw
                    .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                    .unwrap_or(raw.len());
                if digits_len == 0 {
                    1.0
                } else {
                    raw[..digits_len].parse::<f64>().ok()?
                }
            }
            None => 1.0,
        },
        None => 1.0,
    };

    Some((code, quality))
}

/// Decides whether a viewer request passes through or is redirected.
pub fn decide(
    uri: &str,
    cookie_header: Option<&str>,
    accept_language: Option<&str>,
) -> LanguageDecision {
    let cookie_language = parse_language_cookie(cookie_header);
    let preferred = cookie_language
        .clone()
        .unwrap_or_else(|| pick_from_accept_language(accept_language));

    for code in SUPPORTED_LANGUAGES
        .iter()
        .filter(|code| **code != DEFAULT_LANGUAGE)
    {
        let bare = format!("/{code}");
        if uri == bare {
            return LanguageDecision::Redirect(LanguageRedirect {
                location: format!("{bare}/index.html"),
                set_cookie: None,
                permanent: true,
            });
        }
        if uri.starts_with(&format!("{bare}/")) {
            if cookie_language.as_deref() != Some(*code) {
                return LanguageDecision::Redirect(LanguageRedirect {
                    location: uri.to_string(),
                    set_cookie: Some(preference_cookie(code)),
                    permanent: true,
                });
            }
            return LanguageDecision::PassThrough;
        }
    }

    if ROOT_PATHS.contains(&uri) && preferred != DEFAULT_LANGUAGE {
        return LanguageDecision::Redirect(LanguageRedirect {
            location: format!("/{preferred}/index.html"),
            set_cookie: Some(preference_cookie(&preferred)),
            permanent: false,
        });
    }

    if cookie_language.as_deref() != Some(DEFAULT_LANGUAGE) {
        return LanguageDecision::Redirect(LanguageRedirect {
            location: uri.to_string(),
            set_cookie: Some(preference_cookie(DEFAULT_LANGUAGE)),
            permanent: true,
        });
    }

    LanguageDecision::PassThrough
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect(decision: LanguageDecision) -> LanguageRedirect {
        match decision {
            LanguageDecision::Redirect(value) => value,
            LanguageDecision::PassThrough => panic!("expected redirect"),
        }
    }

    #[test]
    fn cookie_parsing_takes_two_lowercase_letters() {
        assert_eq!(
            parse_language_cookie(Some("a=1; prefLang=ES-mx; b=2")),
            Some("es".to_string())
        );
        assert_eq!(parse_language_cookie(Some("prefLang=de")), None);
        assert_eq!(parse_language_cookie(Some("other=fr")), None);
        assert_eq!(parse_language_cookie(None), None);
    }

    #[test]
    fn accept_language_orders_by_quality() {
        assert_eq!(
            pick_from_accept_language(Some("de-DE,fr;q=0.7,hi;q=0.9")),
            "hi"
        );
        assert_eq!(pick_from_accept_language(Some("zh-CN, en;q=0.5")), "zh");
        assert_eq!(pick_from_accept_language(Some("de, it")), "en");
        assert_eq!(pick_from_accept_language(Some("*")), "en");
        assert_eq!(pick_from_accept_language(None), "en");
    }

    #[test]
    fn accept_language_keeps_header_order_for_ties() {
        assert_eq!(pick_from_accept_language(Some("ar;q=0.8,fr;q=0.8")), "ar");
    }

    #[test]
    fn bare_language_path_is_normalized() {
        let decision = redirect(decide("/es", None, None));
        assert_eq!(decision.location, "/es/index.html");
        assert!(decision.permanent);
        assert_eq!(decision.set_cookie, None);
    }

    #[test]
    fn explicit_path_wins_over_cookie_and_refreshes_it() {
        let decision = redirect(decide("/fr/about.html", Some("prefLang=es"), Some("es")));
        assert_eq!(decision.location, "/fr/about.html");
        assert_eq!(
            decision.set_cookie.as_deref(),
            Some("prefLang=fr; Path=/; Max-Age=31536000; SameSite=Lax")
        );
        assert_eq!(decision.status(), "301");
    }

    #[test]
    fn explicit_path_matching_cookie_passes_through() {
        assert_eq!(
            decide("/fr/about.html", Some("prefLang=fr"), None),
            LanguageDecision::PassThrough
        );
    }

    #[test]
    fn root_uses_cookie_before_header() {
        let decision = redirect(decide("/", Some("prefLang=hi"), Some("zh")));
        assert_eq!(decision.location, "/hi/index.html");
        assert!(!decision.permanent);
        assert_eq!(decision.status_description(), "Found");
    }

    #[test]
    fn root_falls_back_to_header() {
        let decision = redirect(decide("/index.html", None, Some("ar,en;q=0.3")));
        assert_eq!(decision.location, "/ar/index.html");
        assert_eq!(
            decision.set_cookie.as_deref(),
            Some("prefLang=ar; Path=/; Max-Age=31536000; SameSite=Lax")
        );
    }

    #[test]
    fn english_path_without_english_cookie_refreshes_cookie_once() {
        let decision = redirect(decide("/about.html", None, None));
        assert_eq!(decision.location, "/about.html");
        assert!(decision.permanent);
        assert_eq!(
            decision.set_cookie.as_deref(),
            Some("prefLang=en; Path=/; Max-Age=31536000; SameSite=Lax")
        );
    }

    #[test]
    fn english_path_with_english_cookie_passes_through() {
        assert_eq!(
            decide("/", Some("prefLang=en"), Some("fr")),
            LanguageDecision::PassThrough
        );
        assert_eq!(
            decide("/docs/page.html", Some("prefLang=en"), None),
            LanguageDecision::PassThrough
        );
    }

    #[test]
    fn similar_prefix_is_not_a_language_path() {
        let decision = redirect(decide("/esports", Some("prefLang=es"), None));
        assert_eq!(decision.location, "/esports");
        assert_eq!(
            decision.set_cookie.as_deref(),
            Some("prefLang=en; Path=/; Max-Age=31536000; SameSite=Lax")
        );
    }
}
