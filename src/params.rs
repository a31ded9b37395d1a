//! Launch parameters
//!
//! The form can be opened on a given step, in a given language, or with the
//! debug overlay, either from a query string (`?step=3&debug=true&lang=es`)
//! or from the equivalent flags. Flags win over the query string.

use tracing::debug;

use crate::steps::Step;

/// Parsed launch parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    /// Step to open on. Values outside the step range are dropped.
    pub step: Option<Step>,
    pub debug: bool,
    /// Raw language code, resolved later by language detection
    pub lang: Option<String>,
}

impl LaunchParams {
    /// Parse a query string, with or without the leading `?`
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.trim().trim_start_matches('?');

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_component(key);
            let value = decode_component(value);

            match key.as_str() {
                "step" => params.step = parse_step(&value),
                "debug" => params.debug = value == "true",
                "lang" => params.lang = Some(value).filter(|v| !v.is_empty()),
                other => debug!("Ignoring unknown launch parameter '{}'", other),
            }
        }
        params
    }

    /// Overlay explicit flags onto parameters parsed from a query string
    pub fn merge(mut self, step: Option<u8>, debug: bool, lang: Option<&str>) -> Self {
        if let Some(number) = step {
            match Step::from_number(number) {
                Some(step) => self.step = Some(step),
                None => debug!("Ignoring out-of-range step {}", number),
            }
        }
        self.debug |= debug;
        if let Some(lang) = lang {
            self.lang = Some(lang.to_string());
        }
        self
    }
}

/// Leading-integer step number within range
fn parse_step(value: &str) -> Option<Step> {
    let step = crate::rules::parse_leading_int(value)
        .and_then(|n| u8::try_from(n).ok())
        .and_then(Step::from_number);
    if step.is_none() {
        debug!("Ignoring step parameter '{}'", value);
    }
    step
}

/// Percent-decode a query component, treating `+` as a space
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_query() {
        let params = LaunchParams::from_query("?step=3&debug=true&lang=es");
        assert_eq!(params.step, Some(Step::AboutYou));
        assert!(params.debug);
        assert_eq!(params.lang.as_deref(), Some("es"));
    }

    #[test]
    fn test_out_of_range_step_is_ignored() {
        assert_eq!(LaunchParams::from_query("step=0").step, None);
        assert_eq!(LaunchParams::from_query("step=6").step, None);
        assert_eq!(LaunchParams::from_query("step=-1").step, None);
        assert_eq!(LaunchParams::from_query("step=abc").step, None);
        assert_eq!(LaunchParams::from_query("step=2nd").step, Some(Step::ContactDetails));
    }

    #[test]
    fn test_debug_must_be_literal_true() {
        assert!(!LaunchParams::from_query("debug=1").debug);
        assert!(!LaunchParams::from_query("debug").debug);
        assert!(!LaunchParams::from_query("").debug);
    }

    #[test]
    fn test_decoding() {
        assert_eq!(decode_component("a+b%20c"), "a b c");
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
        assert_eq!(LaunchParams::from_query("lang=%65s").lang.as_deref(), Some("es"));
    }

    #[test]
    fn test_flags_override_query() {
        let params = LaunchParams::from_query("step=2&lang=fr").merge(Some(4), false, Some("es"));
        assert_eq!(params.step, Some(Step::Consent));
        assert_eq!(params.lang.as_deref(), Some("es"));

        let params = LaunchParams::from_query("step=2").merge(Some(9), true, None);
        assert_eq!(params.step, Some(Step::ContactDetails));
        assert!(params.debug);
    }
}
