use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub type ErrorData = BTreeMap<String, String>;
pub type ErrorMap = &'static [(&'static str, &'static str)];

/// Coded error produced by an [`ErrorFactory`].
///
/// `message` is already human readable (`"<Service>: <text> (<service>/<code>)."`) and is
/// the only part ever shown to an end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseError {
    pub code: String,
    pub message: String,
    pub service: String,
    pub custom_data: ErrorData,
}

impl FirebaseError {
    /// Returns the code without the `<service>/` prefix.
    pub fn short_code(&self) -> &str {
        self.code
            .split_once('/')
            .map(|(_, code)| code)
            .unwrap_or(&self.code)
    }
}

impl fmt::Display for FirebaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FirebaseError {}

pub struct ErrorFactory {
    service: &'static str,
    service_name: &'static str,
    errors: HashMap<&'static str, &'static str>,
}

impl ErrorFactory {
    pub fn new(service: &'static str, service_name: &'static str, errors: ErrorMap) -> Self {
        Self {
            service,
            service_name,
            errors: errors.iter().copied().collect(),
        }
    }

    pub fn create(&self, code: &str) -> FirebaseError {
        self.build_error(code, ErrorData::new())
    }

    pub fn create_with_data<I, K, V>(&self, code: &str, data: I) -> FirebaseError
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let custom_data = data
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.build_error(code, custom_data)
    }

    fn build_error(&self, code: &str, custom_data: ErrorData) -> FirebaseError {
        let template = self.errors.get(code).copied().unwrap_or("Error");
        let message = replace_template(template, &custom_data);
        let full_code = format!("{}/{}", self.service, code);
        let full_message = format!("{}: {} ({}).", self.service_name, message, full_code);

        FirebaseError {
            code: full_code,
            message: full_message,
            service: self.service.to_string(),
            custom_data,
        }
    }
}

fn replace_template(template: &str, data: &ErrorData) -> String {
    let mut result = String::with_capacity(template.len());
    let mut remainder = template;

    while let Some(start) = remainder.find("{$") {
        let (head, tail) = remainder.split_at(start);
        result.push_str(head);
        match tail.find('}') {
            Some(end) => {
                let key = &tail[2..end];
                match data.get(key) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&format!("<{key}?>")),
                }
                remainder = &tail[end + 1..];
            }
            None => {
                result.push_str(tail);
                remainder = "";
            }
        }
    }

    result.push_str(remainder);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERRORS: ErrorMap = &[
        ("missing", "Missing field: {$field}"),
        ("unknown", "Unknown error"),
    ];

    #[test]
    fn create_prefixes_service_and_code() {
        let factory = ErrorFactory::new("auth", "Firebase", ERRORS);
        let error = factory.create("unknown");
        assert_eq!(error.code, "auth/unknown");
        assert_eq!(error.short_code(), "unknown");
        assert_eq!(error.message, "Firebase: Unknown error (auth/unknown).");
    }

    #[test]
    fn placeholders_are_filled_or_flagged() {
        let factory = ErrorFactory::new("auth", "Firebase", ERRORS);
        let filled = factory.create_with_data("missing", [("field", "email")]);
        assert!(filled.message.contains("Missing field: email"));

        let flagged = factory.create("missing");
        assert!(flagged.message.contains("<field?>"));
    }
}
