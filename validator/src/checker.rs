use common::{Config, ConfigError, HashRange, TransportError, ValidationError};
use derivative::Derivative;
use tracing::{debug, info, warn};

use crate::outcome::{resolve, FailurePolicy, LookupOutcome, Resolution};
use crate::range;
use crate::transport::{HttpTransport, Transport};
use crate::{PasswordValidator, UserAttributes};

/// Checks passwords against a k-anonymity range service.
///
/// Each check hashes the password, sends the 5 character prefix of the hash and looks
/// for the remaining suffix in the response. The password and the suffix never leave
/// the process. Checks block for up to `config.timeout` and share no mutable state, so a
/// single checker can be used from many threads at once.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct BreachChecker {
    config: Config,
    policy: FailurePolicy,
    #[derivative(Debug="ignore")]
    transport: Box<dyn Transport>,
}

impl BreachChecker {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_transport(config, HttpTransport::new())
    }

    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            policy: FailurePolicy::from_fail_safe(config.fail_safe),
            config,
            transport: Box::new(transport),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn get_url(&self, prefix: &str) -> String {
        self.config.range_url(prefix)
    }

    pub fn help_text(&self) -> &str {
        &self.config.help_text
    }

    /// Runs one range query, no policy applied.
    pub fn lookup(&self, password: &str) -> LookupOutcome {
        let range = HashRange::of(password);
        debug!("querying range {}", range.prefix());

        match self.transport.get(&self.get_url(range.prefix()), self.config.timeout) {
            Ok(body) if range::contains_suffix(&body, range.suffix()) => {
                info!("password found in range {}", range.prefix());
                LookupOutcome::Found
            }
            Ok(_) => LookupOutcome::NotFound,
            Err(e) => {
                warn!("breach lookup failed: {}", e);
                LookupOutcome::TransportError(e)
            }
        }
    }

    /// `Ok(true)` when the password may be used, `Ok(false)` when it was breached.
    ///
    /// A failed lookup passes under the fail-safe policy and is an
    /// `Err(ValidationUnavailable)` otherwise.
    pub fn check_valid(&self, password: &str) -> Result<bool, ValidationError> {
        match resolve(&self.lookup(password), self.policy) {
            Resolution::Valid => Ok(true),
            Resolution::Invalid => Ok(false),
            Resolution::Unavailable => Err(ValidationError::ValidationUnavailable(self.config.error_fail_msg.clone())),
        }
    }

    /// Like `check_valid`, but an unverifiable password is just invalid.
    pub fn is_valid(&self, password: &str) -> bool {
        self.check_valid(password).unwrap_or(false)
    }

    pub fn validate(&self, password: &str, _user: Option<&UserAttributes>) -> Result<(), ValidationError> {
        if self.check_valid(password)? {
            Ok(())
        } else {
            Err(ValidationError::PasswordBreached(self.config.error_msg.clone()))
        }
    }

    /// Number of times the password was seen in breaches, `None` when absent.
    ///
    /// Informational only, verdicts never depend on it. Errors are returned as is,
    /// whatever the policy.
    pub fn breach_count(&self, password: &str) -> Result<Option<u64>, TransportError> {
        let range = HashRange::of(password);
        debug!("querying range {} for count", range.prefix());

        let body = self.transport.get(&self.get_url(range.prefix()), self.config.timeout)?;
        Ok(range::breach_count(&body, range.suffix()))
    }
}

impl PasswordValidator for BreachChecker {
    fn validate(&self, password: &str, user: Option<&UserAttributes>) -> Result<(), ValidationError> {
        BreachChecker::validate(self, password, user)
    }

    fn help_text(&self) -> &str {
        BreachChecker::help_text(self)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::{Arc, Mutex}, time::Duration};

    use super::*;

    // SHA-1("password") = 5BAA6 1E4C9B93F3F0682250B6CF8331B7EE68FD8
    const PREFIX: &str = "5BAA6";
    const SUFFIX: &str = "1E4C9B93F3F0682250B6CF8331B7EE68FD8";

    struct MockTransport {
        response: Result<String, TransportError>,
        requests: Mutex<Vec<(String, Duration)>>,
    }

    impl MockTransport {
        fn body(body: &str) -> Arc<Self> {
            Arc::new(Self { response: Ok(body.to_owned()), requests: Mutex::new(Vec::new()) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err(TransportError::Timeout("operation timed out".into())),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(String, Duration)> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        fn get(&self, url: &str, timeout: Duration) -> Result<String, TransportError> {
            self.requests.lock().unwrap().push((url.to_owned(), timeout));
            self.response.clone()
        }
    }

    fn breached_body() -> String {
        format!("0018A45C4D1DEF81644B54AB7F969B88D65:3\r\n{}:10434004\r\n", SUFFIX)
    }

    fn checker(fail_safe: bool, transport: &Arc<MockTransport>) -> BreachChecker {
        let config = Config { fail_safe, ..Config::default() };
        BreachChecker::with_transport(config, transport.clone()).unwrap()
    }

    #[test]
    fn get_url_default_template() {
        let c = checker(true, &MockTransport::body(""));
        assert_eq!(c.get_url("5BAA6"), "https://api.pwnedpasswords.com/range/5BAA6");
    }

    #[test]
    fn only_prefix_is_sent() {
        let transport = MockTransport::body("");
        let c = checker(true, &transport);
        let passwords = ["password", "", "pässwörd", "correct horse battery staple"];
        for password in passwords {
            c.is_valid(password);
        }

        let requests = transport.requests();
        assert_eq!(requests.len(), passwords.len());
        for ((url, timeout), password) in requests.iter().zip(passwords) {
            let range = HashRange::of(password);
            let sent = url.strip_prefix("https://api.pwnedpasswords.com/range/").unwrap();
            assert_eq!(sent, range.prefix());
            assert_eq!(sent.len(), 5);
            assert!(!url.contains(range.suffix()));
            assert_eq!(*timeout, Duration::from_secs(2));
        }
    }

    #[test]
    fn found_is_invalid_whatever_the_policy() {
        for fail_safe in [true, false] {
            let c = checker(fail_safe, &MockTransport::body(&breached_body()));
            assert_eq!(c.check_valid("password"), Ok(false));
            assert!(!c.is_valid("password"));
            assert_eq!(
                c.validate("password", None),
                Err(ValidationError::PasswordBreached(common::consts::DEFAULT_ERROR_MSG.into()))
            );
        }
    }

    #[test]
    fn not_found_is_valid_whatever_the_policy() {
        for fail_safe in [true, false] {
            let c = checker(fail_safe, &MockTransport::body("0018A45C4D1DEF81644B54AB7F969B88D65:3\r\n"));
            assert_eq!(c.check_valid("password"), Ok(true));
            assert!(c.validate("password", None).is_ok());
        }
    }

    #[test]
    fn lowercase_response_is_matched() {
        let c = checker(true, &MockTransport::body(&breached_body().to_lowercase()));
        assert_eq!(c.lookup("password"), LookupOutcome::Found);
        assert!(!c.is_valid("password"));
    }

    #[test]
    fn transport_failure_fail_open() {
        let c = checker(true, &MockTransport::failing());
        assert!(matches!(c.lookup("password"), LookupOutcome::TransportError(TransportError::Timeout(_))));
        assert_eq!(c.check_valid("password"), Ok(true));
        assert!(c.is_valid("password"));
        assert!(c.validate("password", None).is_ok());
    }

    #[test]
    fn transport_failure_fail_closed() {
        let c = checker(false, &MockTransport::failing());
        let expected = ValidationError::ValidationUnavailable(common::consts::DEFAULT_ERROR_FAIL_MSG.into());
        assert_eq!(c.check_valid("password"), Err(expected.clone()));
        assert!(!c.is_valid("password"));
        assert_eq!(c.validate("password", None), Err(expected));
    }

    #[test]
    fn single_request_per_check() {
        let transport = MockTransport::failing();
        let c = checker(false, &transport);
        let _ = c.validate("password", None);
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn empty_password_queries_normally() {
        let transport = MockTransport::body("3EE5E6B4B0D3255BFEF95601890AFD80709:1\r\n");
        let c = checker(true, &transport);
        assert!(!c.is_valid(""));
        assert_eq!(transport.requests()[0].0, "https://api.pwnedpasswords.com/range/DA39A");
    }

    #[test]
    fn configured_messages_are_used() {
        let config = Config {
            fail_safe: false,
            error_msg: "pwned".into(),
            error_fail_msg: "later".into(),
            help_text: "no pwned passwords".into(),
            ..Config::default()
        };
        let c = BreachChecker::with_transport(config.clone(), MockTransport::body(&breached_body())).unwrap();
        assert_eq!(c.validate("password", None).unwrap_err().message(), "pwned");
        assert_eq!(c.help_text(), "no pwned passwords");

        let c = BreachChecker::with_transport(config, MockTransport::failing()).unwrap();
        assert_eq!(c.validate("password", None).unwrap_err().to_string(), "later");
    }

    #[test]
    fn custom_template_and_timeout() {
        let transport = MockTransport::body("");
        let config = Config {
            url: "http://localhost:8080/pwned/{password}?padding=false".into(),
            timeout: Duration::from_millis(250),
            ..Config::default()
        };
        let c = BreachChecker::with_transport(config, transport.clone()).unwrap();
        c.is_valid("password");
        assert_eq!(
            transport.requests(),
            vec![(format!("http://localhost:8080/pwned/{}?padding=false", PREFIX), Duration::from_millis(250))]
        );
    }

    #[test]
    fn rejects_template_without_placeholder() {
        let config = Config { url: "https://api.pwnedpasswords.com/range/".into(), ..Config::default() };
        assert!(matches!(
            BreachChecker::with_transport(config, MockTransport::body("")),
            Err(ConfigError::MissingPlaceholder(_))
        ));
    }

    #[test]
    fn breach_count() {
        let c = checker(true, &MockTransport::body(&breached_body()));
        assert_eq!(c.breach_count("password"), Ok(Some(10434004)));
        assert_eq!(c.breach_count("not in the body"), Ok(None));

        let c = checker(true, &MockTransport::failing());
        assert!(c.breach_count("password").is_err());
    }

    #[test]
    fn usable_as_trait_object() {
        let c = checker(true, &MockTransport::body(&breached_body()));
        let v: &dyn PasswordValidator = &c;
        let user = UserAttributes { username: Some("alice".into()), email: None };
        assert!(v.validate("password", Some(&user)).is_err());
        assert_eq!(v.help_text(), common::consts::DEFAULT_HELP_TEXT);
    }

    #[test]
    fn debug_does_not_need_transport() {
        let c = checker(true, &MockTransport::body(""));
        assert!(format!("{:?}", c).contains("BreachChecker"));
    }
}
