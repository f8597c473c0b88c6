use std::time::Duration;

pub const URL_PLACEHOLDER: &str = "{password}";
pub const DEFAULT_URL: &str = "https://api.pwnedpasswords.com/range/{password}";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_FAIL_SAFE: bool = true;
pub const DEFAULT_MIN_LENGTH: usize = 8; // carried for compatibility, never enforced

pub const DEFAULT_ERROR_MSG: &str = "Your password was detected in a major security breach.";
pub const DEFAULT_ERROR_FAIL_MSG: &str = "We could not validate the safety of this password. This does not mean the password is invalid. Please try again later.";
pub const DEFAULT_HELP_TEXT: &str = "Your password must not have been detected in a major security breach.";

pub const PREFIX_LEN: usize = 5; // the only part of the hash that ever leaves the machine
pub const SHA1_HEX_LEN: usize = 40;

pub const CONFIG_PATH: &str = "pwned.toml";
