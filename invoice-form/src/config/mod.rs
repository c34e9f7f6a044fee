use crate::services::numbering::NumberingPolicy;
use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEFAULT_STORE_TIMEOUT_SECS: u64 = 15;
const DEFAULT_PAYMENT_TERMS: &str = "Net 15";

/// Payment terms the form offers.
pub const PAYMENT_TERMS_OPTIONS: [&str; 4] = ["Net 15", "Net 30", "Net 60", "Due on receipt"];

#[derive(Debug, Clone)]
pub struct InvoiceFormConfig {
    pub common: core_config::Config,
    pub store: StoreConfig,
    pub numbering: NumberingPolicy,
    pub defaults: FormDefaults,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the REST backend, without the `/api` suffix.
    pub base_url: String,
    pub api_token: Option<Secret<String>>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDefaults {
    pub payment_terms: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            payment_terms: DEFAULT_PAYMENT_TERMS.to_string(),
        }
    }
}

impl InvoiceFormConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";
        let default_policy = NumberingPolicy::default();

        Ok(InvoiceFormConfig {
            common: common_config,
            store: StoreConfig {
                base_url: get_env("INVOICE_STORE_URL", Some("http://localhost:8000"), is_prod)?,
                api_token: env::var("INVOICE_STORE_TOKEN")
                    .ok()
                    .filter(|token| !token.is_empty())
                    .map(Secret::new),
                timeout_secs: parse_env(
                    "INVOICE_STORE_TIMEOUT_SECS",
                    DEFAULT_STORE_TIMEOUT_SECS,
                )?,
            },
            numbering: NumberingPolicy {
                prefix: get_env(
                    "INVOICE_NUMBER_PREFIX",
                    Some(&default_policy.prefix),
                    false,
                )?,
                min_width: parse_env("INVOICE_NUMBER_MIN_WIDTH", default_policy.min_width)?,
                fallback_digits: parse_env(
                    "INVOICE_NUMBER_FALLBACK_DIGITS",
                    default_policy.fallback_digits,
                )?,
            },
            defaults: FormDefaults {
                payment_terms: payment_terms_env(
                    "INVOICE_DEFAULT_PAYMENT_TERMS",
                    DEFAULT_PAYMENT_TERMS,
                )?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production",
                    key
                )))
            } else {
                default.map(|s| s.to_string()).ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!("{} is required", key))
                })
            }
        }
    }
}

fn payment_terms_env(key: &str, default: &str) -> Result<String, AppError> {
    let terms = get_env(key, Some(default), false)?;
    if PAYMENT_TERMS_OPTIONS.contains(&terms.as_str()) {
        Ok(terms)
    } else {
        Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be one of {:?}, got {:?}",
            key,
            PAYMENT_TERMS_OPTIONS,
            terms
        )))
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e))),
        Err(_) => Ok(default),
    }
}
