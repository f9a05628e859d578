use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_bookings::PrecheckPolicy;

pub use core_config::Environment;

/// Hotel API configuration, composed from the shared config pieces.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// `BOOKING_PRECHECK_POLICY`: `fail_open` or `fail_closed` (default)
    pub precheck_policy: PrecheckPolicy,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DATABASE_URL is required
        let server = ServerConfig::from_env()?;
        let precheck_policy = env_parse("BOOKING_PRECHECK_POLICY", PrecheckPolicy::default())?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            precheck_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/hotel")),
                ("BOOKING_PRECHECK_POLICY", None),
                ("PORT", None),
                ("APP_ENV", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "hotel_api");
                assert_eq!(config.database.url(), "postgresql://localhost/hotel");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.precheck_policy, PrecheckPolicy::FailClosed);
                assert!(config.environment.is_development());
            },
        );
    }

    #[test]
    fn test_fail_open_policy() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/hotel")),
                ("BOOKING_PRECHECK_POLICY", Some("fail_open")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.precheck_policy, PrecheckPolicy::FailOpen);
            },
        );
    }

    #[test]
    fn test_unknown_policy_is_an_error() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/hotel")),
                ("BOOKING_PRECHECK_POLICY", Some("maybe")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_missing_database_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            assert!(Config::from_env().is_err());
        });
    }
}
