use clap::Args;

/// Process settings read from flags or the environment
#[derive(Debug, Clone, Args)]
pub struct AppEnvConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: u16,

    /// Postgres URL; the in-memory store is used when absent
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Connection pool size
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Comma-separated allowed origins, `*` for any
    #[arg(long, env = "CORS_ALLOW_ORIGIN", default_value = "*")]
    pub cors_allow_origin: String,
}

impl AppEnvConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        config: AppEnvConfig,
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "credential_gate",
            "--port",
            "5000",
            "--host",
            "127.0.0.1",
            "--database-url",
            "postgres://localhost/users",
        ])
        .unwrap();

        assert_eq!(cli.config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(cli.config.database_url.as_deref(), Some("postgres://localhost/users"));
        assert_eq!(cli.config.max_connections, 5);
    }

    #[test]
    fn test_port_is_required() {
        // only meaningful when PORT is not exported by the test runner
        if std::env::var_os("PORT").is_none() {
            assert!(Cli::try_parse_from(["credential_gate"]).is_err());
        }
    }
}
