//! Sample app run by `envcmd demo`

use tracing::info;

use crate::domain::{
    AppSpec, BoundConfig, CommandSpec, DomainResult, FieldKind, FieldSpec, FlagSpec, FromBound,
    SubCommandSpec,
};

/// Configuration the sample app binds before dispatching.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub port: i64,
    pub database_dsn: String,
    pub database_pool: i64,
    pub allowed_hosts: Vec<String>,
    pub must_exist: i64,
}

impl FromBound for DemoConfig {
    fn schema() -> Vec<FieldSpec> {
        vec![
            FieldSpec::record(
                "app",
                vec![FieldSpec::int("port").env("APP_PORT").default_value("8080")],
            ),
            FieldSpec::record(
                "database",
                vec![
                    FieldSpec::string("dsn").env("DB_DSN"),
                    FieldSpec::int("pool").env("DB_POOL").default_value("10"),
                ],
            ),
            FieldSpec::list("allowed_hosts", FieldKind::String)
                .env("ALLOWED_HOSTS")
                .default_value("localhost,127.0.0.1"),
            FieldSpec::int("must_exist")
                .env("MUST_EXIST")
                .default_value("999")
                .required(),
        ]
    }

    fn from_bound(config: &BoundConfig) -> DomainResult<Self> {
        let database = config.record("database")?;
        Ok(Self {
            port: config.record("app")?.i64("port")?,
            database_dsn: database.str("dsn")?.to_string(),
            database_pool: database.i64("pool")?,
            allowed_hosts: config.strings("allowed_hosts")?,
            must_exist: config.i64("must_exist")?,
        })
    }
}

/// Command tree of the sample app.
pub fn app() -> AppSpec {
    let output = FlagSpec::new("output", "Output directory for SQL files").short("o");
    let output_lookup = output.clone();

    AppSpec::new(
        "myapp",
        "1.0.0",
        "A sample CLI application demonstrating the dispatcher",
    )
    .command(
        CommandSpec::new("serve", "Start the server with specified services")
            .long_about("This command starts the server with HTTP, gRPC, and consumer services")
            .flag(FlagSpec::new(
                "http",
                "HTTP service configuration (e.g., all, none, specific)",
            ))
            .flag(FlagSpec::new("grpc", "gRPC service modules (e.g., module1,module2)"))
            .flag(FlagSpec::new(
                "consumer",
                "Consumer service modules (e.g., module1,module2)",
            ))
            .handler(|ctx, _args, flags| {
                ctx.check()?;
                let get = |name: &str| flags.get(name).map(String::as_str).unwrap_or_default();
                println!("Starting server...");
                println!("HTTP: {}", get("http"));
                println!("gRPC: {}", get("grpc"));
                println!("Consumer: {}", get("consumer"));
                Ok(())
            }),
    )
    .command(
        CommandSpec::new("exec", "Execute specific operations")
            .long_about("This command executes specific operations like migrations")
            .flag(FlagSpec::new("migrate-old-user", "Migrate old user data"))
            .flag(FlagSpec::new(
                "migrate-old-transactions",
                "Migrate old transaction data",
            ))
            .handler(|_ctx, _args, flags| {
                if flags.contains_key("migrate-old-user") {
                    println!("Migrating old user data...");
                }
                if flags.contains_key("migrate-old-transactions") {
                    println!("Migrating old transaction data...");
                }
                Ok(())
            }),
    )
    .command(
        CommandSpec::new("db", "Database operations")
            .long_about("This command handles database operations like init, migrate, etc.")
            .subcommand(
                SubCommandSpec::new("init", "Initialize the database").handler(|_, _, _| {
                    println!("Initializing database...");
                    Ok(())
                }),
            )
            .subcommand(
                SubCommandSpec::new("migrate", "Run database migrations").handler(|_, _, _| {
                    println!("Running database migrations...");
                    Ok(())
                }),
            )
            .subcommand(
                SubCommandSpec::new("create_sql", "Generate SQL files")
                    .flag(output)
                    .handler(move |_, _, flags| {
                        let dir = output_lookup.lookup(flags).unwrap_or("./sql");
                        let dir = if dir.is_empty() { "./sql" } else { dir };
                        println!("Creating SQL files in {dir}...");
                        Ok(())
                    }),
            ),
    )
    .command(
        CommandSpec::new("config", "Manage application configuration")
            .long_about("This command manages application configuration settings")
            .flag(FlagSpec::new(
                "set",
                "Set a configuration value (key=value format)",
            ))
            .flag(FlagSpec::new("get", "Get a configuration value by key"))
            .flag(FlagSpec::new("remove", "Remove a configuration value by key"))
            .handler(|_ctx, _args, flags| {
                if let Some(value) = flags.get("set") {
                    let (key, value) = value
                        .split_once('=')
                        .ok_or("invalid format for --set, use key=value")?;
                    println!("Setting configuration: {key} = {value}");
                }
                if let Some(key) = flags.get("get") {
                    println!("Getting configuration value for: {key}");
                }
                if let Some(key) = flags.get("remove") {
                    println!("Removing configuration value: {key}");
                }
                Ok(())
            }),
    )
}

/// Log the bound sample config.
pub fn log_config(cfg: &DemoConfig) {
    info!(
        port = cfg.port,
        dsn = %cfg.database_dsn,
        pool = cfg.database_pool,
        allowed_hosts = ?cfg.allowed_hosts,
        must_exist = cfg.must_exist,
        "loaded configuration"
    );
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::application::services::{ConfigBinder, Dispatcher};

    #[test]
    fn given_empty_env_when_binding_demo_config_then_defaults_apply() {
        let bound = ConfigBinder::new()
            .bind(&DemoConfig::schema(), &BTreeMap::<String, String>::new())
            .unwrap();

        let cfg = DemoConfig::from_bound(&bound).unwrap();

        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.database_pool, 10);
        assert_eq!(cfg.database_dsn, "");
        assert_eq!(cfg.allowed_hosts, vec!["localhost", "127.0.0.1"]);
        assert_eq!(cfg.must_exist, 999);
    }

    #[test]
    fn given_demo_app_when_building_dispatcher_then_schema_is_valid() {
        assert!(Dispatcher::new(app()).is_ok());
    }
}
