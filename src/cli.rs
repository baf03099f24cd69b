use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "report-console",
    version,
    about = "Sign in and edit the settings of the scheduled KPI report"
)]
pub struct Cli {
    /// Report API base URL; overrides `apiUrl` in the config file.
    #[arg(long, global = true, env = "REPORT_CONSOLE_API_URL")]
    pub api_url: Option<String>,

    /// Runs the interactive wizard when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and keep the session for later commands.
    Login(LoginArgs),
    /// Sign out and forget the stored session.
    Logout,
    /// Show the signed-in account.
    Whoami,
    /// Print the stored report settings.
    Settings(SettingsArgs),
    /// Step through the settings interactively.
    Wizard,
    /// Email the report to the signed-in account now.
    SendNow,
    /// Build the slide deck on the server.
    ExportPpt,
    /// Re-install the server's send schedule from the stored settings.
    ScheduleEmail,
    /// Validate a field value without contacting the server.
    Check(CheckArgs),
    /// Show or change the local configuration.
    #[command(subcommand)]
    Config(ConfigAction),
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, env = "REPORT_CONSOLE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Print the raw settings record instead of a summary.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(value_enum)]
    pub field: Field,

    /// Value to check; may be empty.
    #[arg(default_value = "")]
    pub value: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Field {
    DaysBack,
    Time,
    Weekday,
    MonthDay,
    Equation,
    Username,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Set one key (apiUrl, syncDebounceMs, bannerSeconds, defaultDomain).
    Set { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_wizard() {
        let cli = Cli::try_parse_from(["report-console"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_api_url_after_subcommand() {
        let cli =
            Cli::try_parse_from(["report-console", "whoami", "--api-url", "https://r.example"])
                .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("https://r.example"));
        assert!(matches!(cli.command, Some(Commands::Whoami)));
    }

    #[test]
    fn test_check_field_names() {
        let cli = Cli::try_parse_from(["report-console", "check", "days-back", "7"]).unwrap();
        match cli.command {
            Some(Commands::Check(args)) => {
                assert_eq!(args.field, Field::DaysBack);
                assert_eq!(args.value, "7");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["report-console", "check", "colour", "red"]).is_err());
    }

    #[test]
    fn test_config_set() {
        let cli =
            Cli::try_parse_from(["report-console", "config", "set", "bannerSeconds", "6"]).unwrap();
        match cli.command {
            Some(Commands::Config(ConfigAction::Set { key, value })) => {
                assert_eq!(key, "bannerSeconds");
                assert_eq!(value, "6");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
