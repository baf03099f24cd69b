//! Subcommand handlers.
//!
//! Each handler prints its result to stdout and returns a `ConsoleError`
//! for the caller to report.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

use crate::actions::{self, Notice};
use crate::api::{HttpApi, ReportApi};
use crate::cli::{CheckArgs, Cli, Commands, ConfigAction, Field, LoginArgs, SettingsArgs};
use crate::console::Console;
use crate::error::ConsoleError;
use crate::schedule;
use crate::session;
use crate::state;
use crate::token_store::TokenStore;
use crate::types::{ChartSpec, Config, Settings};
use crate::validate::{
    validate_days_back, validate_equation, validate_local_part, validate_month_day,
    validate_time, validate_weekday,
};

pub async fn run(cli: Cli) -> Result<(), ConsoleError> {
    let Cli { api_url, command } = cli;

    match command.unwrap_or(Commands::Wizard) {
        Commands::Check(args) => check(&args),
        Commands::Config(action) => config(action, api_url),
        Commands::Login(args) => {
            let (_, api) = connect(api_url)?;
            login(api.as_ref(), args).await
        }
        Commands::Logout => {
            let (_, api) = connect(api_url)?;
            session::logout(api.as_ref()).await?;
            println!("Signed out.");
            Ok(())
        }
        Commands::Whoami => {
            let (_, api) = connect(api_url)?;
            let identity = api.me().await?;
            println!("{}", identity.email);
            Ok(())
        }
        Commands::Settings(args) => {
            let (_, api) = connect(api_url)?;
            show_settings(api.as_ref(), &args).await
        }
        Commands::Wizard => {
            let (config, api) = connect(api_url)?;
            let reader = BufReader::new(tokio::io::stdin());
            let mut console = Console::new(reader, tokio::io::stdout(), api, config);
            console.run().await
        }
        Commands::SendNow => {
            let (_, api) = connect(api_url)?;
            report(actions::send_now(api.as_ref()).await)
        }
        Commands::ExportPpt => {
            let (_, api) = connect(api_url)?;
            report(actions::export_ppt(api.as_ref()).await)
        }
        Commands::ScheduleEmail => {
            let (_, api) = connect(api_url)?;
            report(actions::schedule_email(api.as_ref()).await)
        }
    }
}

fn effective_config(api_url: Option<String>) -> Result<Config, ConsoleError> {
    let config = state::load_config().map_err(ConsoleError::Configuration)?;
    Ok(state::with_api_url_override(config, api_url))
}

fn connect(api_url: Option<String>) -> Result<(Config, Arc<dyn ReportApi>), ConsoleError> {
    let config = effective_config(api_url)?;
    let store = TokenStore::default_location()?;
    let api = HttpApi::new(&config.api_url, Some(store))?;
    log::debug!("Using report API at {}", api.base_url());
    let api: Arc<dyn ReportApi> = Arc::new(api);
    Ok((config, api))
}

fn report(notice: Notice) -> Result<(), ConsoleError> {
    if notice.is_success() {
        println!("{}: {}", notice.severity.title(), notice.message);
        Ok(())
    } else {
        Err(ConsoleError::Action(notice.message))
    }
}

async fn read_prompt<R, W>(
    lines: &mut Lines<R>,
    out: &mut W,
    label: &str,
) -> Result<String, ConsoleError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    out.write_all(label.as_bytes()).await?;
    out.flush().await?;
    lines.next_line().await?.ok_or_else(|| {
        ConsoleError::Io(format!(
            "input ended before {} was entered",
            label.trim_end().trim_end_matches(':')
        ))
    })
}

/// Fill in whatever the flags left out from one input stream, so piped
/// credentials reach both prompts.
async fn read_credentials<R, W>(
    lines: &mut Lines<R>,
    out: &mut W,
    args: LoginArgs,
) -> Result<(String, String), ConsoleError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let email = match args.email {
        Some(email) => email,
        None => read_prompt(lines, out, "Email: ").await?,
    };
    let password = match args.password {
        Some(password) => password,
        None => read_prompt(lines, out, "Password: ").await?,
    };
    Ok((email, password))
}

async fn login(api: &dyn ReportApi, args: LoginArgs) -> Result<(), ConsoleError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();
    let (email, password) = read_credentials(&mut lines, &mut out, args).await?;

    session::login(api, &email, &password).await?;
    let identity = api.me().await?;
    println!("Signed in as {}", identity.email);
    Ok(())
}

fn describe_chart(spec: Option<&ChartSpec>) -> String {
    match spec {
        Some(ChartSpec::List(members)) => {
            let names: Vec<String> = members.iter().map(|m| m.to_string()).collect();
            format!("list [{}]", names.join(", "))
        }
        Some(ChartSpec::Equation(expr)) => format!("equation {}", expr),
        None => "-".to_string(),
    }
}

fn summarize(settings: &Settings, now: DateTime<Utc>) -> String {
    let days_back = settings
        .days_back
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        format!("Days back:    {}", days_back),
        format!("Schedule:     {}", schedule::describe(settings)),
        format!("Recipients:   {}", settings.mailing_list.0.join(", ")),
        format!("Line chart:   {}", describe_chart(settings.line_chart.as_ref())),
        format!("Bar chart:    {}", describe_chart(settings.bar_chart.as_ref())),
    ];
    if let Some(next) = schedule::preview(settings, now) {
        lines.push(format!("Next send:    {}", next));
    }
    lines.join("\n")
}

async fn show_settings(api: &dyn ReportApi, args: &SettingsArgs) -> Result<(), ConsoleError> {
    let settings = api.get_settings().await?;
    if args.json {
        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| ConsoleError::Io(e.to_string()))?;
        println!("{}", json);
    } else {
        println!("{}", summarize(&settings, Utc::now()));
    }
    Ok(())
}

fn check(args: &CheckArgs) -> Result<(), ConsoleError> {
    let value = args.value.as_str();
    let verdict = match args.field {
        Field::DaysBack => validate_days_back(value),
        Field::Time => validate_time(value),
        Field::Weekday => validate_weekday(value),
        Field::MonthDay => validate_month_day(value),
        Field::Equation => validate_equation(value),
        Field::Username => validate_local_part(value),
    };
    verdict?;
    println!("ok");
    Ok(())
}

fn config(action: ConfigAction, api_url: Option<String>) -> Result<(), ConsoleError> {
    match action {
        ConfigAction::Show => {
            let config = effective_config(api_url)?;
            let path = state::config_path().map_err(ConsoleError::Configuration)?;
            let json = serde_json::to_string_pretty(&config)
                .map_err(|e| ConsoleError::Configuration(e.to_string()))?;
            println!("# {}", path.display());
            println!("{}", json);
        }
        ConfigAction::Set { key, value } => {
            let config = state::create_or_update_config(|c| state::set_config_value(c, &key, &value))
                .map_err(ConsoleError::Configuration)?;
            log::debug!("Config now {:?}", config);
            println!("Set {}.", key);
        }
    }
    Ok(())
}
