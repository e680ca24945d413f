use clap::Parser;
use cms_installer::core::{LangVars, Reporter};
use cms_installer::utils::{logger, validation::{entered_license_key, Validate}};
use cms_installer::{
    CliConfig, Command, ComposerProcess, ConsoleReporter, Lang, SetupBuilder, SetupError,
    UpdateGateway, VersionConstraint,
};
use dialoguer::Input;
use std::io::IsTerminal;
use std::time::Instant;

type Setup = SetupBuilder<ConsoleReporter, Lang>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let started_at = Instant::now();
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting cms-installer");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.load_installer_config() {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(e);
    }

    let lang = Lang::english()?.with_overrides(&config.lang.messages);
    let setup = SetupBuilder::new(ConsoleReporter::new(), lang, config, started_at);

    if let Err(e) = run(&setup, cli.command).await {
        match e {
            // 失敗說明已經印出
            SetupError::InstallFailed { .. } => std::process::exit(e.exit_code()),
            e => fail(e),
        }
    }

    Ok(())
}

fn fail(e: SetupError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

async fn run(setup: &Setup, command: Command) -> cms_installer::Result<()> {
    match command {
        Command::Install { want, key } => install(setup, VersionConstraint::new(want), key).await,
        Command::ProjectSet { key } => set_project(setup, &key).await,
        Command::EnvCheck => env_check(setup),
    }
}

async fn install(setup: &Setup, want: VersionConstraint, key: Option<String>) -> cms_installer::Result<()> {
    setup.output_intro();

    if !setup.check_env_writable() {
        report_env_not_writable(setup);
    }

    let key = match key {
        Some(key) => Some(key),
        None => prompt_license_key(setup)?,
    };

    match key {
        Some(key) => set_project(setup, &key).await?,
        None if setup.non_interactive_check() => {
            setup
                .reporter()
                .comment(&setup.lang("installer.non_interactive_comment", &LangVars::new()));
        }
        None => tracing::info!("⏭️ License activation skipped"),
    }

    let config = setup.config();
    let mut composer = ComposerProcess::new(config.composer.binary.clone(), setup.base_path(""));
    setup.setup_install_core(&mut composer, &want).await?;

    setup.output_outro();
    Ok(())
}

/// 只有在終端機上才詢問授權碼
fn prompt_license_key(setup: &Setup) -> cms_installer::Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let input: String = Input::new()
        .with_prompt(setup.lang("installer.license_key_prompt", &LangVars::new()))
        .allow_empty(true)
        .interact_text()
        .map_err(std::io::Error::other)?;
    Ok(entered_license_key(&input))
}

async fn set_project(setup: &Setup, key: &str) -> cms_installer::Result<()> {
    let gateway = UpdateGateway::new(&setup.config().gateway)?;
    let details = setup.setup_set_project(&gateway, key).await?;

    let vars = LangVars::from([(
        "name".to_string(),
        details.name.clone().unwrap_or_else(|| key.to_string()),
    )]);
    setup
        .reporter()
        .comment(&setup.lang("installer.project_activated_comment", &vars));
    Ok(())
}

fn env_check(setup: &Setup) -> cms_installer::Result<()> {
    let env_path = setup.base_path(".env");
    let vars = LangVars::from([("path".to_string(), env_path.display().to_string())]);

    if setup.check_env_writable() {
        setup
            .reporter()
            .line(&setup.lang("installer.env_writable_comment", &vars));
        Ok(())
    } else {
        Err(SetupError::ValidationError {
            message: setup.lang("installer.env_not_writable_comment", &vars),
        })
    }
}

fn report_env_not_writable(setup: &Setup) {
    let env_path = setup.base_path(".env");
    let vars = LangVars::from([("path".to_string(), env_path.display().to_string())]);
    setup
        .reporter()
        .error(&setup.lang("installer.env_not_writable_comment", &vars));
}
