use crate::config::toml_config::InstallerConfig;
use crate::core::{banner, env_file, interactive};
use crate::domain::model::{LangVars, ProjectDetails, VersionConstraint};
use crate::domain::ports::{ComposerRunner, LicenseClient, Reporter, Translator};
use crate::utils::error::{Result, SetupError};
use crate::utils::validation::validate_license_key;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Shared steps for the installer commands.
///
/// Output and translations go through the injected [`Reporter`] and
/// [`Translator`]. `started_at` is the moment the command started and feeds
/// [`SetupBuilder::non_interactive_check`].
pub struct SetupBuilder<R: Reporter, T: Translator> {
    reporter: R,
    translator: T,
    config: InstallerConfig,
    started_at: Instant,
}

impl<R: Reporter, T: Translator> SetupBuilder<R, T> {
    pub fn new(reporter: R, translator: T, config: InstallerConfig, started_at: Instant) -> Self {
        Self {
            reporter,
            translator,
            config,
            started_at,
        }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub fn update_want_version(&self) -> &str {
        self.config.want_version()
    }

    pub fn base_path(&self, path: &str) -> PathBuf {
        let base = self.config.base_path();
        if path.is_empty() {
            base.to_path_buf()
        } else {
            base.join(path)
        }
    }

    pub fn lang(&self, key: &str, vars: &LangVars) -> String {
        self.translator.get(key, vars)
    }

    fn trans(&self, key: &str) -> String {
        self.lang(key, &LangVars::new())
    }

    /// `package:constraint` for every core package
    pub fn core_requirements(&self, want: &VersionConstraint) -> Vec<String> {
        let constraint = want.resolve(self.update_want_version());
        self.config
            .composer
            .core_packages
            .iter()
            .map(|package| format!("{}:{}", package, constraint))
            .collect()
    }

    /// Installs the core packages with composer, streaming its output.
    ///
    /// A non-zero exit prints the failure outro and returns
    /// [`SetupError::InstallFailed`], which the binary turns into exit status 1.
    pub async fn setup_install_core<C>(&self, composer: &mut C, want: &VersionConstraint) -> Result<()>
    where
        C: ComposerRunner + ?Sized,
    {
        let requirements = self.core_requirements(want);
        tracing::info!("📦 Requiring {}", requirements.join(", "));

        let reporter = &self.reporter;
        let exit_code = composer
            .require(&requirements, &|chunk| reporter.raw(chunk))
            .await?;

        if exit_code != 0 {
            tracing::error!("❌ composer exited with {}", exit_code);
            self.output_failed_outro(want);
            return Err(SetupError::InstallFailed {
                exit_code: Some(exit_code),
            });
        }

        self.reporter.line("");
        Ok(())
    }

    /// Activates `license_key` against the gateway and stores the composer
    /// credentials. Nothing is written when the project is not active.
    pub async fn setup_set_project<L>(&self, client: &L, license_key: &str) -> Result<ProjectDetails>
    where
        L: LicenseClient + ?Sized,
    {
        validate_license_key(license_key)?;

        let details = client.request_project_details(license_key.trim()).await?;

        if !details.is_active {
            tracing::warn!("🔒 Project for the given key is not active");
            return Err(SetupError::Activation {
                message: self.trans("installer.license_expired_comment"),
            });
        }

        self.set_composer_auth(client, details.email.as_deref(), details.project_id.as_deref())?;
        tracing::info!("🔑 Project activated");
        Ok(details)
    }

    pub fn composer_url<L: LicenseClient + ?Sized>(&self, client: &L, with_protocol: bool) -> String {
        client.composer_url(with_protocol)
    }

    /// Writes the composer http-basic credentials, the composer repository and
    /// the stored project id.
    pub fn set_composer_auth<L>(
        &self,
        client: &L,
        email: Option<&str>,
        project_id: Option<&str>,
    ) -> Result<()>
    where
        L: LicenseClient + ?Sized,
    {
        let host = self.composer_url(client, false);
        let url = self.composer_url(client, true);

        inject_json_to_file(
            &self.base_path("auth.json"),
            json!({
                "http-basic": {
                    host: { "username": email, "password": project_id }
                }
            }),
        )?;

        let composer_json = self.base_path("composer.json");
        if composer_json.exists() {
            add_composer_repository(&composer_json, &self.config.composer.repository_name, &url)?;
        }

        inject_json_to_file(
            &self.base_path("storage/cms/project.json"),
            json!({
                "project": project_id,
                "email": email,
                "activated_at": chrono::Utc::now().to_rfc3339(),
            }),
        )?;

        Ok(())
    }

    pub fn output_intro(&self) {
        self.reporter.lines(banner::INTRO);
    }

    pub fn output_outro(&self) {
        self.reporter.lines(banner::OUTRO);

        let app = &self.config.app;
        self.reporter.comment(&self.trans("installer.migrate_database_comment"));
        self.reporter.line("");
        self.reporter.line(&format!("* {} {}", app.tool, app.migrate_command));
        self.reporter.line("");

        let admin_url = format!("{}{}", env_var("APP_URL"), env_var("BACKEND_URI"));
        self.reporter.comment(&self.trans("installer.visit_backend_comment"));
        self.reporter.line("");
        self.reporter.line(&format!("* {}", admin_url));
    }

    pub fn output_failed_outro(&self, want: &VersionConstraint) {
        let app = &self.config.app;

        self.reporter.title(&self.trans("installer.install_failed_label"));
        self.reporter.error(&self.trans("installer.install_failed_comment"));
        self.reporter.line("");

        self.reporter.line(&self.trans("installer.open_configurator_comment"));
        self.reporter.line("");

        self.reporter.line(banner::OR_SEPARATOR);
        self.reporter.line("");

        self.reporter.line(&format!("* {} project:set <LICENSE KEY>", app.tool));
        self.reporter.line("");

        match want.requested() {
            Some(want) => self.reporter.line(&format!(
                "* {} {} --want={}",
                app.tool, app.build_command, want
            )),
            None => self.reporter.line(&format!("* {} {}", app.tool, app.build_command)),
        }
    }

    /// Creates `.env` from `.env.example` when missing and keeps `.gitignore`
    /// current. Returns whether `.env` can be written.
    pub fn check_env_writable(&self) -> bool {
        let env_path = self.base_path(".env");
        let gitignore = self.base_path(".gitignore");

        if env_file::copy_env_template(&env_path, &self.base_path(".env.example")) {
            if let Err(e) = self.refresh_env_vars() {
                tracing::warn!("⚠️ {}", e);
            }
        }

        if gitignore.exists() && env_file::is_writable(&gitignore) {
            if let Err(e) = self.add_to_gitignore(&gitignore) {
                tracing::warn!("⚠️ Could not update {}: {}", gitignore.display(), e);
            }
        }

        env_file::is_writable(&env_path)
    }

    pub fn refresh_env_vars(&self) -> Result<()> {
        env_file::load_env_file(&self.base_path(".env"))
    }

    pub fn add_to_gitignore(&self, gitignore: &Path) -> Result<bool> {
        env_file::append_gitignore_entries(gitignore, &self.config.gitignore.entries)
    }

    pub fn non_interactive_check(&self) -> bool {
        interactive::non_interactive_check(self.started_at)
    }
}

fn env_var(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

/// 深層合併 JSON 物件，新值覆蓋舊值
fn merge_json(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                merge_json(target.entry(key).or_insert(Value::Null), value);
            }
        }
        (target, patch) => *target = patch,
    }
}

fn read_json_object(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(json!({}));
    }

    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(json!({}));
    }
    Ok(serde_json::from_str(&contents)?)
}

/// composer 慣用四格縮排
fn write_json(path: &Path, value: &Value) -> Result<()> {
    use serde::Serialize;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');

    fs::write(path, buf)?;
    Ok(())
}

fn inject_json_to_file(path: &Path, patch: Value) -> Result<()> {
    let mut current = read_json_object(path)?;
    merge_json(&mut current, patch);
    write_json(path, &current)
}

/// `repositories` may be an object keyed by name or a plain list.
fn add_composer_repository(path: &Path, name: &str, url: &str) -> Result<()> {
    let mut composer = read_json_object(path)?;
    let repository = json!({ "type": "composer", "url": url });

    let Some(root) = composer.as_object_mut() else {
        return Err(SetupError::ValidationError {
            message: format!("{} is not a JSON object", path.display()),
        });
    };

    match root.get_mut("repositories") {
        Some(Value::Array(list)) => {
            let present = list
                .iter()
                .any(|repo| repo.get("url").and_then(Value::as_str) == Some(url));
            if !present {
                list.push(repository);
            }
        }
        Some(Value::Object(map)) => {
            map.insert(name.to_string(), repository);
        }
        _ => {
            root.insert("repositories".to_string(), json!({ name: repository }));
        }
    }

    write_json(path, &composer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BufferedReporter, Lang, OutputKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FakeComposer {
        exit_code: i32,
        output: &'static str,
        calls: Vec<Vec<String>>,
    }

    #[async_trait]
    impl ComposerRunner for FakeComposer {
        async fn require(
            &mut self,
            packages: &[String],
            on_output: &(dyn for<'a> Fn(&'a str) + Send + Sync),
        ) -> Result<i32> {
            self.calls.push(packages.to_vec());
            on_output(self.output);
            Ok(self.exit_code)
        }
    }

    struct FakeGateway {
        details: ProjectDetails,
        requests: AtomicUsize,
    }

    #[async_trait]
    impl LicenseClient for FakeGateway {
        async fn request_project_details(&self, _license_key: &str) -> Result<ProjectDetails> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.details.clone())
        }

        fn composer_url(&self, with_protocol: bool) -> String {
            if with_protocol {
                "https://gateway.test".to_string()
            } else {
                "gateway.test".to_string()
            }
        }
    }

    fn builder(base: &Path) -> SetupBuilder<BufferedReporter, Lang> {
        let mut config = InstallerConfig::default();
        config.app.base_path = base.to_path_buf();
        SetupBuilder::new(
            BufferedReporter::new(),
            Lang::english().unwrap(),
            config,
            Instant::now(),
        )
    }

    #[test]
    fn base_path_joins_relative_paths() {
        let dir = TempDir::new().unwrap();
        let setup = builder(dir.path());
        assert_eq!(setup.base_path(""), dir.path());
        assert_eq!(setup.base_path(".env"), dir.path().join(".env"));
    }

    #[test]
    fn core_requirements_use_default_want_version() {
        let dir = TempDir::new().unwrap();
        let setup = builder(dir.path());
        assert_eq!(
            setup.core_requirements(&VersionConstraint::any()),
            vec!["october/all:^3.0", "october/rain:^3.0"]
        );
        assert_eq!(
            setup.core_requirements(&VersionConstraint::new(Some("3.5.*".into()))),
            vec!["october/all:3.5.*", "october/rain:3.5.*"]
        );
    }

    #[tokio::test]
    async fn successful_install_streams_output() {
        let dir = TempDir::new().unwrap();
        let setup = builder(dir.path());
        let mut composer = FakeComposer {
            exit_code: 0,
            output: "Installing october/rain\n",
            calls: vec![],
        };

        setup
            .setup_install_core(&mut composer, &VersionConstraint::any())
            .await
            .unwrap();

        assert_eq!(composer.calls.len(), 1);
        let reporter = setup.reporter();
        assert_eq!(reporter.texts(OutputKind::Raw), vec!["Installing october/rain\n"]);
        assert!(reporter.texts(OutputKind::Title).is_empty());
    }

    #[tokio::test]
    async fn failed_install_prints_failure_outro() {
        let dir = TempDir::new().unwrap();
        let setup = builder(dir.path());
        let mut composer = FakeComposer {
            exit_code: 2,
            output: "Your requirements could not be resolved\n",
            calls: vec![],
        };

        let err = setup
            .setup_install_core(&mut composer, &VersionConstraint::new(Some("3.6.*".into())))
            .await
            .unwrap_err();

        assert!(matches!(err, SetupError::InstallFailed { exit_code: Some(2) }));
        assert_eq!(err.exit_code(), 1);

        let reporter = setup.reporter();
        assert_eq!(reporter.texts(OutputKind::Title), vec!["Installation Failed"]);
        assert_eq!(
            reporter.texts(OutputKind::Error),
            vec!["Please try running these commands manually."]
        );
        let lines = reporter.texts(OutputKind::Line);
        assert!(lines.contains(&"-- OR --".to_string()));
        assert!(lines.contains(&"* php artisan project:set <LICENSE KEY>".to_string()));
        assert!(lines.contains(&"* php artisan october:build --want=3.6.*".to_string()));
    }

    #[test]
    fn failed_outro_without_want_omits_flag() {
        let dir = TempDir::new().unwrap();
        let setup = builder(dir.path());
        setup.output_failed_outro(&VersionConstraint::any());
        let lines = setup.reporter().texts(OutputKind::Line);
        assert_eq!(lines.last().map(String::as_str), Some("* php artisan october:build"));
    }

    #[tokio::test]
    async fn inactive_project_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let setup = builder(dir.path());
        let gateway = FakeGateway {
            details: ProjectDetails {
                is_active: false,
                email: Some("dev@example.com".into()),
                project_id: Some("p-1".into()),
                ..Default::default()
            },
            requests: AtomicUsize::new(0),
        };

        let err = setup.setup_set_project(&gateway, "KEY-1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "License is unpaid or has expired. Please visit octobercms.com to obtain a license."
        );
        assert_eq!(gateway.requests.load(Ordering::SeqCst), 1);
        assert!(!dir.path().join("auth.json").exists());
        assert!(!dir.path().join("storage/cms/project.json").exists());
    }

    #[tokio::test]
    async fn empty_key_is_rejected_before_request() {
        let dir = TempDir::new().unwrap();
        let setup = builder(dir.path());
        let gateway = FakeGateway {
            details: ProjectDetails::default(),
            requests: AtomicUsize::new(0),
        };

        assert!(setup.setup_set_project(&gateway, "  ").await.is_err());
        assert_eq!(gateway.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn active_project_writes_auth_and_repository() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("auth.json"),
            r#"{"github-oauth":{"github.com":"token"}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("composer.json"),
            r#"{"name":"acme/site","repositories":[{"type":"vcs","url":"https://git.test/x"}]}"#,
        )
        .unwrap();

        let setup = builder(dir.path());
        let gateway = FakeGateway {
            details: ProjectDetails {
                is_active: true,
                email: Some("dev@example.com".into()),
                project_id: Some("p-1".into()),
                ..Default::default()
            },
            requests: AtomicUsize::new(0),
        };

        setup.setup_set_project(&gateway, "KEY-1").await.unwrap();

        let auth: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("auth.json")).unwrap())
                .unwrap();
        assert_eq!(auth["github-oauth"]["github.com"], "token");
        assert_eq!(auth["http-basic"]["gateway.test"]["username"], "dev@example.com");
        assert_eq!(auth["http-basic"]["gateway.test"]["password"], "p-1");

        let composer: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("composer.json")).unwrap())
                .unwrap();
        let repos = composer["repositories"].as_array().unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[1]["url"], "https://gateway.test");

        let project: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("storage/cms/project.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(project["project"], "p-1");
    }

    #[test]
    fn repository_is_keyed_by_name_in_object_form() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("composer.json");
        fs::write(&path, r#"{"repositories":{}}"#).unwrap();

        add_composer_repository(&path, "octobercms", "https://gateway.test").unwrap();
        add_composer_repository(&path, "octobercms", "https://gateway.test").unwrap();

        let composer: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(composer["repositories"]["octobercms"]["type"], "composer");
        assert_eq!(composer["repositories"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn outro_points_at_backend_url() {
        let dir = TempDir::new().unwrap();
        let setup = builder(dir.path());
        setup.output_outro();

        let reporter = setup.reporter();
        assert_eq!(
            reporter.texts(OutputKind::Comment),
            vec![
                "Please migrate the database with the following command",
                "Then, open the administration area at this URL"
            ]
        );
        let lines = reporter.texts(OutputKind::Line);
        assert!(lines.contains(&"* php artisan october:migrate".to_string()));
        assert!(lines.iter().any(|l| l.contains("INSTALLATION COMPLETE")));
        assert!(lines.last().unwrap().starts_with("* "));
    }

    #[test]
    fn intro_prints_banner() {
        let dir = TempDir::new().unwrap();
        let setup = builder(dir.path());
        setup.output_intro();
        assert_eq!(setup.reporter().texts(OutputKind::Line).len(), banner::INTRO.len());
    }

    #[test]
    fn non_interactive_right_after_start() {
        let dir = TempDir::new().unwrap();
        assert!(builder(dir.path()).non_interactive_check());
    }
}
