use crate::domain::model::{LangVars, ProjectDetails};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 指令輸出
pub trait Reporter: Send + Sync {
    fn line(&self, text: &str);

    fn lines(&self, text: &[&str]) {
        for line in text {
            self.line(line);
        }
    }

    fn comment(&self, text: &str);
    fn title(&self, text: &str);
    fn error(&self, text: &str);

    /// 未經處理的串流輸出 (composer)
    fn raw(&self, text: &str);
}

pub trait Translator: Send + Sync {
    fn get(&self, key: &str, vars: &LangVars) -> String;
}

#[async_trait]
pub trait ComposerRunner: Send + Sync {
    /// 執行 `require`，回傳子行程結束代碼
    async fn require(
        &mut self,
        packages: &[String],
        on_output: &(dyn for<'a> Fn(&'a str) + Send + Sync),
    ) -> Result<i32>;
}

#[async_trait]
pub trait LicenseClient: Send + Sync {
    async fn request_project_details(&self, license_key: &str) -> Result<ProjectDetails>;
    fn composer_url(&self, with_protocol: bool) -> String;
}
