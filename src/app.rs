use crate::cli::Args;
use crate::config::Config;
use crate::materialize::{MaterializeError, Materializer};
use crate::prompt::build_prompt;
use crate::provider::{self, GenerateRequest, Provider};
use anyhow::Context;
use std::env::VarError;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_PROVIDER: &str = "google";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Everything one run needs, resolved from flags, environment and config.
#[derive(Clone)]
pub struct Settings {
    pub model: String,
    pub provider: String,
    pub timeout: Duration,
    pub root: PathBuf,
    pub request: String,
    pub strict: bool,

    /// Gemini API key, if one was found.
    pub api_key: Option<String>,
    pub api_base: Option<String>,

    /// Canned reply for the stub provider.
    pub stub_response: Option<String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .field("root", &self.root)
            .field("request_len", &self.request.len())
            .field("strict", &self.strict)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

/// Read one environment variable. Unset is `Ok(None)`; a value that is not
/// valid UTF-8 is an error naming the variable.
pub fn env_var(key: &str) -> anyhow::Result<Option<String>> {
    match std::env::var(key) {
        Ok(v) => Ok(Some(v)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => anyhow::bail!("{key} is set but is not valid UTF-8"),
    }
}

impl Settings {
    pub fn resolve(args: Args, cfg: Option<&Config>) -> anyhow::Result<Self> {
        Self::resolve_with(args, cfg, env_var)
    }

    /// Precedence: flag, then environment, then config file, then default.
    pub fn resolve_with(
        args: Args,
        cfg: Option<&Config>,
        env: impl Fn(&str) -> anyhow::Result<Option<String>>,
    ) -> anyhow::Result<Self> {
        let request = if args.request.is_empty() {
            env("ISSUE_BODY")?.unwrap_or_default()
        } else {
            args.request.join(" ")
        };
        if request.trim().is_empty() {
            anyhow::bail!("No request provided. Pass it as an argument or set ISSUE_BODY.");
        }

        let model = args
            .model
            .or_else(|| cfg.and_then(|c| c.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let provider = args
            .provider
            .or_else(|| cfg.and_then(|c| c.provider.clone()))
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

        // clap already rejects a zero flag value.
        let timeout_secs = match args.timeout_secs {
            Some(secs) => secs,
            None => match cfg.and_then(|c| c.timeout_secs) {
                Some(0) => anyhow::bail!("timeout_secs in config.toml must be at least 1"),
                Some(secs) => secs,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        let api_key = env("GEMINI_API_KEY")?.or_else(|| cfg.and_then(|c| c.google.api_key.clone()));
        let api_base = env("GEMINI_API_BASE")?.or_else(|| cfg.and_then(|c| c.google.api_base.clone()));
        let stub_response = env("ISSUE_AGENT_STUB_RESPONSE")?;

        Ok(Self {
            model,
            provider,
            timeout: Duration::from_secs(timeout_secs),
            root: args.dir.unwrap_or_else(|| PathBuf::from(".")),
            request,
            strict: args.strict,
            api_key,
            api_base,
            stub_response,
        })
    }
}

pub fn build_provider(
    http: &reqwest::Client,
    settings: &Settings,
) -> anyhow::Result<Box<dyn Provider + Send + Sync>> {
    match settings.provider.as_str() {
        "google" => {
            #[cfg(feature = "google")]
            {
                let api_key = settings
                    .api_key
                    .clone()
                    .context("missing API key (set GEMINI_API_KEY or config.toml google.api_key)")?;

                let api_base = settings
                    .api_base
                    .as_deref()
                    .unwrap_or(provider::google::DEFAULT_API_BASE);

                let p = provider::google::GoogleProvider::with_api_base(http.clone(), api_key, api_base)?;
                Ok(Box::new(p))
            }
            #[cfg(not(feature = "google"))]
            {
                let _ = http;
                anyhow::bail!("google provider is not enabled in this build")
            }
        }
        "stub" => {
            let p = match &settings.stub_response {
                Some(reply) => provider::stub::StubProvider::new(reply.clone()),
                None => provider::stub::StubProvider::default(),
            };
            Ok(Box::new(p))
        }
        other => anyhow::bail!("unknown provider: {other}"),
    }
}

/// Send the prompt for `settings.request` and return the raw model text.
///
/// Bounded by `settings.timeout`; Ctrl-C abandons the call.
pub async fn generate(provider: &(dyn Provider + Send + Sync), settings: &Settings) -> anyhow::Result<String> {
    let req = GenerateRequest {
        model: settings.model.clone(),
        prompt: build_prompt(&settings.request),
    };
    tracing::info!(provider = provider.name(), model = %req.model, "requesting code from model");

    let call = tokio::time::timeout(settings.timeout, provider.generate(req));
    tokio::select! {
        res = call => match res {
            Ok(text) => text.with_context(|| format!("{} provider call failed", provider.name())),
            Err(_) => anyhow::bail!("model call timed out after {:?}", settings.timeout),
        },
        _ = tokio::signal::ctrl_c() => anyhow::bail!("interrupted while waiting for the model"),
    }
}

/// Write the files in `raw` and report to `out`.
///
/// Parse and filesystem failures are reported, not returned, unless
/// `settings.strict` is set.
pub fn materialize_and_report(settings: &Settings, raw: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let materializer = Materializer::new(&settings.root);

    let res = materializer.materialize(raw, |spec, _| {
        writeln!(out, "Success: Wrote to {}", spec.filename).ok();
    });

    match res {
        Ok(written) => {
            tracing::info!(count = written.len(), root = %materializer.root().display(), "materialized response");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, parse = e.is_parse(), "failed to materialize response");
            if let MaterializeError::Fs { written, .. } = &e {
                tracing::warn!(kept = written.len(), "files written before the failure were left in place");
            }
            writeln!(out, "Error: {e}").ok();
            writeln!(out, "The agent didn't return proper JSON. Raw response was:").ok();
            writeln!(out, "{raw}").ok();

            if settings.strict {
                return Err(anyhow::Error::new(e).context("response could not be materialized"));
            }
            Ok(())
        }
    }
}
