use std::borrow::Cow;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use jrun_classpath::{
    resolve_artifact, resolve_classpath, Artifact, ArtifactRequest, ClasspathRequest,
};
use jrun_config::{JrunConfig, LauncherConfig};
use jrun_jdk::{JavaInstallation, JdkDiscoveryError};
use jrun_memory::{CgroupFs, ContainerLimits};
use jrun_options::{DerivedOptions, JvmOptionSettings};
use serde::Serialize;

/// Launcher configuration together with the filesystem it probes.
#[derive(Debug)]
pub struct Launcher {
    config: LauncherConfig,
    file_config: JrunConfig,
    fs: CgroupFs,
    path_var: Option<OsString>,
}

impl Launcher {
    /// Read the environment and the optional `jrun.toml`, probing the real
    /// `/proc` and `/sys/fs/cgroup`.
    pub fn from_env() -> Result<Self> {
        let config = LauncherConfig::from_env().context("invalid launcher environment")?;
        Self::new(config, CgroupFs::host())
    }

    pub fn new(config: LauncherConfig, fs: CgroupFs) -> Result<Self> {
        let file_config = config
            .load_file_config()
            .context("invalid jrun config file")?;
        Ok(Self {
            config,
            file_config,
            fs,
            path_var: std::env::var_os("PATH"),
        })
    }

    /// Search `path_var` instead of the process `PATH` for `java`.
    pub fn with_path_var(mut self, path_var: Option<OsString>) -> Self {
        self.path_var = path_var;
        self
    }

    /// Install the subscriber configured in `[logging]` and report what was
    /// loaded.
    pub fn init_tracing(&self) {
        jrun_config::init_tracing(&self.file_config.logging);
        tracing::debug!(
            target: "jrun.cli",
            config = ?self.config,
            config_file = ?self.config.discover_config_path(),
            "loaded launcher configuration"
        );
    }

    pub fn limits(&self) -> ContainerLimits {
        ContainerLimits::detect(&self.fs, self.config.limit_overrides())
    }

    fn discover_java(&self) -> Result<JavaInstallation, JdkDiscoveryError> {
        JavaInstallation::discover(self.config.java_home.as_deref(), self.path_var.as_deref())
    }

    /// The installed major version, consulted only when `JAVA_MAJOR_VERSION`
    /// is unset. Falls back to the `JAVA_HOME` release file when no `java`
    /// executable was found.
    fn detected_major_version(&self, java: Option<&JavaInstallation>) -> Option<u32> {
        if self.config.java_major_version.is_some() {
            return None;
        }
        java.and_then(JavaInstallation::major_version).or_else(|| {
            self.config
                .java_home
                .as_deref()
                .and_then(jrun_jdk::read_release_major_version)
        })
    }

    /// Derived options for `jrun options`, identical to the ones `jrun run`
    /// passes. A missing `java` is not an error here.
    pub fn options(&self) -> Result<OptionsReport> {
        let java = match self.discover_java() {
            Ok(java) => Some(java),
            Err(err) => {
                tracing::debug!(target: "jrun.cli", error = %err, "no java executable found");
                None
            }
        };
        let settings = self.option_settings(self.detected_major_version(java.as_ref()))?;
        Ok(OptionsReport::new(&settings, self.limits()))
    }

    /// Resolve everything needed to start the JVM.
    pub fn plan(&self, app_args: Vec<String>) -> Result<LaunchPlan> {
        let java = self.discover_java()?;
        let settings = self.option_settings(self.detected_major_version(Some(&java)))?;
        let jvm_options = settings.jvm_options(&self.limits());

        let artifact = resolve_artifact(&ArtifactRequest {
            app_dir: &self.config.app_dir,
            app_jar: self.config.app_jar.as_deref(),
            main_class: self.config.main_class.as_deref(),
        })?;
        let classpath = match &artifact {
            Artifact::MainClass { .. } => Some(resolve_classpath(&ClasspathRequest {
                app_dir: &self.config.app_dir,
                lib_dir: &self.config.lib_dir,
                explicit: self.config.classpath.as_deref(),
            })?),
            Artifact::Jar { .. } => None,
        };

        let plan = LaunchPlan {
            java: java.java().to_path_buf(),
            arg0: self.config.app_name.clone(),
            jvm_options,
            artifact,
            classpath,
            app_args,
        };
        tracing::info!(
            target: "jrun.cli",
            java = %plan.java.display(),
            java_home = ?java.home(),
            jvm_options = %plan.jvm_options,
            artifact = ?plan.artifact,
            "prepared launch"
        );
        Ok(plan)
    }

    fn option_settings(&self, detected_major_version: Option<u32>) -> Result<JvmOptionSettings> {
        Ok(self
            .config
            .option_settings(&self.file_config, detected_major_version)?)
    }
}

/// The assembled option string along with the groups it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionsReport {
    pub options: String,
    pub derived: DerivedOptions,
    pub limits: ContainerLimits,
}

impl OptionsReport {
    pub fn new(settings: &JvmOptionSettings, limits: ContainerLimits) -> Self {
        let derived = DerivedOptions::derive(settings, &limits);
        Self {
            options: derived.assemble(&settings.user_options),
            derived,
            limits,
        }
    }
}

/// A fully resolved JVM invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub java: PathBuf,
    /// Process name for the JVM (`JAVA_APP_NAME`).
    pub arg0: Option<String>,
    pub jvm_options: String,
    pub artifact: Artifact,
    /// Set for main-class launches only.
    pub classpath: Option<String>,
    pub app_args: Vec<String>,
}

impl LaunchPlan {
    /// Arguments after the executable: options, artifact, application args.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self
            .jvm_options
            .split_whitespace()
            .map(OsString::from)
            .collect();
        match &self.artifact {
            Artifact::Jar { path } => {
                args.push("-jar".into());
                args.push(path.into());
            }
            Artifact::MainClass { name } => {
                if let Some(classpath) = &self.classpath {
                    args.push("-cp".into());
                    args.push(classpath.into());
                }
                args.push(name.into());
            }
        }
        args.extend(self.app_args.iter().map(OsString::from));
        args
    }

    /// The full argument vector, executable first.
    pub fn argv(&self) -> Vec<OsString> {
        std::iter::once(self.java.clone().into_os_string())
            .chain(self.args())
            .collect()
    }

    /// [`LaunchPlan::argv`] as a single shell-quoted line.
    pub fn display_command(&self) -> String {
        self.argv()
            .iter()
            .map(|arg| shell_quote(&arg.to_string_lossy()).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.java);
        command.args(self.args());
        command
    }

    /// Replace the current process with the JVM. Only returns on failure.
    #[cfg(unix)]
    pub fn exec(&self) -> Result<i32> {
        use std::os::unix::process::CommandExt;

        let mut command = self.command();
        if let Some(name) = &self.arg0 {
            command.arg0(name);
        }
        let err = command.exec();
        Err(anyhow::Error::new(err).context(format!("failed to exec {}", self.java.display())))
    }

    /// Run the JVM as a child and report its exit code.
    #[cfg(not(unix))]
    pub fn exec(&self) -> Result<i32> {
        let status = self
            .command()
            .status()
            .with_context(|| format!("failed to run {}", self.java.display()))?;
        Ok(status.code().unwrap_or(1))
    }
}

fn shell_quote(token: &str) -> Cow<'_, str> {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if plain {
        Cow::Borrowed(token)
    } else {
        Cow::Owned(format!("'{}'", token.replace('\'', r"'\''")))
    }
}
