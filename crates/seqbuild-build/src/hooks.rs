use crate::BuildConfig;

/// Callbacks run around every build attempt.
pub trait BuildHooks {
    /// Called before the process is spawned.
    fn pre_build(&self, config: &BuildConfig);

    /// Called after the process has exited.
    fn post_build(&self, config: &BuildConfig, success: bool);
}

/// Default hooks: one log line before and one after the build.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHooks;

impl LoggingHooks {
    pub fn pre_build_message(config: &BuildConfig) -> String {
        format!("Setting up for build '{}'", config.name)
    }

    pub fn post_build_message(config: &BuildConfig, success: bool) -> String {
        let status = if success { "succeeded" } else { "failed" };
        format!("Cleanup after build '{}' ({})", config.name, status)
    }
}

impl BuildHooks for LoggingHooks {
    fn pre_build(&self, config: &BuildConfig) {
        log::info!("{}", Self::pre_build_message(config));
    }

    fn post_build(&self, config: &BuildConfig, success: bool) {
        let message = Self::post_build_message(config, success);
        if success {
            log::info!("{}", message);
        } else {
            log::warn!("{}", message);
        }
    }
}
