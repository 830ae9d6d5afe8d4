use std::path::PathBuf;

use jrun_options::Ratio;

use crate::ConfigError;

/// Typed access to environment-style settings.
///
/// Empty or all-whitespace values count as unset, like an unset shell
/// variable.
pub(crate) struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub(crate) fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// The value as supplied, without trimming.
    pub(crate) fn raw(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|value| !value.trim().is_empty())
    }

    pub(crate) fn string(&self, name: &str) -> Option<String> {
        self.raw(name).map(|value| value.trim().to_string())
    }

    pub(crate) fn path(&self, name: &str) -> Option<PathBuf> {
        self.string(name).map(PathBuf::from)
    }

    /// Set, and not one of `false`/`0`/`no`/`off`.
    pub(crate) fn flag(&self, name: &str) -> bool {
        match self.string(name) {
            Some(value) => !matches!(
                value.to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            ),
            None => false,
        }
    }

    pub(crate) fn parsed<T>(
        &self,
        name: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<Option<T>, ConfigError> {
        let Some(value) = self.string(name) else {
            return Ok(None);
        };
        parse(&value)
            .map(Some)
            .map_err(|reason| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
                reason,
            })
    }

    pub(crate) fn ratio(&self, name: &str) -> Result<Option<Ratio>, ConfigError> {
        self.parsed(name, |value| {
            let percent = value
                .parse::<u64>()
                .map_err(|_| "expected a whole percentage".to_string())?;
            Ratio::new(percent).map_err(|err| err.to_string())
        })
    }
}
