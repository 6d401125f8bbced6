use std::path::{Path, PathBuf};

/// What placeholders in a build configuration expand to.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub active_file: Option<PathBuf>,
    pub project_path: PathBuf,
}

impl BuildContext {
    pub fn new(project_path: PathBuf) -> Self {
        Self {
            active_file: None,
            project_path,
        }
    }

    pub fn with_active_file(mut self, file: PathBuf) -> Self {
        self.active_file = Some(file);
        self
    }

    /// Value of the placeholder called `name`, or `None` if it is unknown.
    ///
    /// File placeholders are empty when there is no active file.
    fn value(&self, name: &str) -> Option<String> {
        let active = self.active_file.as_deref();
        let file_part = |f: fn(&Path) -> Option<String>| active.and_then(f).unwrap_or_default();

        let value = match name {
            "FILE_ACTIVE" => file_part(|p| Some(p.to_string_lossy().into_owned())),
            "FILE_ACTIVE_PATH" => file_part(|p| Some(p.parent()?.to_string_lossy().into_owned())),
            "FILE_ACTIVE_NAME" => {
                file_part(|p| Some(p.file_name()?.to_string_lossy().into_owned()))
            }
            "FILE_ACTIVE_NAME_BASE" => {
                file_part(|p| Some(p.file_stem()?.to_string_lossy().into_owned()))
            }
            "PROJECT_PATH" => self.project_path.to_string_lossy().into_owned(),
            _ => return None,
        };
        Some(value)
    }

    /// Replaces every known `{PLACEHOLDER}` in `template`.
    ///
    /// Expansion is a single left-to-right pass, so substituted values are
    /// never expanded again. Unknown placeholders are left as written.
    pub fn expand(&self, template: &str) -> String {
        let mut expanded = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            expanded.push_str(&rest[..open]);
            let tail = &rest[open..];

            let known = tail
                .find('}')
                .and_then(|close| Some((close, self.value(&tail[1..close])?)));

            match known {
                Some((close, value)) => {
                    expanded.push_str(&value);
                    rest = &tail[close + 1..];
                }
                None => {
                    expanded.push('{');
                    rest = &tail[1..];
                }
            }
        }
        expanded.push_str(rest);
        expanded
    }
}
