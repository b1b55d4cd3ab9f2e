//! Normalized notifier options
//!
//! Maps caller arguments onto the option set the native notifier understands.
//! Optional fields are only populated when their condition holds; everything
//! else is left out rather than passed as an empty value.

use std::path::{Component, Path, PathBuf};

use super::request::{NotificationRequest, SimpleNotificationRequest, Sound};

/// Timeout used when the caller gives none (or zero)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolved sound
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSetting {
    /// Play the system default sound
    SystemDefault,
    /// No sound
    Silent,
    /// One of the named platform sounds
    Named(String),
}

/// Option set handed to the native notifier. Built only through [`OptionsBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOptions {
    title: String,
    message: String,
    subtitle: Option<String>,
    sound: SoundSetting,
    icon: Option<PathBuf>,
    content_image: Option<PathBuf>,
    wait: bool,
    timeout_secs: u64,
    close_label: Option<String>,
    actions: Vec<String>,
    reply: bool,
}

impl NormalizedOptions {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn sound(&self) -> &SoundSetting {
        &self.sound
    }

    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    pub fn content_image(&self) -> Option<&Path> {
        self.content_image.as_deref()
    }

    pub fn wait(&self) -> bool {
        self.wait
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn close_label(&self) -> Option<&str> {
        self.close_label.as_deref()
    }

    /// Empty when no actions were requested
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn reply(&self) -> bool {
        self.reply
    }
}

/// Builder for [`NormalizedOptions`]
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    options: NormalizedOptions,
}

impl OptionsBuilder {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            options: NormalizedOptions {
                title: title.into(),
                message: message.into(),
                subtitle: None,
                sound: SoundSetting::SystemDefault,
                icon: None,
                content_image: None,
                wait: false,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                close_label: None,
                actions: Vec::new(),
                reply: false,
            },
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.options.subtitle = Some(subtitle.into());
        self
    }

    pub fn sound(mut self, sound: SoundSetting) -> Self {
        self.options.sound = sound;
        self
    }

    pub fn icon(mut self, icon: PathBuf) -> Self {
        self.options.icon = Some(icon);
        self
    }

    pub fn content_image(mut self, image: PathBuf) -> Self {
        self.options.content_image = Some(image);
        self
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.options.wait = wait;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.options.timeout_secs = secs;
        self
    }

    pub fn close_label(mut self, label: impl Into<String>) -> Self {
        self.options.close_label = Some(label.into());
        self
    }

    pub fn actions(mut self, actions: Vec<String>) -> Self {
        self.options.actions = actions;
        self
    }

    pub fn reply(mut self, reply: bool) -> Self {
        self.options.reply = reply;
        self
    }

    pub fn build(self) -> NormalizedOptions {
        self.options
    }
}

/// "none" → silent, "default"/absent → system default, any other name passes through.
pub fn resolve_sound(sound: Option<Sound>) -> SoundSetting {
    match sound {
        None | Some(Sound::SystemDefault) => SoundSetting::SystemDefault,
        Some(Sound::Silent) => SoundSetting::Silent,
        Some(named) => SoundSetting::Named(named.as_str().to_string()),
    }
}

/// Zero, negative and non-finite timeouts fall back to the default.
pub fn resolve_timeout(timeout: Option<f64>) -> u64 {
    match timeout {
        Some(secs) if secs.is_finite() && secs > 0.0 => secs.ceil() as u64,
        _ => DEFAULT_TIMEOUT_SECS,
    }
}

/// Resolve `raw` against `cwd` lexically, the way a shell would, without touching the filesystem.
pub fn resolve_path(cwd: &Path, raw: &str) -> PathBuf {
    let joined = cwd.join(raw);
    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Normalize `send_notification` arguments. Relative image paths resolve against `cwd`.
pub fn normalize(request: &NotificationRequest, cwd: &Path) -> NormalizedOptions {
    let mut builder = OptionsBuilder::new(
        request.title.clone(),
        request.message.clone().unwrap_or_default(),
    )
    .sound(resolve_sound(request.sound))
    .wait(request.wait.unwrap_or(false))
    .timeout_secs(resolve_timeout(request.timeout));

    if let Some(subtitle) = non_empty(&request.subtitle) {
        builder = builder.subtitle(subtitle);
    }
    if let Some(icon) = non_empty(&request.icon) {
        builder = builder.icon(resolve_path(cwd, icon));
    }
    if let Some(image) = non_empty(&request.content_image) {
        builder = builder.content_image(resolve_path(cwd, image));
    }
    if let Some(label) = non_empty(&request.close_label) {
        builder = builder.close_label(label);
    }
    if let Some(actions) = request.actions.as_ref().filter(|a| !a.is_empty()) {
        builder = builder.actions(actions.clone());
    }
    if request.reply.unwrap_or(false) {
        builder = builder.reply(true);
    }

    builder.build()
}

/// Normalize `send_simple_notification` arguments.
pub fn normalize_simple(request: &SimpleNotificationRequest) -> NormalizedOptions {
    let sound = if request.sound == Some(false) {
        SoundSetting::Silent
    } else {
        SoundSetting::SystemDefault
    };

    OptionsBuilder::new(request.title.clone(), request.message.clone().unwrap_or_default())
        .sound(sound)
        .build()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_resolution() {
        assert_eq!(resolve_sound(None), SoundSetting::SystemDefault);
        assert_eq!(resolve_sound(Some(Sound::SystemDefault)), SoundSetting::SystemDefault);
        assert_eq!(resolve_sound(Some(Sound::Silent)), SoundSetting::Silent);
        for sound in Sound::NAMED {
            assert_eq!(
                resolve_sound(Some(sound)),
                SoundSetting::Named(sound.as_str().to_string())
            );
        }
    }

    #[test]
    fn test_timeout_defaults() {
        assert_eq!(resolve_timeout(None), 10);
        assert_eq!(resolve_timeout(Some(0.0)), 10);
        assert_eq!(resolve_timeout(Some(-3.0)), 10);
        assert_eq!(resolve_timeout(Some(f64::NAN)), 10);
        assert_eq!(resolve_timeout(Some(25.0)), 25);
        assert_eq!(resolve_timeout(Some(2.5)), 3);
    }

    #[test]
    fn test_resolve_path_against_any_cwd() {
        for cwd in ["/", "/tmp", "/Users/me/project", "/a/b/c/"] {
            let cwd = Path::new(cwd);
            assert_eq!(resolve_path(cwd, "./img.png"), cwd.join("img.png"));
        }
        assert_eq!(
            resolve_path(Path::new("/Users/me/project"), "../assets/icon.png"),
            PathBuf::from("/Users/me/assets/icon.png")
        );
        assert_eq!(
            resolve_path(Path::new("/tmp"), "/opt/icon.png"),
            PathBuf::from("/opt/icon.png")
        );
    }

    #[test]
    fn test_normalize_minimal_request() {
        let options = normalize(&NotificationRequest::new("Ping"), Path::new("/tmp"));

        assert_eq!(options.title(), "Ping");
        assert_eq!(options.message(), "");
        assert_eq!(options.sound(), &SoundSetting::SystemDefault);
        assert_eq!(options.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert!(!options.wait());
        assert!(options.subtitle().is_none());
        assert!(options.icon().is_none());
        assert!(options.content_image().is_none());
        assert!(options.close_label().is_none());
        assert!(options.actions().is_empty());
        assert!(!options.reply());
    }

    #[test]
    fn test_normalize_omits_empty_optionals() {
        let request = NotificationRequest {
            subtitle: Some(String::new()),
            icon: Some(String::new()),
            close_label: Some(String::new()),
            actions: Some(Vec::new()),
            reply: Some(false),
            ..NotificationRequest::new("x")
        };
        let options = normalize(&request, Path::new("/tmp"));

        assert!(options.subtitle().is_none());
        assert!(options.icon().is_none());
        assert!(options.close_label().is_none());
        assert!(options.actions().is_empty());
        assert!(!options.reply());
    }

    #[test]
    fn test_normalize_full_request() {
        let request = NotificationRequest {
            message: Some("Done".to_string()),
            subtitle: Some("CI".to_string()),
            sound: Some(Sound::Hero),
            icon: Some("./icon.png".to_string()),
            content_image: Some("shots/final.png".to_string()),
            wait: Some(true),
            timeout: Some(30.0),
            close_label: Some("Dismiss".to_string()),
            actions: Some(vec!["Open".to_string(), "Later".to_string()]),
            reply: Some(true),
            ..NotificationRequest::new("Build")
        };
        let options = normalize(&request, Path::new("/work"));

        assert_eq!(options.message(), "Done");
        assert_eq!(options.subtitle(), Some("CI"));
        assert_eq!(options.sound(), &SoundSetting::Named("Hero".to_string()));
        assert_eq!(options.icon(), Some(Path::new("/work/icon.png")));
        assert_eq!(options.content_image(), Some(Path::new("/work/shots/final.png")));
        assert!(options.wait());
        assert_eq!(options.timeout_secs(), 30);
        assert_eq!(options.close_label(), Some("Dismiss"));
        assert_eq!(options.actions(), ["Open".to_string(), "Later".to_string()]);
        assert!(options.reply());
    }

    #[test]
    fn test_normalize_simple_sound_flag() {
        let loud = SimpleNotificationRequest {
            title: "Ping".to_string(),
            message: None,
            sound: None,
        };
        let options = normalize_simple(&loud);
        assert_eq!(options.sound(), &SoundSetting::SystemDefault);
        assert_eq!(options.message(), "");

        let quiet = SimpleNotificationRequest {
            sound: Some(false),
            ..loud.clone()
        };
        let options = normalize_simple(&quiet);
        assert_eq!(options.sound(), &SoundSetting::Silent);
        assert_eq!(options.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert!(!options.wait());
    }
}
