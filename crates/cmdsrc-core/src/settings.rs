//! Settings domain types and validation.
//!
//! The host hands settings over as a flat key/value document. This module
//! turns that document into [`CommandSettings`] and derives the per-slot
//! termination policies from the single shared signal selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle triggers that can run a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Show,
    Hide,
    Activate,
    Deactivate,
    PreviewEnter,
    PreviewLeave,
}

impl Trigger {
    /// Settings key holding the command for this trigger.
    pub const fn setting_key(self) -> &'static str {
        match self {
            Self::Show => "cmd_show",
            Self::Hide => "cmd_hide",
            Self::Activate => "cmd_activate",
            Self::Deactivate => "cmd_deactivate",
            Self::PreviewEnter => "cmd_previewed",
            Self::PreviewLeave => "cmd_unpreviewed",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.setting_key())
    }
}

/// Named slots that keep their process killable by a later event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Started on show, terminated on hide.
    Show,
    /// Started on activate, terminated on deactivate.
    Activate,
    /// Started on entering preview, terminated on leaving it.
    Preview,
}

impl SlotKind {
    /// All slots, in a fixed order.
    pub const ALL: [Self; 3] = [Self::Show, Self::Activate, Self::Preview];

    /// Settings key of the enable flag for this slot.
    pub const fn enable_key(self) -> &'static str {
        match self {
            Self::Show => "sigen_show",
            Self::Activate => "sigen_activate",
            Self::Preview => "sigen_preview",
        }
    }
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
const USR_SIGNALS: (i32, i32) = (30, 31);

#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "dragonfly"
)))]
const USR_SIGNALS: (i32, i32) = (10, 12);

/// Signals selectable for terminating slot processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    Abrt,
    Int,
    Kill,
    #[default]
    Term,
    Hup,
    Usr1,
    Usr2,
}

impl TerminationSignal {
    /// Every selectable signal.
    pub const ALL: [Self; 7] = [
        Self::Abrt,
        Self::Int,
        Self::Kill,
        Self::Term,
        Self::Hup,
        Self::Usr1,
        Self::Usr2,
    ];

    /// POSIX signal number on the current target.
    pub const fn number(self) -> i32 {
        match self {
            Self::Hup => 1,
            Self::Int => 2,
            Self::Abrt => 6,
            Self::Kill => 9,
            Self::Term => 15,
            Self::Usr1 => USR_SIGNALS.0,
            Self::Usr2 => USR_SIGNALS.1,
        }
    }

    /// Look up the signal with the given number.
    pub fn from_number(number: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sig| i64::from(sig.number()) == number)
    }

    /// Short name without the `SIG` prefix.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Abrt => "ABRT",
            Self::Int => "INT",
            Self::Kill => "KILL",
            Self::Term => "TERM",
            Self::Hup => "HUP",
            Self::Usr1 => "USR1",
            Self::Usr2 => "USR2",
        }
    }
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SIG{}", self.name())
    }
}

/// Termination policy of one slot.
///
/// The three slots share one signal selection; only the enable flag is
/// independent per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPolicy {
    pub enabled: bool,
    pub signal: TerminationSignal,
}

impl SlotPolicy {
    /// Signal number to send on termination, or `None` when disabled.
    pub const fn armed_signal(self) -> Option<i32> {
        if self.enabled {
            Some(self.signal.number())
        } else {
            None
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Settings document is malformed: {0}")]
    InvalidDocument(String),

    #[error("Signal number {0} is not one of ABRT, INT, KILL, TERM, HUP, USR1, USR2")]
    UnknownSignal(i64),
}

/// Wire shape of the host settings document.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawSettings {
    cmd_show: String,
    cmd_hide: String,
    cmd_activate: String,
    cmd_deactivate: String,
    cmd_previewed: String,
    cmd_unpreviewed: String,
    sig: i64,
    sigen_show: bool,
    sigen_activate: bool,
    sigen_preview: bool,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            cmd_show: String::new(),
            cmd_hide: String::new(),
            cmd_activate: String::new(),
            cmd_deactivate: String::new(),
            cmd_previewed: String::new(),
            cmd_unpreviewed: String::new(),
            sig: i64::from(TerminationSignal::Term.number()),
            sigen_show: false,
            sigen_activate: false,
            sigen_preview: false,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Command source settings.
///
/// A `None` command makes its trigger a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSettings {
    pub cmd_show: Option<String>,
    pub cmd_hide: Option<String>,
    pub cmd_activate: Option<String>,
    pub cmd_deactivate: Option<String>,
    pub cmd_previewed: Option<String>,
    pub cmd_unpreviewed: Option<String>,

    /// Signal shared by all three slots.
    pub signal: TerminationSignal,
    pub sigen_show: bool,
    pub sigen_activate: bool,
    pub sigen_preview: bool,
}

impl CommandSettings {
    /// Settings as a freshly created source sees them.
    #[must_use]
    pub fn with_defaults() -> Self {
        #[cfg(not(windows))]
        {
            Self {
                cmd_show: Some("/bin/echo going to preview".to_string()),
                cmd_hide: Some("/bin/echo hiding from preview".to_string()),
                cmd_activate: Some("/bin/echo going to program".to_string()),
                cmd_deactivate: Some("/bin/echo retiring from program".to_string()),
                ..Self::default()
            }
        }

        #[cfg(windows)]
        {
            Self::default()
        }
    }

    /// Parse the host key/value document.
    ///
    /// Missing keys take their defaults; empty command strings are unset.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, SettingsError> {
        let raw = RawSettings::deserialize(value)
            .map_err(|e| SettingsError::InvalidDocument(e.to_string()))?;

        let signal =
            TerminationSignal::from_number(raw.sig).ok_or(SettingsError::UnknownSignal(raw.sig))?;

        Ok(Self {
            cmd_show: non_empty(raw.cmd_show),
            cmd_hide: non_empty(raw.cmd_hide),
            cmd_activate: non_empty(raw.cmd_activate),
            cmd_deactivate: non_empty(raw.cmd_deactivate),
            cmd_previewed: non_empty(raw.cmd_previewed),
            cmd_unpreviewed: non_empty(raw.cmd_unpreviewed),
            signal,
            sigen_show: raw.sigen_show,
            sigen_activate: raw.sigen_activate,
            sigen_preview: raw.sigen_preview,
        })
    }

    /// Command configured for `trigger`, if any.
    pub fn command(&self, trigger: Trigger) -> Option<&str> {
        let cmd = match trigger {
            Trigger::Show => &self.cmd_show,
            Trigger::Hide => &self.cmd_hide,
            Trigger::Activate => &self.cmd_activate,
            Trigger::Deactivate => &self.cmd_deactivate,
            Trigger::PreviewEnter => &self.cmd_previewed,
            Trigger::PreviewLeave => &self.cmd_unpreviewed,
        };
        cmd.as_deref()
    }

    /// Termination policy of `slot`.
    pub const fn slot_policy(&self, slot: SlotKind) -> SlotPolicy {
        let enabled = match slot {
            SlotKind::Show => self.sigen_show,
            SlotKind::Activate => self.sigen_activate,
            SlotKind::Preview => self.sigen_preview,
        };
        SlotPolicy {
            enabled,
            signal: self.signal,
        }
    }
}
