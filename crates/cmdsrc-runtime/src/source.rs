//! Command source lifecycle state machine.
//!
//! A `CommandSource` receives visibility, activation and frontend events
//! from the host and turns them into shell command launches. The opening
//! half of each lifecycle pair launches into a named slot so the closing
//! half can signal it; everything else is fire-and-forget.
//!
//! All methods run on the host's callback thread and never block.

use cmdsrc_core::{
    CommandLauncher, CommandSettings, FrontendEvent, FrontendPort, LaunchContext, SlotKind,
    SourceId, Trigger,
};
use tracing::{debug, info, warn};

use crate::preview::{PreviewDetector, PreviewTransition};
use crate::process::{ProcessRegistry, ProcessSlot, ShellLauncher};

/// What [`CommandSource::destroy`] did with the processes it still held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Teardown {
    /// Children that had already exited and were collected.
    pub reaped: usize,
    /// Children still running whose handles were released.
    pub abandoned: usize,
}

/// One command source element and the processes it owns.
pub struct CommandSource {
    id: SourceId,
    settings: CommandSettings,
    launcher: Box<dyn CommandLauncher>,
    is_shown: bool,
    preview: PreviewDetector,
    show_slot: ProcessSlot,
    activate_slot: ProcessSlot,
    preview_slot: ProcessSlot,
    untracked: ProcessRegistry,
}

impl CommandSource {
    /// Create a source that launches through `launcher`.
    pub fn new(id: SourceId, settings: CommandSettings, launcher: Box<dyn CommandLauncher>) -> Self {
        Self {
            id,
            settings,
            launcher,
            is_shown: false,
            preview: PreviewDetector::new(),
            show_slot: ProcessSlot::new(SlotKind::Show),
            activate_slot: ProcessSlot::new(SlotKind::Activate),
            preview_slot: ProcessSlot::new(SlotKind::Preview),
            untracked: ProcessRegistry::new(),
        }
    }

    /// Create a source that launches through the platform shell.
    pub fn with_shell(id: SourceId, settings: CommandSettings) -> Self {
        Self::new(id, settings, Box::new(ShellLauncher::new()))
    }

    pub const fn id(&self) -> SourceId {
        self.id
    }

    pub const fn is_shown(&self) -> bool {
        self.is_shown
    }

    pub const fn is_preview(&self) -> bool {
        self.preview.is_preview()
    }

    pub const fn slot(&self, kind: SlotKind) -> &ProcessSlot {
        match kind {
            SlotKind::Show => &self.show_slot,
            SlotKind::Activate => &self.activate_slot,
            SlotKind::Preview => &self.preview_slot,
        }
    }

    pub const fn untracked(&self) -> &ProcessRegistry {
        &self.untracked
    }

    /// Apply new settings.
    ///
    /// Running slot processes pick up the new termination policy.
    pub fn update(&mut self, settings: CommandSettings) {
        for kind in SlotKind::ALL {
            let signal = settings.slot_policy(kind).armed_signal();
            self.slot_mut(kind).rearm(signal);
        }
        self.settings = settings;
        debug!(source = %self.id, "Settings updated");
    }

    /// The element became visible: run the show command into its slot and
    /// start listening for frontend notifications.
    pub fn show(&mut self, frontend: &mut dyn FrontendPort) {
        debug!(source = %self.id, "show");
        self.launch_into_slot(Trigger::Show, SlotKind::Show, &*frontend);
        self.refresh_preview(&*frontend);
        if !self.is_shown {
            frontend.subscribe(self.id);
        }
        self.is_shown = true;
    }

    /// The element was hidden: run the hide command and stop the show slot
    /// process if a signal is armed for it.
    pub fn hide(&mut self, frontend: &mut dyn FrontendPort) {
        debug!(source = %self.id, "hide");
        self.launch_untracked(Trigger::Hide, &*frontend);
        self.show_slot.terminate_if_armed();
        self.refresh_preview(&*frontend);
        if self.is_shown {
            frontend.unsubscribe(self.id);
        }
        self.is_shown = false;
    }

    /// The element went live on program output.
    pub fn activate(&mut self, frontend: &dyn FrontendPort) {
        debug!(source = %self.id, "activate");
        self.launch_into_slot(Trigger::Activate, SlotKind::Activate, frontend);
    }

    /// The element left program output: run the deactivate command and
    /// stop the activate slot process if armed.
    pub fn deactivate(&mut self, frontend: &dyn FrontendPort) {
        debug!(source = %self.id, "deactivate");
        self.launch_untracked(Trigger::Deactivate, frontend);
        self.activate_slot.terminate_if_armed();
    }

    /// Handle a frontend notification delivered through the host registry.
    pub fn handle_frontend_event(&mut self, event: FrontendEvent, frontend: &dyn FrontendPort) {
        if !self.is_shown || !event.affects_preview() {
            return;
        }
        debug!(source = %self.id, ?event, "Frontend event");
        self.refresh_preview(frontend);
    }

    /// Periodic poll: reap exited children. Returns how many were collected.
    pub fn tick(&mut self) -> usize {
        let mut reaped = 0;
        for kind in SlotKind::ALL {
            if self.slot_mut(kind).poll() {
                reaped += 1;
            }
        }
        reaped + self.untracked.reap_all()
    }

    /// Tear the source down.
    ///
    /// Unsubscribes from the host first, then collects what has exited and
    /// abandons the rest. Abandoned children keep running.
    pub fn destroy(mut self, frontend: &mut dyn FrontendPort) -> Teardown {
        if self.is_shown {
            frontend.unsubscribe(self.id);
            self.is_shown = false;
        }

        for slot in [
            &mut self.show_slot,
            &mut self.activate_slot,
            &mut self.preview_slot,
        ] {
            if let Some(handle) = slot.take() {
                self.untracked.push(handle);
            }
        }

        let reaped = self.untracked.reap_all();
        let abandoned = self.untracked.abandon();
        if abandoned > 0 {
            info!(source = %self.id, reaped, abandoned, "Destroyed with processes still running");
        } else {
            debug!(source = %self.id, reaped, "Destroyed");
        }
        Teardown { reaped, abandoned }
    }

    fn slot_mut(&mut self, kind: SlotKind) -> &mut ProcessSlot {
        match kind {
            SlotKind::Show => &mut self.show_slot,
            SlotKind::Activate => &mut self.activate_slot,
            SlotKind::Preview => &mut self.preview_slot,
        }
    }

    fn refresh_preview(&mut self, frontend: &dyn FrontendPort) {
        match self.preview.recompute(self.id, frontend) {
            Some(PreviewTransition::Entered) => {
                debug!(source = %self.id, "Entered preview");
                self.launch_into_slot(Trigger::PreviewEnter, SlotKind::Preview, frontend);
            }
            Some(PreviewTransition::Left) => {
                debug!(source = %self.id, "Left preview");
                self.launch_untracked(Trigger::PreviewLeave, frontend);
                self.preview_slot.terminate_if_armed();
            }
            None => {}
        }
    }

    fn launch_into_slot(&mut self, trigger: Trigger, kind: SlotKind, frontend: &dyn FrontendPort) {
        let Some(command) = self.settings.command(trigger) else {
            return;
        };
        let context = LaunchContext::capture(self.id, frontend);
        let signal = self.settings.slot_policy(kind).armed_signal();
        let slot = match kind {
            SlotKind::Show => &mut self.show_slot,
            SlotKind::Activate => &mut self.activate_slot,
            SlotKind::Preview => &mut self.preview_slot,
        };

        match slot.launch(
            self.launcher.as_ref(),
            command,
            &context,
            signal,
            &mut self.untracked,
        ) {
            Ok(pid) => {
                info!(source = %self.id, %trigger, pid, slot = ?kind, "Launched command");
            }
            Err(e) => {
                warn!(source = %self.id, %trigger, error = %e, "Failed to launch command");
            }
        }
    }

    fn launch_untracked(&mut self, trigger: Trigger, frontend: &dyn FrontendPort) {
        let Some(command) = self.settings.command(trigger) else {
            return;
        };
        let context = LaunchContext::capture(self.id, frontend);

        match self.launcher.launch(command, &context) {
            Ok(handle) => {
                info!(source = %self.id, %trigger, pid = handle.pid(), "Launched command");
                self.untracked.push(handle);
            }
            Err(e) => {
                warn!(source = %self.id, %trigger, error = %e, "Failed to launch command");
            }
        }
    }
}

impl std::fmt::Debug for CommandSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSource")
            .field("id", &self.id)
            .field("is_shown", &self.is_shown)
            .field("preview", &self.preview)
            .field("show_slot", &self.show_slot)
            .field("activate_slot", &self.activate_slot)
            .field("preview_slot", &self.preview_slot)
            .field("untracked", &self.untracked)
            .finish_non_exhaustive()
    }
}
