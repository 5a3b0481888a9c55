use ksni::{self, Icon, TrayService};
use std::sync::{Arc, Mutex};
use std::thread;
use tock_core::{Phase, Snapshot, Status};
use tracing::{debug, info, warn};

/// What the tray shows: the window-title mirror of the clock plus an icon per phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayState {
    pub title: String,
    pub status: Status,
    pub phase: Phase,
    pub ticking: bool,
}

impl Default for TrayState {
    fn default() -> Self {
        Self {
            title: tock_core::window_title(&tock_core::format_label(0)),
            status: Status::Ready,
            phase: Phase::Idle,
            ticking: false,
        }
    }
}

impl TrayState {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            title: snapshot.title(),
            status: snapshot.status,
            phase: snapshot.phase,
            ticking: snapshot.ticking,
        }
    }

    fn icon_name(&self) -> &'static str {
        match (self.phase, self.ticking) {
            (Phase::Counting, true) => "user-available",
            (Phase::BreakCounting, _) => "user-away",
            _ => "appointment-soon",
        }
    }
}

struct TockTray {
    state: Arc<Mutex<TrayState>>,
}

impl TockTray {
    fn current(&self) -> TrayState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }
}

impl ksni::Tray for TockTray {
    fn id(&self) -> String {
        "tock".to_string()
    }

    fn title(&self) -> String {
        self.current().title
    }

    fn icon_pixmap(&self) -> Vec<Icon> {
        vec![]
    }

    fn icon_name(&self) -> String {
        self.current().icon_name().to_string()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        let state = self.current();
        ksni::ToolTip {
            title: state.title.clone(),
            description: state.status.text().to_string(),
            icon_name: String::new(),
            icon_pixmap: vec![],
        }
    }
}

#[derive(Clone)]
pub struct TrayStateHandle {
    state: Arc<Mutex<TrayState>>,
    ksni_handle: ksni::Handle<TockTray>,
}

impl TrayStateHandle {
    pub fn set_snapshot(&self, snapshot: &Snapshot) {
        let new_state = TrayState::from_snapshot(snapshot);
        {
            let Ok(mut state) = self.state.lock() else {
                warn!("tray state lock poisoned");
                return;
            };
            if *state == new_state {
                return;
            }
            *state = new_state;
        }
        self.ksni_handle.update(|_| {});
    }
}

pub struct TrayHandle {
    ksni_handle: ksni::Handle<TockTray>,
    thread_handle: Option<thread::JoinHandle<()>>,
    pub state_handle: TrayStateHandle,
}

impl TrayHandle {
    pub fn shutdown(&mut self) {
        self.ksni_handle.shutdown();
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TrayHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub fn spawn_tray() -> Result<TrayHandle, String> {
    let state = Arc::new(Mutex::new(TrayState::default()));
    let tray = TockTray {
        state: Arc::clone(&state),
    };

    let service = TrayService::new(tray);
    let ksni_handle = service.handle();

    let state_handle = TrayStateHandle {
        state,
        ksni_handle: ksni_handle.clone(),
    };

    let thread_handle = thread::Builder::new()
        .name("tock-tray".to_string())
        .spawn(move || {
            info!("tray icon initialized");
            if let Err(error) = service.run() {
                warn!(%error, "tray service error");
            }
            debug!("tray service stopped");
        })
        .map_err(|error| format!("failed to spawn tray thread: {}", error))?;

    Ok(TrayHandle {
        ksni_handle,
        thread_handle: Some(thread_handle),
        state_handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tock_core::TimerSession;

    #[test]
    fn tray_mirrors_window_title() {
        let mut session = TimerSession::default();
        session.start();
        for _ in 0..65 {
            session.tick();
        }

        let state = TrayState::from_snapshot(&session.snapshot());

        assert_eq!(state.title, "01:05 - Tock");
        assert_eq!(state.status, Status::Focusing);
        assert_eq!(state.icon_name(), "user-available");
    }

    #[test]
    fn idle_tray_shows_zero_clock() {
        let state = TrayState::default();

        assert_eq!(state.title, "00:00 - Tock");
        assert_eq!(state.icon_name(), "appointment-soon");
    }
}
