//! Interactive terminal front-end.
//!
//! Runs the session gate, the sign-in prompt when the gate says no, and then
//! the settings wizard. Each wizard mount reads the stored settings once and
//! owns a sync worker until it is left; leaving flushes pending edits.
//!
//! Reader and writer are generic so the whole flow can be driven from a byte
//! buffer in tests.

pub mod input;
pub mod render;

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::time::Instant;

use crate::actions;
use crate::api::ReportApi;
use crate::banner::BannerSlot;
use crate::error::ConsoleError;
use crate::session::{self, GateState, SessionGate};
use crate::sync::SyncHandle;
use crate::types::{Config, Identity, Settings};
use crate::wizard::{Step, Wizard};

use input::Command;

/// How a wizard mount ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Quit,
    SignedOut,
    SessionLost,
}

pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
    api: Arc<dyn ReportApi>,
    config: Config,
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, out: W, api: Arc<dyn ReportApi>, config: Config) -> Self {
        Self {
            lines: reader.lines(),
            out,
            api,
            config,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until the user quits or input ends.
    pub async fn run(&mut self) -> Result<(), ConsoleError> {
        loop {
            let Some(identity) = self.sign_in().await? else {
                return Ok(());
            };
            match self.wizard(identity).await? {
                Exit::Quit => return Ok(()),
                Exit::SignedOut => self.say("Signed out.").await?,
                Exit::SessionLost => self.say("Your session has ended; please sign in again.").await?,
            }
        }
    }

    async fn say(&mut self, text: &str) -> Result<(), ConsoleError> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn prompt(&mut self, label: &str) -> Result<Option<String>, ConsoleError> {
        self.out.write_all(label.as_bytes()).await?;
        self.out.flush().await?;
        Ok(self.lines.next_line().await?)
    }

    /// Gate first; fall back to the credential prompt. `None` when input ends.
    async fn sign_in(&mut self) -> Result<Option<Identity>, ConsoleError> {
        let mut gate = SessionGate::new();
        if let GateState::Authenticated(identity) = gate.check(self.api.as_ref()).await {
            return Ok(Some(identity.clone()));
        }

        self.say("Sign in to the report console.").await?;
        loop {
            let Some(email) = self.prompt("Email: ").await? else {
                return Ok(None);
            };
            let Some(password) = self.prompt("Password: ").await? else {
                return Ok(None);
            };

            if let Err(e) = session::login(self.api.as_ref(), &email, &password).await {
                self.say(&e.to_string()).await?;
                continue;
            }

            let mut gate = SessionGate::new();
            match gate.check(self.api.as_ref()).await {
                GateState::Authenticated(identity) => return Ok(Some(identity.clone())),
                _ => self.say("Signed in, but the session was not accepted.").await?,
            }
        }
    }

    async fn draw(
        &mut self,
        wizard: &Wizard,
        identity: &Identity,
        banner: &BannerSlot,
        note: Option<&str>,
    ) -> Result<(), ConsoleError> {
        let screen = render::screen(wizard, identity, banner.current(), note, chrono::Utc::now());
        self.out.write_all(screen.as_bytes()).await?;
        self.out.write_all(b"> ").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn wizard(&mut self, identity: Identity) -> Result<Exit, ConsoleError> {
        let settings = match self.api.get_settings().await {
            Ok(settings) => settings,
            Err(e) if e.is_unauthorized() => return Ok(Exit::SessionLost),
            Err(e) => {
                log::warn!("Failed to load settings, starting empty: {}", e);
                Settings::default()
            }
        };

        let mut wizard = Wizard::from_settings(&settings, self.config.default_domain);
        let sync = SyncHandle::spawn(
            self.api.clone(),
            Duration::from_millis(self.config.sync_debounce_ms),
            Some(settings),
        );
        let mut banner = BannerSlot::new(Duration::from_secs(self.config.banner_seconds));
        let mut note: Option<String> = None;

        let exit = loop {
            self.draw(&wizard, &identity, &banner, note.as_deref()).await?;
            note = None;

            let line = tokio::select! {
                line = self.lines.next_line() => line?,
                _ = until(banner.deadline()) => {
                    banner.expire(Instant::now());
                    continue;
                }
            };
            let Some(line) = line else {
                break Exit::Quit;
            };

            let command = match input::parse(&line, &wizard) {
                Ok(command) => command,
                Err(message) => {
                    note = Some(message);
                    continue;
                }
            };

            match command {
                Command::Edit(messages) => {
                    let before = wizard.step;
                    let mut changed = false;
                    for message in messages {
                        changed |= wizard.update(message);
                    }
                    if changed {
                        if let Some(settings) = wizard.syncable_settings() {
                            sync.push(settings);
                        }
                    }
                    if wizard.step == Step::SendNow && before != Step::SendNow {
                        // Outcome is logged by the worker.
                        let _ = sync.flush().await;
                    }
                }
                Command::Save => {
                    note = Some(match sync.flush().await {
                        Ok(revision) => format!("Saved (revision {}).", revision),
                        Err(e) => format!("{} {}", e, e.recovery_suggestion()),
                    });
                }
                Command::Send => {
                    let _ = sync.flush().await;
                    let notice = actions::send_now(self.api.as_ref()).await;
                    banner.show(notice.severity, notice.message, Instant::now());
                }
                Command::Export => {
                    let notice = actions::export_ppt(self.api.as_ref()).await;
                    banner.show(notice.severity, notice.message, Instant::now());
                }
                Command::Schedule => {
                    let _ = sync.flush().await;
                    let notice = actions::schedule_email(self.api.as_ref()).await;
                    banner.show(notice.severity, notice.message, Instant::now());
                }
                Command::Dismiss => banner.dismiss(),
                Command::Help => note = Some(input::HELP.to_string()),
                Command::Logout => break Exit::SignedOut,
                Command::Quit => break Exit::Quit,
                Command::Redraw => {}
            }
        };

        if let Err(e) = sync.shutdown().await {
            log::warn!("Pending settings were not saved on exit: {}", e);
        }
        if exit == Exit::SignedOut {
            if let Err(e) = session::logout(self.api.as_ref()).await {
                log::warn!("Failed to clear local session: {}", e);
            }
        }
        Ok(exit)
    }
}
