use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::config::AppConfig;
use crate::fpl_fetch::FplSource;
use crate::session::load_session;
use crate::state::{Delta, ProviderCommand};
use crate::team_detail::load_team_detail;

/// Runs commands off the UI thread, one short-lived worker per command.
pub fn spawn_provider(
    source: Arc<dyn FplSource>,
    config: AppConfig,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for cmd in cmd_rx {
            let source = Arc::clone(&source);
            let tx = tx.clone();
            let config = config.clone();
            thread::spawn(move || run_command(source.as_ref(), &config, cmd, &tx));
        }
    })
}

pub fn run_command(
    source: &dyn FplSource,
    config: &AppConfig,
    cmd: ProviderCommand,
    tx: &Sender<Delta>,
) {
    match cmd {
        ProviderCommand::LoadSession {
            generation,
            gameweek,
        } => {
            let _ = tx.send(Delta::Log(match gameweek {
                Some(gw) => format!("[INFO] Loading league {} up to GW {gw}", config.league_id),
                None => format!("[INFO] Loading league {}", config.league_id),
            }));
            match load_session(
                source,
                config.league_id,
                config.fetch_parallelism,
                gameweek,
            ) {
                Ok(load) => {
                    for err in load.errors {
                        let _ = tx.send(Delta::Log(format!("[WARN] {err}")));
                    }
                    let _ = tx.send(Delta::SessionLoaded {
                        generation,
                        session: load.session,
                    });
                }
                Err(err) => {
                    let _ = tx.send(Delta::LoadFailed {
                        generation,
                        message: format!("{err:#}"),
                    });
                }
            }
        }
        ProviderCommand::FetchTeamDetail {
            request,
            team_id,
            session,
        } => match load_team_detail(source, &session, team_id) {
            Ok(fetch) => {
                for err in fetch.errors {
                    let _ = tx.send(Delta::Log(format!("[WARN] Team {team_id}: {err}")));
                }
                let _ = tx.send(Delta::TeamDetailLoaded {
                    request,
                    view: fetch.view,
                });
            }
            Err(err) => {
                let _ = tx.send(Delta::TeamDetailFailed {
                    request,
                    team_id,
                    message: format!("{err:#}"),
                });
            }
        },
    }
}
