//! The room actor: one task per room, owning its [`GameState`].
//!
//! All mutation goes through [`RoomCommand`]s sent via a [`RoomHandle`].
//! The actor also drives the two clocks — the day/night phase timer and
//! the monster tick — from the same select loop, so game state is never
//! touched concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, Instant};

use tilefort_protocol::{
    AccountId, ClientEvent, Phase, PlayerId, RankingEntry, Recipient, RoomId,
    ServerEvent,
};
use tilefort_ranking::{Ranking, ScoreStore};

use crate::combat::ScoreAward;
use crate::state::GameState;
use crate::{RoomConfig, RoomError};

/// Command channel depth per room. Enough to absorb input bursts from a
/// full room without unbounded growth.
pub const DEFAULT_CHANNEL_SIZE: usize = 64;

/// The outbound half of a player's connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// What a completed leave tells the manager.
#[derive(Debug, Clone, Copy)]
pub struct LeaveOutcome {
    /// The room has no players left and should be destroyed.
    pub now_empty: bool,
}

/// A point-in-time summary of a room, for diagnostics.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub phase: Phase,
    pub player_count: usize,
    pub monster_count: usize,
}

enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        account: Option<AccountId>,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<LeaveOutcome, RoomError>>,
    },
    Event {
        player_id: PlayerId,
        event: ClientEvent,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    /// A score award came back from the ranking layer.
    RankingSettled {
        player_id: PlayerId,
        new_total: u32,
        /// `None` when the leaderboard read failed; the score update is
        /// still applied.
        ranking: Option<Vec<RankingEntry>>,
    },
    Shutdown,
}

/// A clonable handle to a running room actor.
///
/// Every method that needs an answer round-trips a oneshot through the
/// command channel. A closed channel means the actor is gone and maps
/// to [`RoomError::Unavailable`].
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        account: Option<AccountId>,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply, response) = oneshot::channel();
        self.send(RoomCommand::Join {
            player_id,
            name,
            account,
            sender,
            reply,
        })
        .await?;
        response
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?
    }

    pub async fn leave(
        &self,
        player_id: PlayerId,
    ) -> Result<LeaveOutcome, RoomError> {
        let (reply, response) = oneshot::channel();
        self.send(RoomCommand::Leave { player_id, reply }).await?;
        response
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?
    }

    pub async fn send_event(
        &self,
        player_id: PlayerId,
        event: ClientEvent,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Event { player_id, event }).await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, response) = oneshot::channel();
        self.send(RoomCommand::Info { reply }).await?;
        response
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Tells the actor to stop. Idempotent; a dead actor is already
    /// shut down.
    pub async fn shutdown(&self) {
        let _ = self.sender.send(RoomCommand::Shutdown).await;
    }

    async fn send(&self, command: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

struct RoomActor<S: ScoreStore> {
    room_id: RoomId,
    config: RoomConfig,
    state: GameState,
    senders: HashMap<PlayerId, PlayerSender>,
    ranking: Arc<Ranking<S>>,
    rng: StdRng,
    receiver: mpsc::Receiver<RoomCommand>,
    /// Clone of our own command sender, handed to award tasks so their
    /// results re-enter the actor as [`RoomCommand::RankingSettled`].
    self_sender: mpsc::Sender<RoomCommand>,
}

/// Creates a room and spawns its actor task. The returned handle is the
/// only way to reach the room.
pub fn spawn_room<S: ScoreStore>(
    room_id: RoomId,
    config: RoomConfig,
    ranking: Arc<Ranking<S>>,
) -> RoomHandle {
    let (sender, receiver) = mpsc::channel(DEFAULT_CHANNEL_SIZE);
    let mut rng = StdRng::from_os_rng();
    let state = GameState::new(room_id.clone(), config.clone(), &mut rng);

    let actor = RoomActor {
        room_id: room_id.clone(),
        config,
        state,
        senders: HashMap::new(),
        ranking,
        rng,
        receiver,
        self_sender: sender.clone(),
    };
    tokio::spawn(actor.run());

    RoomHandle { room_id, sender }
}

impl<S: ScoreStore> RoomActor<S> {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, "room started");

        // Start both clocks one period out so a freshly created room
        // doesn't flip to night or tick monsters immediately.
        let mut phase_timer = interval_at(
            Instant::now() + self.config.phase_duration,
            self.config.phase_duration,
        );
        let mut monster_timer = interval_at(
            Instant::now() + self.config.monster_tick,
            self.config.monster_tick,
        );

        loop {
            tokio::select! {
                command = self.receiver.recv() => {
                    match command {
                        Some(RoomCommand::Shutdown) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }
                _ = phase_timer.tick() => {
                    let events = self.state.phase_tick(&mut self.rng);
                    self.dispatch(events);
                }
                _ = monster_timer.tick() => {
                    let events = self.state.monster_tick(&mut self.rng);
                    self.dispatch(events);
                }
            }
        }

        tracing::info!(
            room_id = %self.room_id,
            players = self.state.player_count(),
            "room stopped"
        );
    }

    fn handle_command(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Join {
                player_id,
                name,
                account,
                sender,
                reply,
            } => {
                let result = self.state.join(player_id, name, account);
                match result {
                    Ok(events) => {
                        self.senders.insert(player_id, sender);
                        tracing::info!(
                            room_id = %self.room_id,
                            %player_id,
                            players = self.state.player_count(),
                            "player joined"
                        );
                        let _ = reply.send(Ok(()));
                        self.dispatch(events);
                    }
                    Err(err) => {
                        let _ = reply.send(Err(err));
                    }
                }
            }
            RoomCommand::Leave { player_id, reply } => {
                let result = self.state.leave(player_id);
                match result {
                    Ok(events) => {
                        self.senders.remove(&player_id);
                        self.dispatch(events);
                        let now_empty = self.state.player_count() == 0;
                        tracing::info!(
                            room_id = %self.room_id,
                            %player_id,
                            players = self.state.player_count(),
                            "player left"
                        );
                        let _ = reply.send(Ok(LeaveOutcome { now_empty }));
                    }
                    Err(err) => {
                        let _ = reply.send(Err(err));
                    }
                }
            }
            RoomCommand::Event { player_id, event } => {
                let effects =
                    self.state.handle_event(player_id, event, &mut self.rng);
                self.dispatch(effects.events);
                if let Some(award) = effects.award {
                    self.settle_award(award);
                }
            }
            RoomCommand::Info { reply } => {
                let _ = reply.send(RoomInfo {
                    room_id: self.room_id.clone(),
                    phase: self.state.phase(),
                    player_count: self.state.player_count(),
                    monster_count: self.state.monster_count(),
                });
            }
            RoomCommand::RankingSettled {
                player_id,
                new_total,
                ranking,
            } => {
                let events = self.state.apply_score(player_id, new_total, ranking);
                self.dispatch(events);
            }
            RoomCommand::Shutdown => unreachable!("handled in run"),
        }
    }

    /// Applies an award through the ranking layer without blocking the
    /// actor. Guest scores settle synchronously; account scores need a
    /// store round-trip, so both paths run in a spawned task that sends
    /// the result back as a command.
    fn settle_award(&mut self, award: ScoreAward) {
        // Guest awards can't fail; settle the total here and only fetch
        // the leaderboard in the task.
        let guest_total = match award.account {
            Some(_) => None,
            None => Some(self.ranking.award_guest(
                award.player,
                &award.name,
                award.delta,
            )),
        };

        let ranking = Arc::clone(&self.ranking);
        let self_sender = self.self_sender.clone();
        let room_id = self.room_id.clone();
        tokio::spawn(async move {
            let new_total = match (award.account, guest_total) {
                (Some(account), _) => {
                    match ranking
                        .award_account(account, &award.name, award.delta)
                        .await
                    {
                        Ok(total) => total,
                        Err(err) => {
                            tracing::error!(
                                %room_id,
                                player_id = %award.player,
                                %account,
                                error = %err,
                                "score award failed"
                            );
                            return;
                        }
                    }
                }
                (None, Some(total)) => total,
                (None, None) => return,
            };

            let top = match ranking.top().await {
                Ok(entries) => Some(entries),
                Err(err) => {
                    tracing::warn!(
                        %room_id,
                        error = %err,
                        "leaderboard read failed, skipping ranking update"
                    );
                    None
                }
            };

            let _ = self_sender
                .send(RoomCommand::RankingSettled {
                    player_id: award.player,
                    new_total,
                    ranking: top,
                })
                .await;
        });
    }

    /// Fans events out to player connections. A closed connection is
    /// skipped; the transport layer is responsible for the leave.
    fn dispatch(&mut self, events: Vec<(Recipient, ServerEvent)>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for (player_id, sender) in &self.senders {
                        Self::send_to(*player_id, sender, event.clone());
                    }
                }
                Recipient::Player(target) => {
                    if let Some(sender) = self.senders.get(&target) {
                        Self::send_to(target, sender, event);
                    }
                }
                Recipient::AllExcept(excluded) => {
                    for (player_id, sender) in &self.senders {
                        if *player_id != excluded {
                            Self::send_to(*player_id, sender, event.clone());
                        }
                    }
                }
            }
        }
    }

    fn send_to(player_id: PlayerId, sender: &PlayerSender, event: ServerEvent) {
        if sender.send(event).is_err() {
            tracing::debug!(%player_id, "player connection closed, dropping event");
        }
    }
}
