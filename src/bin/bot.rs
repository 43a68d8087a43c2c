//! League bot binary: Discord gateway adapter plus a small read-only status API.
//! Run with: cargo run --bin bot
//! Needs DISCORD_TOKEN, HOST_CHANNEL_ID, RESULTS_CHANNEL_ID and LEAGUE_HOSTER_ROLE_ID
//! (a .env file works). The status API listens on HOST:PORT, 0.0.0.0:8080 by default.

use actix_web::{
    get,
    web::{Data, Path},
    App, HttpResponse, HttpServer, Responder,
};
use anyhow::Context as _;
use league_host_bot::platform::{
    join_modal_id, parse_join_modal_id, DISPLAY_NAME_INPUT_ID, JOIN_BUTTON_ID,
};
use league_host_bot::{
    Actor, BotConfig, InboundEvent, InteractionRef, LeagueError, LeagueService, LeagueType,
    MatchType, MemorySessionStore, Outcome, Platform, PlatformError, RoleListChecker, SessionId,
    SessionSummary, UserRef, MAX_DISPLAY_NAME_LEN,
};
use log::{debug, error, info, warn};
use serde::Deserialize;
use serenity::all::{
    ActionRowComponent, ButtonStyle, ChannelId, ChannelType, Command, CommandDataOptionValue,
    CommandInteraction, CommandOptionType, ComponentInteraction, Context, CreateActionRow,
    CreateButton, CreateCommand, CreateCommandOption, CreateInputText, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, CreateModal, CreateThread, EventHandler,
    GatewayIntents, Http, InputTextStyle, Interaction, InteractionId, Member, Message,
    ModalInteraction, Ready, User, UserId,
};
use serenity::async_trait;
use serenity::Client;
use std::sync::Arc;

/// Name of the single slash command.
const HOST_COMMAND: &str = "hostleague";

type Service = LeagueService<MemorySessionStore, RoleListChecker, SerenityPlatform>;

/// Outbound platform calls over the Discord REST API.
struct SerenityPlatform {
    http: Arc<Http>,
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn create_private_thread(&self, parent: u64, name: &str) -> Result<u64, PlatformError> {
        let builder = CreateThread::new(name).kind(ChannelType::PrivateThread);
        let thread = ChannelId::new(parent)
            .create_thread(&self.http, builder)
            .await
            .map_err(|e| PlatformError::new("create thread", e))?;
        Ok(thread.id.get())
    }

    async fn add_thread_member(&self, thread: u64, user: u64) -> Result<(), PlatformError> {
        ChannelId::new(thread)
            .add_thread_member(&self.http, UserId::new(user))
            .await
            .map_err(|e| PlatformError::new("add thread member", e))
    }

    async fn send_message(&self, channel: u64, content: &str) -> Result<u64, PlatformError> {
        let message = ChannelId::new(channel)
            .send_message(&self.http, CreateMessage::new().content(content))
            .await
            .map_err(|e| PlatformError::new("send message", e))?;
        Ok(message.id.get())
    }

    async fn send_join_announcement(
        &self,
        channel: u64,
        content: &str,
    ) -> Result<u64, PlatformError> {
        let button = CreateButton::new(JOIN_BUTTON_ID)
            .label("Join League")
            .style(ButtonStyle::Success);
        let builder = CreateMessage::new()
            .content(content)
            .components(vec![CreateActionRow::Buttons(vec![button])]);
        let message = ChannelId::new(channel)
            .send_message(&self.http, builder)
            .await
            .map_err(|e| PlatformError::new("send announcement", e))?;
        Ok(message.id.get())
    }

    async fn respond(
        &self,
        interaction: &InteractionRef,
        content: &str,
        ephemeral: bool,
    ) -> Result<(), PlatformError> {
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(ephemeral),
        );
        self.http
            .create_interaction_response(
                InteractionId::new(interaction.id),
                &interaction.token,
                &response,
                vec![],
            )
            .await
            .map_err(|e| PlatformError::new("respond to interaction", e))
    }

    async fn prompt_display_name(
        &self,
        interaction: &InteractionRef,
        announcement: u64,
    ) -> Result<(), PlatformError> {
        let label = "Enter your display name";
        let input = CreateInputText::new(InputTextStyle::Short, label, DISPLAY_NAME_INPUT_ID)
            .placeholder("Example: PlayerOne")
            .max_length(MAX_DISPLAY_NAME_LEN as u16)
            .required(true);
        let modal = CreateModal::new(join_modal_id(announcement), "Join League")
            .components(vec![CreateActionRow::InputText(input)]);
        self.http
            .create_interaction_response(
                InteractionId::new(interaction.id),
                &interaction.token,
                &CreateInteractionResponse::Modal(modal),
                vec![],
            )
            .await
            .map_err(|e| PlatformError::new("open display name prompt", e))
    }
}

fn actor(user: &User, member: Option<&Member>) -> Actor {
    let mut actor = Actor::new(UserRef::new(user.id.get(), user.name.clone()));
    actor.bot = user.bot;
    if let Some(member) = member {
        actor.roles = member.roles.iter().map(|r| r.get()).collect();
    }
    actor
}

fn string_option<'a>(command: &'a CommandInteraction, name: &str) -> Option<&'a str> {
    command
        .data
        .options
        .iter()
        .find(|o| o.name == name)
        .and_then(|o| match &o.value {
            CommandDataOptionValue::String(s) => Some(s.as_str()),
            _ => None,
        })
}

/// `/hostleague match_type league_type` -> HostRequested.
fn host_request(command: &CommandInteraction) -> Option<InboundEvent> {
    if command.data.name != HOST_COMMAND {
        return None;
    }
    let match_type = string_option(command, "match_type")?.parse::<MatchType>();
    let league_type = string_option(command, "league_type")?.parse::<LeagueType>();
    let (match_type, league_type) = match (match_type, league_type) {
        (Ok(m), Ok(l)) => (m, l),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Ignoring /{}: {}", HOST_COMMAND, e);
            return None;
        }
    };
    Some(InboundEvent::HostRequested {
        interaction: InteractionRef::new(command.id.get(), command.token.clone()),
        actor: actor(&command.user, command.member.as_deref()),
        channel: command.channel_id.get(),
        match_type,
        league_type,
    })
}

/// Join button on an announcement -> JoinActivated.
fn join_activation(component: &ComponentInteraction) -> Option<InboundEvent> {
    if component.data.custom_id != JOIN_BUTTON_ID {
        return None;
    }
    Some(InboundEvent::JoinActivated {
        interaction: InteractionRef::new(component.id.get(), component.token.clone()),
        actor: actor(&component.user, component.member.as_ref()),
        announcement: component.message.id.get(),
    })
}

/// Display-name modal -> DisplayNameSubmitted.
fn display_name_submission(modal: &ModalInteraction) -> Option<InboundEvent> {
    let announcement = parse_join_modal_id(&modal.data.custom_id)?;
    let display_name = modal
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|c| match c {
            ActionRowComponent::InputText(input) if input.custom_id == DISPLAY_NAME_INPUT_ID => {
                input.value.clone()
            }
            _ => None,
        })
        .unwrap_or_default();
    Some(InboundEvent::DisplayNameSubmitted {
        interaction: InteractionRef::new(modal.id.get(), modal.token.clone()),
        actor: actor(&modal.user, modal.member.as_ref()),
        announcement,
        display_name,
    })
}

fn choice_option<'a>(
    name: &str,
    description: &str,
    choices: impl Iterator<Item = &'a str>,
) -> CreateCommandOption {
    choices.fold(
        CreateCommandOption::new(CommandOptionType::String, name, description).required(true),
        |option, choice| option.add_string_choice(choice, choice),
    )
}

fn host_league_command() -> CreateCommand {
    CreateCommand::new(HOST_COMMAND)
        .description("Host a league match")
        .add_option(choice_option(
            "match_type",
            "Match format",
            MatchType::ALL.iter().map(|m| m.as_str()),
        ))
        .add_option(choice_option(
            "league_type",
            "League",
            LeagueType::ALL.iter().map(|l| l.as_str()),
        ))
}

/// Gateway events -> league core.
struct Handler {
    service: Arc<Service>,
}

impl Handler {
    async fn dispatch(&self, event: InboundEvent) {
        match self.service.handle(event).await {
            Ok(Outcome::Ignored) => {}
            Ok(outcome) => debug!("Handled: {:?}", outcome),
            // Already logged and reported by the service.
            Err(_) => {}
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("League bot online as {}", ready.user.name);
        match Command::set_global_commands(&ctx.http, vec![host_league_command()]).await {
            Ok(commands) => info!("Registered {} slash command(s)", commands.len()),
            Err(e) => error!("Could not register slash commands: {}", e),
        }
    }

    async fn interaction_create(&self, _ctx: Context, interaction: Interaction) {
        let event = match &interaction {
            Interaction::Command(command) => host_request(command),
            Interaction::Component(component) => join_activation(component),
            Interaction::Modal(modal) => display_name_submission(modal),
            _ => None,
        };
        if let Some(event) = event {
            self.dispatch(event).await;
        }
    }

    async fn message(&self, _ctx: Context, message: Message) {
        let event = InboundEvent::MessagePosted {
            actor: actor(&message.author, None),
            channel: message.channel_id.get(),
            content: message.content,
        };
        self.dispatch(event).await;
    }
}

type AppState = Data<Service>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: league id, which is its private thread id (e.g. /api/leagues/{id})
#[derive(Deserialize)]
struct LeaguePath {
    id: SessionId,
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "league-host-bot",
    })
}

fn internal_error(e: &LeagueError) -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
}

/// All open leagues, oldest first.
#[get("/api/leagues")]
async fn api_list_leagues(state: AppState) -> HttpResponse {
    match state.summaries() {
        Ok(leagues) => HttpResponse::Ok().json(leagues),
        Err(e) => internal_error(&e),
    }
}

/// One open league (404 once it has closed).
#[get("/api/leagues/{id}")]
async fn api_get_league(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    match state.session(path.id) {
        Ok(Some(session)) => HttpResponse::Ok().json(SessionSummary::from_session(&session)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No league" })),
        Err(e) => internal_error(&e),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = BotConfig::from_env().context("Failed to load configuration")?;
    info!(
        "Hosting in channel {}, results to channel {}",
        config.league.hosting_channel, config.league.results_channel
    );

    let platform = SerenityPlatform {
        http: Arc::new(Http::new(&config.token)),
    };
    let service = Arc::new(LeagueService::new(
        config.league,
        MemorySessionStore::new(),
        RoleListChecker,
        platform,
    ));

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&config.token, intents)
        .event_handler(Handler {
            service: service.clone(),
        })
        .await
        .context("Error creating Discord client")?;

    let bind = (config.host.clone(), config.port);
    info!("Status API at http://{}:{}", bind.0, bind.1);
    let state = Data::from(service);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_leagues)
            .service(api_get_league)
    })
    .bind(bind)
    .context("Failed to bind status API")?
    .run();

    tokio::select! {
        result = client.start() => result.context("Discord client stopped")?,
        result = server => result.context("Status API stopped")?,
    }
    Ok(())
}
